//! Time-boxed snapshot cache.

use std::collections::HashMap;

use gnome_core::Millis;

use crate::clock::Clock;

struct Entry<T> {
    value: T,
    expires_at: Millis,
}

/// Key-value cache whose entries expire after a TTL.
///
/// An entry is served while `now <= expires_at` and dropped on the first
/// read after that.
pub struct SnapshotCache<T, C> {
    clock: C,
    ttl_ms: Millis,
    entries: HashMap<String, Entry<T>>,
}

impl<T: Clone, C: Clock> SnapshotCache<T, C> {
    /// Key under which the session caches its game state.
    pub const DEFAULT_KEY: &'static str = "gameState";
    pub const DEFAULT_TTL_MS: Millis = 60_000;

    pub fn new(clock: C) -> Self {
        Self::with_ttl(clock, Self::DEFAULT_TTL_MS)
    }

    pub fn with_ttl(clock: C, ttl_ms: Millis) -> Self {
        Self {
            clock,
            ttl_ms,
            entries: HashMap::new(),
        }
    }

    pub fn ttl_ms(&self) -> Millis {
        self.ttl_ms
    }

    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = self.clock.now_millis();
        match self.entries.get(key) {
            Some(entry) if now <= entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        let ttl_ms = self.ttl_ms;
        self.insert_with_ttl(key, value, ttl_ms);
    }

    pub fn insert_with_ttl(&mut self, key: impl Into<String>, value: T, ttl_ms: Millis) {
        let expires_at = self.clock.now_millis().saturating_add(ttl_ms);
        self.entries
            .insert(key.into(), Entry { value, expires_at });
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
