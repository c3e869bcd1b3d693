//! Sliding-window rate limiting keyed by action name.

use std::collections::HashMap;

use gnome_core::Millis;
use thiserror::Error;

use crate::clock::Clock;

/// Maximum attempts allowed inside a rolling window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_attempts: usize,
    pub window_ms: Millis,
}

impl RateLimitPolicy {
    pub const TAP: Self = Self::new(5, 5_000);
    pub const TASK_COMPLETION: Self = Self::new(3, 60_000);
    pub const MINE_COLLECTION: Self = Self::new(1, 300_000);

    pub const fn new(max_attempts: usize, window_ms: Millis) -> Self {
        Self {
            max_attempts,
            window_ms,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("rate limit exceeded for {key}; retry in {retry_after_ms} ms")]
pub struct RateLimited {
    pub key: String,
    pub retry_after_ms: Millis,
}

/// Sliding-window limiter. An attempt at `t` counts while `now - t < window`.
///
/// [`check`](Self::check) tests and records in one step. Callers that only
/// want to spend budget on success use [`permit`](Self::permit) first and
/// [`record`](Self::record) once the guarded work went through. Rejected
/// attempts are never recorded, so hammering a limited key does not push the
/// window further out.
pub struct RateLimiter<C> {
    clock: C,
    attempts: HashMap<String, Vec<Millis>>,
}

impl<C: Clock> RateLimiter<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            attempts: HashMap::new(),
        }
    }

    /// Records an attempt for `key`, or reports how long until one frees up.
    pub fn check(&mut self, key: &str, policy: RateLimitPolicy) -> Result<(), RateLimited> {
        self.permit(key, policy)?;
        self.record(key);
        Ok(())
    }

    /// Reports whether an attempt for `key` would be allowed, without
    /// recording it.
    pub fn permit(&mut self, key: &str, policy: RateLimitPolicy) -> Result<(), RateLimited> {
        let now = self.clock.now_millis();
        let Some(attempts) = self.attempts.get_mut(key) else {
            return Ok(());
        };
        attempts.retain(|&at| now.saturating_sub(at) < policy.window_ms);

        if attempts.len() >= policy.max_attempts {
            let oldest = attempts.iter().copied().min().unwrap_or(now);
            return Err(RateLimited {
                key: key.to_owned(),
                retry_after_ms: oldest.saturating_add(policy.window_ms).saturating_sub(now),
            });
        }
        Ok(())
    }

    /// Counts an attempt for `key` at the current time.
    pub fn record(&mut self, key: &str) {
        let now = self.clock.now_millis();
        self.attempts.entry(key.to_owned()).or_default().push(now);
    }

    /// Forgets every attempt recorded for `key`.
    pub fn reset(&mut self, key: &str) {
        self.attempts.remove(key);
    }
}
