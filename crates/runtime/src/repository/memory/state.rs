//! In-memory StateRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use gnome_core::GameState;

use crate::api::UserId;
use crate::events::EventBus;
use crate::repository::{RepositoryError, Result, StateRepository, announce_save};

/// In-memory implementation of StateRepository.
///
/// Stores one state per user. Nothing survives the process.
pub struct InMemoryStateRepo {
    states: RwLock<HashMap<UserId, GameState>>,
    events: Option<EventBus>,
}

impl InMemoryStateRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            events: None,
        }
    }

    /// Publish a [`StoreEvent`](crate::events::StoreEvent) on every save.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }
}

impl Default for InMemoryStateRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl StateRepository for InMemoryStateRepo {
    fn save(&self, user_id: &UserId, state: &GameState) -> Result<()> {
        {
            let mut states = self
                .states
                .write()
                .map_err(|_| RepositoryError::LockPoisoned)?;
            states.insert(user_id.clone(), state.clone());
        }
        announce_save(self.events.as_ref(), user_id, state);
        Ok(())
    }

    fn load(&self, user_id: &UserId) -> Result<Option<GameState>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(states.get(user_id).cloned())
    }

    fn exists(&self, user_id: &UserId) -> bool {
        self.states
            .read()
            .map(|states| states.contains_key(user_id))
            .unwrap_or(false)
    }

    fn delete(&self, user_id: &UserId) -> Result<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        states.remove(user_id);
        Ok(())
    }

    fn list_users(&self) -> Result<Vec<UserId>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut users: Vec<UserId> = states.keys().cloned().collect();
        users.sort_unstable();
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, StoreEvent, Topic};

    #[test]
    fn save_replaces_previous_state() {
        let repo = InMemoryStateRepo::new();
        let user = UserId::new("alice");
        let mut state = GameState::new();

        repo.save(&user, &state).expect("save");
        state.tokens = 7;
        repo.save(&user, &state).expect("save again");

        assert_eq!(repo.load(&user).expect("load"), Some(state));
        assert_eq!(repo.list_users().expect("list"), vec![user.clone()]);

        repo.delete(&user).expect("delete");
        assert!(!repo.exists(&user));
        assert_eq!(repo.load(&user).expect("load"), None);
    }

    #[test]
    fn save_announces_digest() {
        let bus = EventBus::new();
        let mut store = bus.subscribe(Topic::Store);
        let repo = InMemoryStateRepo::new().with_events(bus);
        let user = UserId::new("bob");
        let state = GameState::new();

        repo.save(&user, &state).expect("save");

        match store.try_recv().expect("store event") {
            Event::Store(StoreEvent::Changed { user_id, digest }) => {
                assert_eq!(user_id, user);
                assert_eq!(digest, state.digest());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
