//! Persistence adapters for per-user game state.
//!
//! Both implementations announce successful saves on the [`Store`] topic of
//! an attached [`EventBus`] so other sessions can refresh.
//!
//! [`Store`]: crate::events::Topic::Store
//! [`EventBus`]: crate::events::EventBus
mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileStateRepository;
pub use memory::InMemoryStateRepo;
pub use traits::StateRepository;

use gnome_core::GameState;

use crate::api::UserId;
use crate::events::{Event, EventBus, StoreEvent};

/// Publishes a change notification when a bus is attached.
fn announce_save(events: Option<&EventBus>, user_id: &UserId, state: &GameState) {
    if let Some(bus) = events {
        bus.publish(Event::Store(StoreEvent::Changed {
            user_id: user_id.clone(),
            digest: state.digest(),
        }));
    }
}
