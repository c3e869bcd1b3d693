//! Topic-based event system.
//!
//! - [`Topic::GameState`]: actions applied or rejected, taps rewarded
//! - [`Topic::Store`]: a repository replaced a user's saved state

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{GameStateEvent, StoreEvent};
