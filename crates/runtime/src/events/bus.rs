//! Topic-based event bus implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{GameStateEvent, StoreEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Game state changes (actions, rejections, taps)
    GameState,
    /// Persistence notifications from repositories
    Store,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::GameState, Topic::Store];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    GameState(GameStateEvent),
    Store(StoreEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::GameState(_) => Topic::GameState,
            Event::Store(_) => Topic::Store,
        }
    }
}

/// Topic-based event bus
///
/// Consumers subscribe to specific topics and only receive events they care
/// about. Cloning the bus shares the underlying channels.
#[derive(Clone)]
pub struct EventBus {
    game_state: broadcast::Sender<Event>,
    store: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            game_state: broadcast::channel(capacity).0,
            store: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::GameState => &self.game_state,
            Topic::Store => &self.store,
        }
    }

    /// Publish an event to its corresponding topic
    ///
    /// Delivery is best-effort: events published with no subscribers are dropped.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
