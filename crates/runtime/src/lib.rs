//! Runtime services around the deterministic gnome game core.
//!
//! This crate owns everything the core refuses to touch: wall-clock time,
//! entropy, persistence, the remote session backend and change
//! notifications. Consumers drive play through [`GameSession`].
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the per-player orchestrator and its builder
//! - [`api`] exposes errors and the session provider contract
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] persists per-user state in memory or on disk
//! - [`clock`], [`rate_limit`] and [`cache`] are small building blocks
//! - [`intent`] turns presentation-layer JSON into engine actions
pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod events;
pub mod intent;
pub mod rate_limit;
pub mod repository;
pub mod session;

pub use api::{
    ErrorCode, InMemorySessionProvider, Result, RuntimeError, SessionProvider, UserId,
    UserProfile, is_spin_available,
};
pub use cache::SnapshotCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RuntimeConfig, RuntimeConfigBuilder};
pub use events::{Event, EventBus, GameStateEvent, StoreEvent, Topic};
pub use intent::{IntentError, PlayerIntent, parse_intent};
pub use rate_limit::{RateLimitPolicy, RateLimited, RateLimiter};
pub use repository::{FileStateRepository, InMemoryStateRepo, RepositoryError, StateRepository};
pub use session::{Dispatched, GameSession, GameSessionBuilder};
