//! In-memory repository for tests and local runs.

mod state;

pub use state::InMemoryStateRepo;
