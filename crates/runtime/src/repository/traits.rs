//! Repository contract for saving and loading per-user game state.

use gnome_core::GameState;

use crate::api::UserId;
use crate::repository::Result;

/// Durable store for the latest [`GameState`] of each user.
///
/// Implementations keep one snapshot per user. Saving replaces the previous
/// snapshot, so the last writer wins.
pub trait StateRepository: Send + Sync {
    /// Save the latest state of `user_id`.
    fn save(&self, user_id: &UserId, state: &GameState) -> Result<()>;

    /// Load the latest state of `user_id`, if any.
    fn load(&self, user_id: &UserId) -> Result<Option<GameState>>;

    /// Check if a state exists
    fn exists(&self, user_id: &UserId) -> bool;

    /// Delete a state
    fn delete(&self, user_id: &UserId) -> Result<()>;

    /// List every user with a saved state, sorted.
    fn list_users(&self) -> Result<Vec<UserId>> {
        Ok(vec![])
    }
}
