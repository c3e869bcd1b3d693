use crate::error::GameError;
use crate::state::GameState;

/// Defines how a concrete action variant changes game state.
///
/// The engine drives every action through `pre_validate`, `apply` and
/// `post_validate` in that order and restores the previous state if any phase
/// fails. Hooks must stay side-effect free apart from `apply`'s mutation of
/// `state`.
pub trait ActionTransition {
    type Error: GameError;
    type Result;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &GameState) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action. Implementations may assume `pre_validate` passed.
    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _state: &GameState) -> Result<(), Self::Error> {
        Ok(())
    }
}
