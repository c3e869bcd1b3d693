//! Action execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. It
//! drives every action through the transition phases and surfaces rich error
//! information for the runtime. [`reduce`] wraps it as a total function for
//! callers that only care about the next state.

mod errors;
mod reducer;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};
pub use reducer::reduce;

use crate::action::{Action, ActionResult};
use crate::state::GameState;

/// Complete outcome of action execution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionOutcome {
    /// Action-specific execution result (combat report, credited tokens, etc.).
    pub action_result: ActionResult,

    /// Nonce after the action was accepted.
    pub nonce: u64,
}

/// Game engine that applies actions to a borrowed state.
///
/// All state mutations flow through the three-phase action pipeline:
/// pre_validate → apply → post_validate
///
/// A rejected action leaves the state exactly as it was.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Executes an action by routing it through the appropriate transition pipeline.
    ///
    /// On success the nonce is incremented. On failure the state is restored
    /// to its value before the call.
    pub fn execute(&mut self, action: &Action) -> Result<ExecutionOutcome, ExecuteError> {
        let before = self.state.clone();

        match transition::execute_transition(action, self.state) {
            Ok(action_result) => {
                self.state.nonce += 1;
                Ok(ExecutionOutcome {
                    action_result,
                    nonce: self.state.nonce,
                })
            }
            Err(error) => {
                *self.state = before;
                Err(error)
            }
        }
    }
}
