//! Event types for different topics.

use gnome_core::{Action, ActionResult, StateDigest, TransitionPhase};
use serde::{Deserialize, Serialize};

use crate::api::UserId;

/// Events related to game state changes (actions, failures, taps)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameStateEvent {
    /// An action was accepted by the engine.
    ActionApplied {
        action: Action,
        result: ActionResult,
        nonce: u64,
    },

    /// An action was rejected; the state is unchanged.
    ActionRejected {
        action: Action,
        phase: TransitionPhase,
        code: String,
        error: String,
    },

    /// A tap was accepted and paid out.
    TapRewarded { reward: f64, total_earned: f64 },
}

/// Events emitted by state repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreEvent {
    /// A user's saved state was replaced.
    Changed { user_id: UserId, digest: StateDigest },
}
