//! Action transition dispatch and execution logic.

use crate::action::{Action, ActionResult, ActionTransition};
use crate::state::GameState;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns the result.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the game state and return result
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
) -> Result<T::Result, TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let result = transition
        .apply(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(result)
}

/// Routes each action to its transition and wraps the result in [`ActionResult`].
///
/// Leaves `state` partially mutated on failure; [`GameEngine`](super::GameEngine)
/// restores it.
pub(super) fn execute_transition(
    action: &Action,
    state: &mut GameState,
) -> Result<ActionResult, ExecuteError> {
    let result = match action {
        Action::Move(transition) => {
            let to = drive_transition(transition, state).map_err(ExecuteError::Move)?;
            ActionResult::Moved { to }
        }
        Action::StartCombat(transition) => {
            let report =
                drive_transition(transition, state).map_err(ExecuteError::StartCombat)?;
            ActionResult::Combat(report)
        }
        Action::CollectTokens(transition) => {
            let credited =
                drive_transition(transition, state).map_err(ExecuteError::CollectTokens)?;
            ActionResult::TokensCollected { credited }
        }
        Action::CollectPickup(transition) => {
            let credited =
                drive_transition(transition, state).map_err(ExecuteError::CollectPickup)?;
            ActionResult::TokensCollected { credited }
        }
        Action::UseItem(transition) => {
            let used = drive_transition(transition, state).map_err(ExecuteError::UseItem)?;
            ActionResult::ItemUsed(used)
        }
        Action::LevelUp(transition) => {
            let level = drive_transition(transition, state).map_err(ExecuteError::LevelUp)?;
            ActionResult::LeveledUp { level }
        }
        Action::ApplyBuff(transition) => {
            let total = drive_transition(transition, state).map_err(ExecuteError::ApplyBuff)?;
            ActionResult::BuffApplied {
                kind: transition.kind,
                total,
            }
        }
        Action::EnterDungeon(transition) => {
            let entrance =
                drive_transition(transition, state).map_err(ExecuteError::EnterDungeon)?;
            ActionResult::DungeonEntered { entrance }
        }
        Action::LeaveDungeon(transition) => {
            drive_transition(transition, state).map_err(ExecuteError::LeaveDungeon)?;
            ActionResult::DungeonLeft
        }
        Action::Tap(transition) => {
            let reward = drive_transition(transition, state).map_err(ExecuteError::Tap)?;
            ActionResult::Tapped { reward }
        }
        Action::SyncProfile(transition) => {
            let tap_power =
                drive_transition(transition, state).map_err(ExecuteError::SyncProfile)?;
            ActionResult::ProfileSynced { tap_power }
        }
        Action::UpgradeMine(transition) => {
            let level = drive_transition(transition, state).map_err(ExecuteError::UpgradeMine)?;
            ActionResult::MineUpgraded {
                mine: transition.mine,
                level,
            }
        }
        Action::CollectMine(transition) => {
            let amount =
                drive_transition(transition, state).map_err(ExecuteError::CollectMine)?;
            ActionResult::MineCollected {
                mine: transition.mine,
                amount,
            }
        }
        Action::CompleteTask(transition) => {
            let reward =
                drive_transition(transition, state).map_err(ExecuteError::CompleteTask)?;
            ActionResult::TaskCompleted {
                task: transition.task.clone(),
                reward,
            }
        }
        Action::SyncTasks(transition) => {
            let open = drive_transition(transition, state).map_err(ExecuteError::SyncTasks)?;
            ActionResult::TasksSynced { open }
        }
    };

    Ok(result)
}
