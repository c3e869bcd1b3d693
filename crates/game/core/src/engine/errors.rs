//! Error types for the action execution pipeline.

use crate::action::{
    ActionTransition, ApplyBuffAction, CollectMineAction, CollectPickupAction,
    CollectTokensAction, CompleteTaskAction, EnterDungeonAction, LeaveDungeonAction,
    LevelUpAction, MoveAction, StartCombatAction, SyncProfileAction, SyncTasksAction, TapAction,
    UpgradeMineAction, UseItemAction,
};
use crate::error::{ErrorSeverity, GameError};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

type PhaseError<T> = TransitionPhaseError<<T as ActionTransition>::Error>;

/// Errors surfaced while executing an action through the game engine.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExecuteError {
    #[error("move action failed: {0}")]
    Move(PhaseError<MoveAction>),

    #[error("combat action failed: {0}")]
    StartCombat(PhaseError<StartCombatAction>),

    #[error("collect tokens action failed: {0}")]
    CollectTokens(PhaseError<CollectTokensAction>),

    #[error("collect pickup action failed: {0}")]
    CollectPickup(PhaseError<CollectPickupAction>),

    #[error("use item action failed: {0}")]
    UseItem(PhaseError<UseItemAction>),

    #[error("level up action failed: {0}")]
    LevelUp(PhaseError<LevelUpAction>),

    #[error("apply buff action failed: {0}")]
    ApplyBuff(PhaseError<ApplyBuffAction>),

    #[error("enter dungeon action failed: {0}")]
    EnterDungeon(PhaseError<EnterDungeonAction>),

    #[error("leave dungeon action failed: {0}")]
    LeaveDungeon(PhaseError<LeaveDungeonAction>),

    #[error("tap action failed: {0}")]
    Tap(PhaseError<TapAction>),

    #[error("sync profile action failed: {0}")]
    SyncProfile(PhaseError<SyncProfileAction>),

    #[error("upgrade mine action failed: {0}")]
    UpgradeMine(PhaseError<UpgradeMineAction>),

    #[error("collect mine action failed: {0}")]
    CollectMine(PhaseError<CollectMineAction>),

    #[error("complete task action failed: {0}")]
    CompleteTask(PhaseError<CompleteTaskAction>),

    #[error("sync tasks action failed: {0}")]
    SyncTasks(PhaseError<SyncTasksAction>),
}

impl ExecuteError {
    pub fn phase(&self) -> TransitionPhase {
        self.inner().0
    }

    fn inner(&self) -> (TransitionPhase, &dyn GameError) {
        fn split<E: GameError>(
            error: &TransitionPhaseError<E>,
        ) -> (TransitionPhase, &dyn GameError) {
            (error.phase, &error.error)
        }

        match self {
            ExecuteError::Move(error) => split(error),
            ExecuteError::StartCombat(error) => split(error),
            ExecuteError::CollectTokens(error) => split(error),
            ExecuteError::CollectPickup(error) => split(error),
            ExecuteError::UseItem(error) => split(error),
            ExecuteError::LevelUp(error) => split(error),
            ExecuteError::ApplyBuff(error) => split(error),
            ExecuteError::EnterDungeon(error) => split(error),
            ExecuteError::LeaveDungeon(error) => split(error),
            ExecuteError::Tap(error) => split(error),
            ExecuteError::SyncProfile(error) => split(error),
            ExecuteError::UpgradeMine(error) => split(error),
            ExecuteError::CollectMine(error) => split(error),
            ExecuteError::CompleteTask(error) => split(error),
            ExecuteError::SyncTasks(error) => split(error),
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        let (phase, error) = self.inner();
        match phase {
            // A failure after validation passed means the action broke an invariant.
            TransitionPhase::PostValidate => ErrorSeverity::Internal,
            TransitionPhase::PreValidate | TransitionPhase::Apply => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        self.inner().1.error_code()
    }
}
