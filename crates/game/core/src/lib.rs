//! Deterministic game rules for the gnome tap-to-earn game.
//!
//! `gnome-core` holds the procedural dungeon generator, the canonical game
//! state, and the actions that change it. It performs no I/O and never reads
//! a clock or an ambient random source: timestamps arrive inside actions and
//! the generator takes its random stream as an argument.
//!
//! All state mutation flows through [`engine::GameEngine`] (or the total
//! [`engine::reduce`]), and the runtime depends on the types re-exported
//! here.
pub mod action;
pub mod config;
pub mod dungeon;
pub mod economy;
pub mod engine;
pub mod error;
pub mod state;

pub use action::{
    Action, ActionResult, ActionTransition, ApplyBuffAction, CardinalDirection,
    CollectMineAction, CollectPickupAction, CollectTokensAction, CombatError, CombatOutcome,
    CombatReport, CompleteTaskAction, EnterDungeonAction, ExpeditionError, ItemUse,
    LeaveDungeonAction, LevelUpAction, MineError, MoveAction, MoveError, PickupError,
    StartCombatAction, SyncProfileAction, SyncTasksAction, TapAction, TaskError,
    UpgradeMineAction, UseItemAction,
};
pub use config::GameConfig;
pub use dungeon::{
    Dungeon, DungeonConfig, DungeonError, Enemy, EnemyKind, Sigil, SigilEffect, SigilKind, Tile,
    TileKind, TokenPickup, generate,
};
pub use engine::{
    ExecuteError, ExecutionOutcome, GameEngine, TransitionPhase, TransitionPhaseError, reduce,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    ActiveBuffs, Booster, BuffKind, EnemyId, GameState, Item, ItemId, ItemKind, Millis, Mine,
    MineId, PlayerState, Position, StateDigest, Task, TaskId, TaskKind,
};
