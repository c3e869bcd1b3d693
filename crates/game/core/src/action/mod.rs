//! Player intents as canonical actions.
//!
//! Every action implements [`ActionTransition`] and owns its error type.
//!
//! - `movement`: one-tile steps in a cardinal direction
//! - `combat`: one-shot fight resolution
//! - `tokens`: token credits and floor pickups
//! - `inventory`: consuming and equipping items
//! - `progression`: level-ups and buffs
//! - `expedition`: entering and leaving dungeons
//! - `tap`: tap rewards and profile sync
//! - `mining`: mine upgrades and collections
//! - `tasks`: one-time task rewards

mod combat;
mod expedition;
mod inventory;
mod mining;
mod movement;
mod progression;
mod tap;
mod tasks;
mod tokens;
mod transition;

pub use combat::{CombatError, CombatOutcome, CombatReport, StartCombatAction};
pub use expedition::{EnterDungeonAction, ExpeditionError, LeaveDungeonAction};
pub use inventory::{ItemUse, UseItemAction, UseItemError};
pub use mining::{CollectMineAction, MineError, UpgradeMineAction};
pub use movement::{CardinalDirection, MoveAction, MoveError};
pub use progression::{ApplyBuffAction, BuffError, LevelUpAction};
pub use tap::{SyncProfileAction, TapAction, TapError};
pub use tasks::{CompleteTaskAction, SyncTasksAction, TaskError};
pub use tokens::{CollectPickupAction, CollectTokensAction, PickupError};
pub use transition::ActionTransition;

use crate::dungeon::Dungeon;
use crate::state::{Booster, BuffKind, EnemyId, ItemId, Millis, MineId, Position, Task, TaskId};

/// Top-level action enum consumed by the engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    Move(MoveAction),
    StartCombat(StartCombatAction),
    CollectTokens(CollectTokensAction),
    CollectPickup(CollectPickupAction),
    UseItem(UseItemAction),
    LevelUp(LevelUpAction),
    ApplyBuff(ApplyBuffAction),
    EnterDungeon(EnterDungeonAction),
    LeaveDungeon(LeaveDungeonAction),
    Tap(TapAction),
    SyncProfile(SyncProfileAction),
    UpgradeMine(UpgradeMineAction),
    CollectMine(CollectMineAction),
    CompleteTask(CompleteTaskAction),
    SyncTasks(SyncTasksAction),
}

impl Action {
    pub fn step(direction: CardinalDirection) -> Self {
        Self::Move(MoveAction::new(direction))
    }

    pub fn start_combat(enemy: EnemyId) -> Self {
        Self::StartCombat(StartCombatAction::new(enemy))
    }

    pub fn collect_tokens(amount: u64) -> Self {
        Self::CollectTokens(CollectTokensAction::new(amount))
    }

    pub fn use_item(item: ItemId) -> Self {
        Self::UseItem(UseItemAction::new(item))
    }

    pub fn apply_buff(kind: BuffKind, value: f64) -> Self {
        Self::ApplyBuff(ApplyBuffAction::new(kind, value))
    }

    pub fn enter_dungeon(dungeon: Dungeon) -> Self {
        Self::EnterDungeon(EnterDungeonAction::new(dungeon))
    }

    pub fn tap(at: Millis) -> Self {
        Self::Tap(TapAction::new(at))
    }

    pub fn sync_profile(rank: u32, boosters: Vec<Booster>, at: Millis) -> Self {
        Self::SyncProfile(SyncProfileAction::new(rank, boosters, at))
    }

    pub fn upgrade_mine(mine: MineId) -> Self {
        Self::UpgradeMine(UpgradeMineAction::new(mine))
    }

    pub fn collect_mine(mine: MineId, at: Millis) -> Self {
        Self::CollectMine(CollectMineAction::new(mine, at))
    }

    pub fn complete_task(task: TaskId) -> Self {
        Self::CompleteTask(CompleteTaskAction::new(task))
    }

    pub fn sync_tasks(tasks: Vec<Task>) -> Self {
        Self::SyncTasks(SyncTasksAction::new(tasks))
    }

    /// Snake-case name used in logs and event payloads.
    pub fn as_snake_case(&self) -> &'static str {
        match self {
            Action::Move(_) => "move",
            Action::StartCombat(_) => "start_combat",
            Action::CollectTokens(_) => "collect_tokens",
            Action::CollectPickup(_) => "collect_pickup",
            Action::UseItem(_) => "use_item",
            Action::LevelUp(_) => "level_up",
            Action::ApplyBuff(_) => "apply_buff",
            Action::EnterDungeon(_) => "enter_dungeon",
            Action::LeaveDungeon(_) => "leave_dungeon",
            Action::Tap(_) => "tap",
            Action::SyncProfile(_) => "sync_profile",
            Action::UpgradeMine(_) => "upgrade_mine",
            Action::CollectMine(_) => "collect_mine",
            Action::CompleteTask(_) => "complete_task",
            Action::SyncTasks(_) => "sync_tasks",
        }
    }
}

macro_rules! impl_from_transition {
    ($($variant:ident($transition:ty)),+ $(,)?) => {
        $(
            impl From<$transition> for Action {
                fn from(action: $transition) -> Self {
                    Self::$variant(action)
                }
            }
        )+
    };
}

impl_from_transition!(
    Move(MoveAction),
    StartCombat(StartCombatAction),
    CollectTokens(CollectTokensAction),
    CollectPickup(CollectPickupAction),
    UseItem(UseItemAction),
    LevelUp(LevelUpAction),
    ApplyBuff(ApplyBuffAction),
    EnterDungeon(EnterDungeonAction),
    LeaveDungeon(LeaveDungeonAction),
    Tap(TapAction),
    SyncProfile(SyncProfileAction),
    UpgradeMine(UpgradeMineAction),
    CollectMine(CollectMineAction),
    CompleteTask(CompleteTaskAction),
    SyncTasks(SyncTasksAction),
);

/// Action-specific result returned by the engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionResult {
    Moved { to: Position },
    Combat(CombatReport),
    TokensCollected { credited: u64 },
    ItemUsed(ItemUse),
    LeveledUp { level: u32 },
    BuffApplied { kind: BuffKind, total: f64 },
    DungeonEntered { entrance: Position },
    DungeonLeft,
    Tapped { reward: f64 },
    ProfileSynced { tap_power: f64 },
    MineUpgraded { mine: MineId, level: u32 },
    MineCollected { mine: MineId, amount: f64 },
    TaskCompleted { task: TaskId, reward: f64 },
    TasksSynced { open: usize },
}
