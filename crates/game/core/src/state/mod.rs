//! Authoritative game state representation.
//!
//! [`GameState`] is the root aggregate persisted, cached and rendered by
//! outer layers. It changes only through the engine.
pub mod types;

pub use types::{
    ActiveBuffs, Booster, BuffKind, EnemyId, Equipment, EquipmentSlot, Item, ItemId, ItemKind,
    ItemRarity, ItemStats, Millis, Mine, MineId, PlayerState, Position, ResourceMeter, Task,
    TaskId, TaskKind,
};

use crate::config::GameConfig;
use crate::dungeon::Dungeon;
use crate::economy;

/// 32-byte SHA-256 over the bincode encoding of a [`GameState`].
pub type StateDigest = [u8; 32];

/// Canonical snapshot of the game.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub player: PlayerState,
    /// Replaced wholesale when the player enters a new level.
    pub current_dungeon: Option<Dungeon>,
    pub active_buffs: ActiveBuffs,
    /// Balance credited by dungeon play.
    pub tokens: u64,
    /// Lifetime earnings from taps, tasks and mines.
    pub total_earned: f64,
    /// Balance of the GNOME asset.
    pub gnome_balance: f64,
    /// Player rank from the session profile.
    pub rank: u32,
    /// Derived from `rank` and `boosters`; recomputed on every tap.
    pub tap_power: f64,
    pub boosters: Vec<Booster>,
    pub mines: Vec<Mine>,
    pub tasks: Vec<Task>,
    /// Epoch millis of the last accepted tap.
    pub last_tap_at: Option<Millis>,
    /// Epoch millis of the last daily spin.
    pub last_spin_at: Option<Millis>,
    /// Number of actions accepted so far.
    pub nonce: u64,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            player: PlayerState::default(),
            current_dungeon: None,
            active_buffs: ActiveBuffs::new(),
            tokens: 0,
            total_earned: 0.0,
            gnome_balance: 0.0,
            rank: 0,
            tap_power: economy::tap_power(0, &[], 0),
            boosters: Vec::new(),
            mines: Vec::new(),
            tasks: Vec::new(),
            last_tap_at: None,
            last_spin_at: None,
            nonce: 0,
        }
    }

    /// Seeds a state from profile data held by the session provider.
    ///
    /// The player starts with one level 1 mine accruing from `now`.
    pub fn for_profile(
        rank: u32,
        total_earned: f64,
        boosters: Vec<Booster>,
        last_spin_at: Option<Millis>,
        now: Millis,
    ) -> Self {
        Self {
            total_earned,
            rank,
            tap_power: economy::tap_power(rank, &boosters, now),
            boosters,
            mines: vec![Mine::starter(MineId(GameConfig::STARTER_MINE), now)],
            last_spin_at,
            ..Self::new()
        }
    }

    /// Attaches a dungeon without moving the player or touching sigils.
    #[must_use]
    pub fn with_dungeon(mut self, dungeon: Dungeon) -> Self {
        self.current_dungeon = Some(dungeon);
        self
    }

    pub fn dungeon(&self) -> Option<&Dungeon> {
        self.current_dungeon.as_ref()
    }

    pub fn player_level(&self) -> u32 {
        self.player.level
    }

    pub fn mine(&self, id: MineId) -> Option<&Mine> {
        self.mines.iter().find(|mine| mine.id == id)
    }

    pub(crate) fn mine_mut(&mut self, id: MineId) -> Option<&mut Mine> {
        self.mines.iter_mut().find(|mine| mine.id == id)
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub(crate) fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| &task.id == id)
    }

    /// Credits earnings to both the lifetime total and the GNOME balance.
    pub(crate) fn credit_gnome(&mut self, amount: f64) {
        self.total_earned += amount;
        self.gnome_balance += amount;
    }

    /// Deterministic fingerprint used for change detection.
    ///
    /// # Panics
    ///
    /// If bincode cannot encode the state. Every field is a plain value, so
    /// encoding into a `Vec` never fails.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> StateDigest {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self).expect("GameState serialization should not fail");
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hasher.finalize().into()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
