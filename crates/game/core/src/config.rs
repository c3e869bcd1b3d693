use crate::state::Position;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Width of generated dungeons. Must be odd and at least [`Self::MIN_DIMENSION`].
    pub dungeon_width: u32,
    /// Height of generated dungeons. Must be odd and at least [`Self::MIN_DIMENSION`].
    pub dungeon_height: u32,
}

impl GameConfig {
    // ===== dungeon generation =====
    /// Smallest odd dimension that still leaves an interior for the maze.
    pub const MIN_DIMENSION: u32 = 5;
    /// Fraction of the grid rolled as enemy candidates.
    pub const ENEMY_DENSITY: f64 = 0.15;
    /// Fraction of the grid budgeted for item drops.
    pub const ITEM_DENSITY: f64 = 0.1;
    /// Chance that a free floor tile holds a token pickup.
    pub const TOKEN_PICKUP_CHANCE: f64 = 0.2;
    /// Chance that a dungeon carries a sigil.
    pub const SIGIL_CHANCE: f64 = 0.3;

    // ===== enemy scaling (base + per difficulty) =====
    pub const ENEMY_BASE_HEALTH: u32 = 10;
    pub const ENEMY_HEALTH_PER_DIFFICULTY: u32 = 2;
    pub const ENEMY_BASE_ATTACK: u32 = 5;
    pub const ENEMY_BASE_DEFENSE: u32 = 2;
    pub const ENEMY_BASE_EXPERIENCE: u64 = 10;
    pub const ENEMY_EXPERIENCE_PER_DIFFICULTY: u64 = 5;
    /// Enemy token reward is drawn from `[MIN, MAX)` before the multiplier.
    pub const ENEMY_REWARD_MIN: f64 = 5.0;
    pub const ENEMY_REWARD_MAX: f64 = 15.0;
    /// Pickup amount is drawn from `[MIN, MAX)` before the multiplier.
    pub const PICKUP_MIN: f64 = 1.0;
    pub const PICKUP_MAX: f64 = 6.0;

    // ===== player =====
    pub const PLAYER_START: Position = Position::new(1, 1);
    pub const PLAYER_BASE_HEALTH: u32 = 100;
    pub const PLAYER_BASE_ATTACK: u32 = 10;
    pub const PLAYER_BASE_DEFENSE: u32 = 5;
    pub const LEVEL_UP_HEALTH: u32 = 10;
    pub const LEVEL_UP_ATTACK: u32 = 2;
    pub const LEVEL_UP_DEFENSE: u32 = 1;
    pub const EXPERIENCE_PER_LEVEL: u64 = 100;

    // ===== tap economy =====
    pub const BASE_TAP_POWER: f64 = 1.0;
    pub const TAP_POWER_PER_RANK: f64 = 0.1;

    // ===== mines =====
    pub const STARTER_MINE: u32 = 1;
    /// GNOME per hour of a level 1 mine.
    pub const MINE_BASE_PRODUCTION: f64 = 1.0;
    pub const MINE_BASE_UPGRADE_PRICE: f64 = 100.0;
    pub const MINE_PRODUCTION_GROWTH: f64 = 1.5;
    pub const MINE_PRICE_GROWTH: f64 = 2.0;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DUNGEON_SIZE: u32 = 15;

    pub fn new() -> Self {
        Self {
            dungeon_width: Self::DEFAULT_DUNGEON_SIZE,
            dungeon_height: Self::DEFAULT_DUNGEON_SIZE,
        }
    }

    pub fn with_dungeon_size(width: u32, height: u32) -> Self {
        Self {
            dungeon_width: width,
            dungeon_height: height,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
