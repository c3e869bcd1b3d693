use crate::config::GameConfig;

/// Input to the dungeon generator.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DungeonConfig {
    pub width: u32,
    pub height: u32,
    /// Scales enemy stats linearly. Usually the player's level.
    pub difficulty: u32,
    /// Scales every token amount rolled during generation.
    pub token_multiplier: f64,
}

impl DungeonConfig {
    pub const fn new(width: u32, height: u32, difficulty: u32, token_multiplier: f64) -> Self {
        Self {
            width,
            height,
            difficulty,
            token_multiplier,
        }
    }

    /// Rejects configurations the maze carve cannot handle.
    ///
    /// Both dimensions must be odd and at least [`GameConfig::MIN_DIMENSION`];
    /// the token multiplier must be finite and positive.
    pub fn validate(&self) -> Result<(), DungeonError> {
        for (axis, value) in [(Axis::Width, self.width), (Axis::Height, self.height)] {
            if value < GameConfig::MIN_DIMENSION {
                return Err(DungeonError::TooSmall {
                    axis,
                    value,
                    minimum: GameConfig::MIN_DIMENSION,
                });
            }
            if value % 2 == 0 {
                return Err(DungeonError::EvenDimension { axis, value });
            }
        }

        if !self.token_multiplier.is_finite() || self.token_multiplier <= 0.0 {
            return Err(DungeonError::InvalidTokenMultiplier(self.token_multiplier));
        }

        Ok(())
    }

    /// Number of enemy candidates rolled: `floor(width * height * 0.15)`.
    pub fn enemy_budget(&self) -> usize {
        self.density_budget(GameConfig::ENEMY_DENSITY)
    }

    /// Number of item drops budgeted: `floor(width * height * 0.1)`.
    ///
    /// The generator does not place items yet; the budget is exposed so that
    /// item placement can be added without changing the config surface.
    pub fn item_budget(&self) -> usize {
        self.density_budget(GameConfig::ITEM_DENSITY)
    }

    fn density_budget(&self, density: f64) -> usize {
        (f64::from(self.width) * f64::from(self.height) * density).floor() as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Axis {
    Width,
    Height,
}

/// Configuration errors, raised before any generation work starts.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DungeonError {
    #[error("dungeon {axis} {value} is below the minimum of {minimum}")]
    TooSmall { axis: Axis, value: u32, minimum: u32 },

    #[error("dungeon {axis} {value} must be odd")]
    EvenDimension { axis: Axis, value: u32 },

    #[error("token multiplier {0} must be a positive finite number")]
    InvalidTokenMultiplier(f64),

    #[error("map row {row} has width {found}, expected {expected}")]
    RaggedMap {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("unknown map glyph {glyph:?} at {x},{y}")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
}
