use std::fmt;

use crate::config::GameConfig;
use crate::state::Millis;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Identifier of a mine owned by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MineId(pub u32);

impl fmt::Display for MineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mine#{}", self.0)
    }
}

/// Passive GNOME producer, independent of dungeon play.
///
/// Production accrues per hour since `last_collected` and is credited by a
/// collection.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mine {
    pub id: MineId,
    pub level: u32,
    pub base_production: f64,
    /// GNOME per hour.
    pub current_production: f64,
    pub upgrade_price: f64,
    pub last_collected: Millis,
}

impl Mine {
    /// Level 1 mine that starts accruing at `now`.
    pub fn starter(id: MineId, now: Millis) -> Self {
        Self {
            id,
            level: 1,
            base_production: GameConfig::MINE_BASE_PRODUCTION,
            current_production: GameConfig::MINE_BASE_PRODUCTION,
            upgrade_price: GameConfig::MINE_BASE_UPGRADE_PRICE,
            last_collected: now,
        }
    }

    /// GNOME accrued between the last collection and `now`.
    pub fn pending(&self, now: Millis) -> f64 {
        let elapsed = now.saturating_sub(self.last_collected) as f64;
        self.current_production * elapsed / MILLIS_PER_HOUR
    }

    /// Next level: production grows by half, the price doubles.
    pub fn upgrade(&mut self) {
        self.level = self.level.saturating_add(1);
        self.base_production *= GameConfig::MINE_PRODUCTION_GROWTH;
        self.current_production *= GameConfig::MINE_PRODUCTION_GROWTH;
        self.upgrade_price *= GameConfig::MINE_PRICE_GROWTH;
    }
}
