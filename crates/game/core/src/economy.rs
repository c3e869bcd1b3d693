//! Tap economy.
//!
//! Boosters stack additively: with multipliers `0.5` and `1.0` active, the
//! booster factor is `1 + 0.5 + 1.0 = 2.5`. Expired boosters contribute
//! nothing.

use crate::config::GameConfig;
use crate::state::{Booster, Millis};

/// Sum of the multipliers of every booster active at `now`.
pub fn booster_sum(boosters: &[Booster], now: Millis) -> f64 {
    boosters
        .iter()
        .filter(|booster| booster.is_active(now))
        .map(|booster| booster.multiplier)
        .sum()
}

/// `base * (1 + rank * 0.1) * (1 + sum of active booster multipliers)`.
pub fn tap_power(rank: u32, boosters: &[Booster], now: Millis) -> f64 {
    let rank_factor = 1.0 + f64::from(rank) * GameConfig::TAP_POWER_PER_RANK;
    GameConfig::BASE_TAP_POWER * rank_factor * (1.0 + booster_sum(boosters, now))
}

/// Reward credited for one tap: `tap_power * (1 + sum of active booster multipliers)`.
pub fn tap_reward(tap_power: f64, boosters: &[Booster], now: Millis) -> f64 {
    tap_power * (1.0 + booster_sum(boosters, now))
}
