//! Economy and combat modifiers.
//!
//! Buff keys are a closed set. Anything outside [`BuffKind`] fails to parse,
//! so callers cannot inject arbitrary fields into the buff table.

use super::Millis;

/// Named buff tracked in [`ActiveBuffs`].
///
/// String forms use the camelCase keys exchanged with the presentation layer
/// (`tokenBonus`, `attackBonus`, `defenseBonus`).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase")]
pub enum BuffKind {
    /// Multiplier applied to every token credit.
    TokenBonus,
    /// Flat bonus added to the player's attack in combat.
    AttackBonus,
    /// Flat bonus added to the player's defense in combat.
    DefenseBonus,
}

/// Current buff values. Buffs never expire on their own.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveBuffs {
    pub token_bonus: f64,
    pub attack_bonus: f64,
    pub defense_bonus: f64,
}

impl ActiveBuffs {
    pub const fn new() -> Self {
        Self {
            token_bonus: 1.0,
            attack_bonus: 0.0,
            defense_bonus: 0.0,
        }
    }

    pub fn get(&self, kind: BuffKind) -> f64 {
        match kind {
            BuffKind::TokenBonus => self.token_bonus,
            BuffKind::AttackBonus => self.attack_bonus,
            BuffKind::DefenseBonus => self.defense_bonus,
        }
    }

    pub fn get_mut(&mut self, kind: BuffKind) -> &mut f64 {
        match kind {
            BuffKind::TokenBonus => &mut self.token_bonus,
            BuffKind::AttackBonus => &mut self.attack_bonus,
            BuffKind::DefenseBonus => &mut self.defense_bonus,
        }
    }

    /// Adds `value` to the named buff.
    pub fn add(&mut self, kind: BuffKind, value: f64) {
        *self.get_mut(kind) += value;
    }

    /// Applies the token bonus to a raw amount, flooring after multiplication.
    pub fn scale_tokens(&self, amount: u64) -> u64 {
        let scaled = (amount as f64 * self.token_bonus).floor();
        if scaled.is_finite() && scaled > 0.0 {
            scaled as u64
        } else {
            0
        }
    }
}

impl Default for ActiveBuffs {
    fn default() -> Self {
        Self::new()
    }
}

/// Time-limited or permanent tap multiplier owned by the player.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Booster {
    pub id: String,
    pub name: String,
    pub multiplier: f64,
    /// `None` means the booster never expires.
    pub expires_at: Option<Millis>,
}

impl Booster {
    pub fn new(id: impl Into<String>, name: impl Into<String>, multiplier: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            multiplier,
            expires_at: None,
        }
    }

    #[must_use]
    pub fn expiring_at(mut self, at: Millis) -> Self {
        self.expires_at = Some(at);
        self
    }

    pub fn is_active(&self, now: Millis) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}
