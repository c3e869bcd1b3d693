//! Dungeon-wide modifiers.
//!
//! A sigil is plain data: its [`SigilEffect`] is interpreted by [`activate`]
//! and [`deactivate`], which the engine calls when a dungeon is entered or
//! left.

use crate::state::ActiveBuffs;

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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SigilKind {
    DoubleRewards,
    CursedTokens,
}

impl SigilKind {
    /// Catalog the generator draws from.
    pub const CATALOG: [SigilKind; 2] = [SigilKind::DoubleRewards, SigilKind::CursedTokens];

    pub const fn multiplier(self) -> f64 {
        match self {
            SigilKind::DoubleRewards => 2.0,
            SigilKind::CursedTokens => 1.5,
        }
    }

    /// Narrative cost shown to the player. Not enforced mechanically.
    pub const fn description(self) -> &'static str {
        match self {
            SigilKind::DoubleRewards => "Double all token rewards, but enemies are stronger",
            SigilKind::CursedTokens => "Increased token drops, but each token deals 1 damage",
        }
    }
}

/// Effect interpreted by the engine while the sigil's dungeon is current.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SigilEffect {
    /// Multiplies the token bonus on activation, divides it on deactivation.
    ScaleTokenBonus { factor: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sigil {
    pub kind: SigilKind,
    pub multiplier: f64,
    pub effect: SigilEffect,
}

impl Sigil {
    pub fn from_kind(kind: SigilKind) -> Self {
        let multiplier = kind.multiplier();
        Self {
            kind,
            multiplier,
            effect: SigilEffect::ScaleTokenBonus { factor: multiplier },
        }
    }

    pub fn description(&self) -> &'static str {
        self.kind.description()
    }
}

impl From<SigilKind> for Sigil {
    fn from(kind: SigilKind) -> Self {
        Self::from_kind(kind)
    }
}

pub fn activate(sigil: &Sigil, buffs: &mut ActiveBuffs) {
    match sigil.effect {
        SigilEffect::ScaleTokenBonus { factor } => buffs.token_bonus *= factor,
    }
}

/// Reverses [`activate`]. A zero factor is treated as a no-op.
pub fn deactivate(sigil: &Sigil, buffs: &mut ActiveBuffs) {
    match sigil.effect {
        SigilEffect::ScaleTokenBonus { factor } => {
            if factor != 0.0 {
                buffs.token_bonus /= factor;
            }
        }
    }
}
