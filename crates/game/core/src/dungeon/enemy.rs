use crate::config::GameConfig;
use crate::state::{EnemyId, Position};

/// Enemy archetypes that can spawn in a dungeon.
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
pub enum EnemyKind {
    Goblin,
    Skeleton,
    Mimic,
    CursedMerchant,
}

impl EnemyKind {
    /// Spawn table, sampled uniformly by the generator.
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Goblin,
        EnemyKind::Skeleton,
        EnemyKind::Mimic,
        EnemyKind::CursedMerchant,
    ];

    pub const fn glyph(self) -> char {
        match self {
            EnemyKind::Goblin => 'g',
            EnemyKind::Skeleton => 's',
            EnemyKind::Mimic => 'm',
            EnemyKind::CursedMerchant => 'c',
        }
    }

    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'g' => Some(EnemyKind::Goblin),
            's' => Some(EnemyKind::Skeleton),
            'm' => Some(EnemyKind::Mimic),
            'c' => Some(EnemyKind::CursedMerchant),
            _ => None,
        }
    }
}

/// Combat stats for an enemy, derived from dungeon difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyStats {
    pub health: u32,
    pub attack: u32,
    pub defense: u32,
    pub experience_reward: u64,
}

impl EnemyStats {
    /// Linear scaling:
    /// health `10 + 2d`, attack `5 + d`, defense `2 + d/2`, experience `10 + 5d`.
    pub fn for_difficulty(difficulty: u32) -> Self {
        Self {
            health: GameConfig::ENEMY_BASE_HEALTH
                .saturating_add(difficulty.saturating_mul(GameConfig::ENEMY_HEALTH_PER_DIFFICULTY)),
            attack: GameConfig::ENEMY_BASE_ATTACK.saturating_add(difficulty),
            defense: GameConfig::ENEMY_BASE_DEFENSE.saturating_add(difficulty / 2),
            experience_reward: GameConfig::ENEMY_BASE_EXPERIENCE.saturating_add(
                u64::from(difficulty) * GameConfig::ENEMY_EXPERIENCE_PER_DIFFICULTY,
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub position: Position,
    pub health: u32,
    pub attack: u32,
    pub defense: u32,
    pub token_reward: u64,
    pub experience_reward: u64,
}

impl Enemy {
    pub fn spawn(
        id: EnemyId,
        kind: EnemyKind,
        position: Position,
        difficulty: u32,
        token_reward: u64,
    ) -> Self {
        let stats = EnemyStats::for_difficulty(difficulty);
        Self {
            id,
            kind,
            position,
            health: stats.health,
            attack: stats.attack,
            defense: stats.defense,
            token_reward,
            experience_reward: stats.experience_reward,
        }
    }
}

/// Tokens lying on a tile, consumed by a single collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenPickup {
    pub position: Position,
    pub amount: u64,
}

impl TokenPickup {
    pub const fn new(position: Position, amount: u64) -> Self {
        Self { position, amount }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_scale_with_difficulty() {
        assert_eq!(
            EnemyStats::for_difficulty(0),
            EnemyStats {
                health: 10,
                attack: 5,
                defense: 2,
                experience_reward: 10,
            }
        );
        assert_eq!(
            EnemyStats::for_difficulty(3),
            EnemyStats {
                health: 16,
                attack: 8,
                defense: 3,
                experience_reward: 25,
            }
        );
    }

    #[test]
    fn glyphs_round_trip() {
        for kind in EnemyKind::ALL {
            assert_eq!(EnemyKind::from_glyph(kind.glyph()), Some(kind));
        }
        assert_eq!(EnemyKind::from_glyph('#'), None);
    }

    #[test]
    fn kind_names_parse_case_insensitively() {
        assert_eq!(
            "CURSED_MERCHANT".parse::<EnemyKind>(),
            Ok(EnemyKind::CursedMerchant)
        );
        assert_eq!(EnemyKind::Goblin.to_string(), "goblin");
    }
}
