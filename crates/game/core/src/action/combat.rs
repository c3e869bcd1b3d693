//! Combat resolution.
//!
//! Combat is resolved in one action. The player strikes first, then the two
//! sides alternate until one of them reaches zero health. Each strike deals
//! `max(1, attack - defense)`, using the player's buff-adjusted stats.
//!
//! On victory the enemy is removed from a derived copy of the dungeon and its
//! rewards are credited (tokens scaled by the token bonus). On defeat the
//! player's health drops to zero and the enemy stays where it is.

use crate::action::ActionTransition;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{EnemyId, GameState, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatError {
    #[error("no dungeon entered")]
    NoDungeon,

    #[error("{0} not found in the current dungeon")]
    EnemyNotFound(EnemyId),

    #[error("{enemy} at {position} is out of reach")]
    OutOfReach { enemy: EnemyId, position: Position },

    #[error("player has no health left")]
    PlayerDown,
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CombatError::NoDungeon | CombatError::EnemyNotFound(_) => ErrorSeverity::Validation,
            CombatError::OutOfReach { .. } | CombatError::PlayerDown => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CombatError::NoDungeon => "COMBAT_NO_DUNGEON",
            CombatError::EnemyNotFound(_) => "COMBAT_ENEMY_NOT_FOUND",
            CombatError::OutOfReach { .. } => "COMBAT_OUT_OF_REACH",
            CombatError::PlayerDown => "COMBAT_PLAYER_DOWN",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartCombatAction {
    pub enemy: EnemyId,
}

impl StartCombatAction {
    pub fn new(enemy: EnemyId) -> Self {
        Self { enemy }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatOutcome {
    Victory { tokens: u64, experience: u64 },
    Defeat,
}

/// Summary of a resolved fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatReport {
    pub enemy: EnemyId,
    /// Number of player strikes.
    pub rounds: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub outcome: CombatOutcome,
}

impl CombatReport {
    pub fn is_victory(&self) -> bool {
        matches!(self.outcome, CombatOutcome::Victory { .. })
    }
}

fn strike(attack: u32, defense: u32) -> u32 {
    attack.saturating_sub(defense).max(1)
}

impl ActionTransition for StartCombatAction {
    type Error = CombatError;
    type Result = CombatReport;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let dungeon = state.dungeon().ok_or(CombatError::NoDungeon)?;
        let enemy = dungeon
            .enemy(self.enemy)
            .ok_or(CombatError::EnemyNotFound(self.enemy))?;

        if state.player.position.manhattan(enemy.position) > 1 {
            return Err(CombatError::OutOfReach {
                enemy: self.enemy,
                position: enemy.position,
            });
        }
        if state.player.is_down() {
            return Err(CombatError::PlayerDown);
        }

        Ok(())
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let dungeon = state.dungeon().ok_or(CombatError::NoDungeon)?;
        let enemy = dungeon
            .enemy(self.enemy)
            .ok_or(CombatError::EnemyNotFound(self.enemy))?;

        let player_strike = strike(
            state.player.effective_attack(&state.active_buffs),
            enemy.defense,
        );
        let enemy_strike = strike(
            enemy.attack,
            state.player.effective_defense(&state.active_buffs),
        );

        let mut enemy_health = enemy.health;
        let mut player_health = state.player.health.current;
        let mut rounds = 0;
        let mut damage_dealt = 0u32;
        let mut damage_taken = 0u32;

        let victory = loop {
            rounds += 1;
            let dealt = player_strike.min(enemy_health);
            enemy_health -= dealt;
            damage_dealt = damage_dealt.saturating_add(dealt);
            if enemy_health == 0 {
                break true;
            }

            let taken = enemy_strike.min(player_health);
            player_health -= taken;
            damage_taken = damage_taken.saturating_add(taken);
            if player_health == 0 {
                break false;
            }
        };

        let outcome = if victory {
            let tokens = state.active_buffs.scale_tokens(enemy.token_reward);
            let experience = enemy.experience_reward;
            let remaining = dungeon.without_enemy(self.enemy);

            state.current_dungeon = Some(remaining);
            state.tokens = state.tokens.saturating_add(tokens);
            state.player.experience = state.player.experience.saturating_add(experience);
            CombatOutcome::Victory { tokens, experience }
        } else {
            CombatOutcome::Defeat
        };
        state.player.health.current = player_health;

        Ok(CombatReport {
            enemy: self.enemy,
            rounds,
            damage_dealt,
            damage_taken,
            outcome,
        })
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let dungeon = state.dungeon().ok_or(CombatError::NoDungeon)?;
        let enemy_remains = dungeon.enemy(self.enemy).is_some();
        // Exactly one side is left standing.
        if enemy_remains == state.player.is_down() {
            Ok(())
        } else if enemy_remains {
            Err(CombatError::PlayerDown)
        } else {
            Err(CombatError::EnemyNotFound(self.enemy))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::Dungeon;

    fn arena(difficulty: u32) -> GameState {
        let dungeon = Dungeon::from_ascii("#####\n#.g.#\n#####", difficulty).expect("valid map");
        let mut state = GameState::new().with_dungeon(dungeon);
        state.player.position = Position::new(1, 1);
        state
    }

    #[test]
    fn player_wins_against_weak_enemy() {
        let mut state = arena(0);
        state.active_buffs.token_bonus = 2.0;

        let report = StartCombatAction::new(EnemyId(0))
            .apply(&mut state)
            .expect("apply");

        // Player 10 atk vs def 2 -> 8 per strike; enemy 10 hp falls on round 2.
        // Enemy 5 atk vs def 5 -> 1 per strike, one strike landed.
        assert_eq!(report.rounds, 2);
        assert_eq!(report.damage_dealt, 10);
        assert_eq!(report.damage_taken, 1);
        assert_eq!(
            report.outcome,
            CombatOutcome::Victory {
                tokens: 10,
                experience: 10
            }
        );
        assert_eq!(state.tokens, 10);
        assert_eq!(state.player.experience, 10);
        assert_eq!(state.player.health.current, 99);
        assert!(state.dungeon().expect("dungeon").enemies().is_empty());
        assert!(StartCombatAction::new(EnemyId(0)).post_validate(&state).is_ok());
    }

    #[test]
    fn defeat_zeroes_health_and_keeps_enemy() {
        let mut state = arena(200);
        state.player.health.current = 3;

        let report = StartCombatAction::new(EnemyId(0))
            .apply(&mut state)
            .expect("apply");

        assert_eq!(report.outcome, CombatOutcome::Defeat);
        assert_eq!(state.player.health.current, 0);
        assert!(state.dungeon().expect("dungeon").enemy(EnemyId(0)).is_some());
        assert_eq!(state.tokens, 0);
    }

    #[test]
    fn rejects_unknown_distant_or_downed() {
        let state = arena(0);
        assert_eq!(
            StartCombatAction::new(EnemyId(9)).pre_validate(&state),
            Err(CombatError::EnemyNotFound(EnemyId(9)))
        );

        let mut far = arena(0);
        far.player.position = Position::new(0, 0);
        assert!(matches!(
            StartCombatAction::new(EnemyId(0)).pre_validate(&far),
            Err(CombatError::OutOfReach { .. })
        ));

        let mut down = arena(0);
        down.player.health.current = 0;
        assert_eq!(
            StartCombatAction::new(EnemyId(0)).pre_validate(&down),
            Err(CombatError::PlayerDown)
        );
    }
}
