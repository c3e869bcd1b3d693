use crate::action::ActionTransition;
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError, NeverError};
use crate::state::{BuffKind, GameState};

/// Raises the player one level.
///
/// Max health grows by 10 and health refills to the new maximum; attack grows
/// by 2 and defense by 1. Experience is not consumed: whether the player has
/// earned the level is the caller's decision (see
/// [`PlayerState::can_level_up`](crate::state::PlayerState::can_level_up)).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUpAction;

impl ActionTransition for LevelUpAction {
    type Error = NeverError;
    type Result = u32;

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let player = &mut state.player;
        player.level = player.level.saturating_add(1);
        player.health.maximum = player
            .health
            .maximum
            .saturating_add(GameConfig::LEVEL_UP_HEALTH);
        player.health.current = player.health.maximum;
        player.attack = player.attack.saturating_add(GameConfig::LEVEL_UP_ATTACK);
        player.defense = player.defense.saturating_add(GameConfig::LEVEL_UP_DEFENSE);
        Ok(player.level)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffError {
    #[error("buff {kind} cannot take non-finite value {value}")]
    NonFinite { kind: BuffKind, value: f64 },
}

impl GameError for BuffError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            BuffError::NonFinite { .. } => "BUFF_NON_FINITE",
        }
    }
}

/// Adds `value` to one buff. Repeated applications to the same buff sum.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyBuffAction {
    pub kind: BuffKind,
    pub value: f64,
}

impl ApplyBuffAction {
    pub fn new(kind: BuffKind, value: f64) -> Self {
        Self { kind, value }
    }
}

impl ActionTransition for ApplyBuffAction {
    type Error = BuffError;
    type Result = f64;

    fn pre_validate(&self, _state: &GameState) -> Result<(), Self::Error> {
        if self.value.is_finite() {
            Ok(())
        } else {
            Err(BuffError::NonFinite {
                kind: self.kind,
                value: self.value,
            })
        }
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        state.active_buffs.add(self.kind, self.value);
        Ok(state.active_buffs.get(self.kind))
    }

    fn post_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let value = state.active_buffs.get(self.kind);
        if value.is_finite() {
            Ok(())
        } else {
            Err(BuffError::NonFinite {
                kind: self.kind,
                value,
            })
        }
    }
}
