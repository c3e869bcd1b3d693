use crate::action::ActionTransition;
use crate::error::{ErrorSeverity, GameError, NeverError};
use crate::state::{GameState, Position};

/// Credits `floor(amount * token_bonus)` tokens.
///
/// The engine does not know where the tokens came from. Callers collecting a
/// pickup from the floor should use [`CollectPickupAction`], which removes
/// the pickup in the same step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectTokensAction {
    pub amount: u64,
}

impl CollectTokensAction {
    pub fn new(amount: u64) -> Self {
        Self { amount }
    }
}

impl ActionTransition for CollectTokensAction {
    type Error = NeverError;
    type Result = u64;

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let credited = state.active_buffs.scale_tokens(self.amount);
        state.tokens = state.tokens.saturating_add(credited);
        Ok(credited)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PickupError {
    #[error("no dungeon entered")]
    NoDungeon,

    #[error("no tokens at {0}")]
    NothingHere(Position),
}

impl GameError for PickupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            PickupError::NoDungeon => ErrorSeverity::Validation,
            PickupError::NothingHere(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            PickupError::NoDungeon => "PICKUP_NO_DUNGEON",
            PickupError::NothingHere(_) => "PICKUP_NOTHING_HERE",
        }
    }
}

/// Picks up the tokens lying on the player's tile.
///
/// The pickup is removed from a derived copy of the dungeon, so repeating
/// the action on the same tile is rejected instead of paying out twice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectPickupAction;

impl ActionTransition for CollectPickupAction {
    type Error = PickupError;
    type Result = u64;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        let dungeon = state.dungeon().ok_or(PickupError::NoDungeon)?;
        let position = state.player.position;
        dungeon
            .pickup_at(position)
            .map(|_| ())
            .ok_or(PickupError::NothingHere(position))
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let dungeon = state.dungeon().ok_or(PickupError::NoDungeon)?;
        let position = state.player.position;
        let pickup = dungeon
            .pickup_at(position)
            .ok_or(PickupError::NothingHere(position))?;

        let credited = state.active_buffs.scale_tokens(pickup.amount);
        let remaining = dungeon.without_pickup(position);

        state.current_dungeon = Some(remaining);
        state.tokens = state.tokens.saturating_add(credited);
        Ok(credited)
    }
}
