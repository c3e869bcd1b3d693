//! Player intents as they arrive from the presentation layer.
//!
//! Intents are JSON objects of the form
//! `{"type": "APPLY_BUFF", "payload": {"buff": "tokenBonus", "value": 0.5}}`.
//! Unknown intent types, directions and buff keys are rejected here, before
//! anything reaches the engine.

use gnome_core::{
    Action, BuffKind, CardinalDirection, CollectPickupAction, EnemyId, ItemId, LeaveDungeonAction,
    LevelUpAction, MineId,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntentError {
    #[error("malformed intent: {0}")]
    Malformed(String),

    #[error("unknown direction {0:?}")]
    UnknownDirection(String),
}

impl From<serde_json::Error> for IntentError {
    fn from(error: serde_json::Error) -> Self {
        IntentError::Malformed(error.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase",
    deny_unknown_fields
)]
pub enum PlayerIntent {
    MovePlayer { direction: String },
    StartCombat { enemy_id: u32 },
    CollectTokens { amount: u64 },
    CollectPickup,
    UseItem { item_id: u32 },
    LevelUp,
    ApplyBuff { buff: BuffKind, value: f64 },
    LeaveDungeon,
    UpgradeMine { mine_id: u32 },
}

impl PlayerIntent {
    pub fn from_json(json: &str) -> Result<Self, IntentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_action(self) -> Result<Action, IntentError> {
        let action = match self {
            PlayerIntent::MovePlayer { direction } => {
                let direction = direction
                    .parse::<CardinalDirection>()
                    .map_err(|_| IntentError::UnknownDirection(direction))?;
                Action::step(direction)
            }
            PlayerIntent::StartCombat { enemy_id } => Action::start_combat(EnemyId(enemy_id)),
            PlayerIntent::CollectTokens { amount } => Action::collect_tokens(amount),
            PlayerIntent::CollectPickup => CollectPickupAction.into(),
            PlayerIntent::UseItem { item_id } => Action::use_item(ItemId(item_id)),
            PlayerIntent::LevelUp => LevelUpAction.into(),
            PlayerIntent::ApplyBuff { buff, value } => Action::apply_buff(buff, value),
            PlayerIntent::LeaveDungeon => LeaveDungeonAction.into(),
            PlayerIntent::UpgradeMine { mine_id } => Action::upgrade_mine(MineId(mine_id)),
        };
        Ok(action)
    }
}

/// Parses a JSON intent straight into an engine action.
pub fn parse_intent(json: &str) -> Result<Action, IntentError> {
    PlayerIntent::from_json(json)?.into_action()
}
