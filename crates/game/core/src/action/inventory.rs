use crate::action::ActionTransition;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{EquipmentSlot, GameState, ItemId, ItemKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UseItemError {
    #[error("{0} is not in the inventory")]
    NotInInventory(ItemId),
}

impl GameError for UseItemError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            UseItemError::NotInInventory(_) => "USE_ITEM_NOT_IN_INVENTORY",
        }
    }
}

/// What using an item did.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemUse {
    /// Consumable drunk; carries the health actually restored.
    Healed { restored: u32 },
    /// Token modifier consumed; carries the token bonus added.
    TokenBonusRaised { by: f64 },
    /// Equippable moved into its slot. The replaced item, if any, went back
    /// to the inventory.
    Equipped {
        slot: EquipmentSlot,
        replaced: Option<ItemId>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseItemAction {
    pub item: ItemId,
}

impl UseItemAction {
    pub fn new(item: ItemId) -> Self {
        Self { item }
    }
}

impl ActionTransition for UseItemAction {
    type Error = UseItemError;
    type Result = ItemUse;

    fn pre_validate(&self, state: &GameState) -> Result<(), Self::Error> {
        state
            .player
            .item(self.item)
            .map(|_| ())
            .ok_or(UseItemError::NotInInventory(self.item))
    }

    fn apply(&self, state: &mut GameState) -> Result<Self::Result, Self::Error> {
        let item = state
            .player
            .take_item(self.item)
            .ok_or(UseItemError::NotInInventory(self.item))?;

        let used = match (item.kind, item.kind.slot()) {
            (_, Some(slot)) => {
                let replaced = state.player.equipment.equip(slot, item);
                let replaced_id = replaced.as_ref().map(|previous| previous.id);
                state.player.inventory.extend(replaced);
                ItemUse::Equipped {
                    slot,
                    replaced: replaced_id,
                }
            }
            (ItemKind::TokenModifier, None) => {
                let by = item.stats.token_bonus;
                state.active_buffs.token_bonus += by;
                ItemUse::TokenBonusRaised { by }
            }
            (_, None) => {
                let restored = state.player.health.restore(item.stats.health);
                ItemUse::Healed { restored }
            }
        };

        Ok(used)
    }
}
