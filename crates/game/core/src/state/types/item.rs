//! Item-related state types.
//!
//! Items live either in the player's inventory or in one of the three
//! equipment slots. Dungeon floors do not hold items yet.

use super::ItemId;

/// Broad item category, which also decides what `UseItem` does with it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemKind {
    Weapon,
    Armor,
    Accessory,
    Consumable,
    TokenModifier,
}

impl ItemKind {
    /// Equipment slot this kind occupies, if it is equippable.
    pub fn slot(self) -> Option<EquipmentSlot> {
        match self {
            ItemKind::Weapon => Some(EquipmentSlot::Weapon),
            ItemKind::Armor => Some(EquipmentSlot::Armor),
            ItemKind::Accessory => Some(EquipmentSlot::Accessory),
            ItemKind::Consumable | ItemKind::TokenModifier => None,
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemRarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Stat contributions of an item. Absent stats count as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStats {
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
    pub token_bonus: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    pub rarity: ItemRarity,
    pub stats: ItemStats,
    pub token_value: u64,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, kind: ItemKind, stats: ItemStats) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            rarity: ItemRarity::default(),
            stats,
            token_value: 0,
        }
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: ItemRarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_token_value(mut self, token_value: u64) -> Self {
        self.token_value = token_value;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

/// Items currently worn by the player.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub accessory: Option<Item>,
}

impl Equipment {
    pub fn slot(&self, slot: EquipmentSlot) -> Option<&Item> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
            EquipmentSlot::Accessory => self.accessory.as_ref(),
        }
    }

    /// Puts `item` into `slot`, returning whatever was equipped there before.
    pub fn equip(&mut self, slot: EquipmentSlot, item: Item) -> Option<Item> {
        let target = match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Accessory => &mut self.accessory,
        };
        target.replace(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.armor, &self.accessory]
            .into_iter()
            .flatten()
    }

    pub fn attack_bonus(&self) -> u32 {
        self.iter().map(|item| item.stats.attack).sum()
    }

    pub fn defense_bonus(&self) -> u32 {
        self.iter().map(|item| item.stats.defense).sum()
    }
}
