use crate::config::GameConfig;

use super::{ActiveBuffs, Equipment, Item, ItemId, Position, ResourceMeter};

/// The player's avatar. Persists across dungeons; only `position` resets when
/// a new dungeon is entered.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub position: Position,
    pub health: ResourceMeter,
    pub attack: u32,
    pub defense: u32,
    pub inventory: Vec<Item>,
    pub equipment: Equipment,
    pub experience: u64,
    pub level: u32,
}

impl PlayerState {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            health: ResourceMeter::full(GameConfig::PLAYER_BASE_HEALTH),
            attack: GameConfig::PLAYER_BASE_ATTACK,
            defense: GameConfig::PLAYER_BASE_DEFENSE,
            inventory: Vec::new(),
            equipment: Equipment::default(),
            experience: 0,
            level: 1,
        }
    }

    #[must_use]
    pub fn with_inventory(mut self, inventory: Vec<Item>) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn is_down(&self) -> bool {
        self.health.is_empty()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.inventory.iter().find(|item| item.id == id)
    }

    /// Removes an item from the inventory, preserving the order of the rest.
    pub fn take_item(&mut self, id: ItemId) -> Option<Item> {
        let index = self.inventory.iter().position(|item| item.id == id)?;
        Some(self.inventory.remove(index))
    }

    /// Attack used in combat: base + equipment + attack buff (floored, never negative).
    pub fn effective_attack(&self, buffs: &ActiveBuffs) -> u32 {
        combine(self.attack + self.equipment.attack_bonus(), buffs.attack_bonus)
    }

    /// Defense used in combat: base + equipment + defense buff (floored, never negative).
    pub fn effective_defense(&self, buffs: &ActiveBuffs) -> u32 {
        combine(
            self.defense + self.equipment.defense_bonus(),
            buffs.defense_bonus,
        )
    }

    /// Cumulative experience needed before the next level-up is earned.
    pub fn experience_for_next_level(&self) -> u64 {
        u64::from(self.level) * GameConfig::EXPERIENCE_PER_LEVEL
    }

    pub fn can_level_up(&self) -> bool {
        self.experience >= self.experience_for_next_level()
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(GameConfig::PLAYER_START)
    }
}

fn combine(base: u32, bonus: f64) -> u32 {
    let total = f64::from(base) + bonus.floor();
    if total <= 0.0 {
        0
    } else if total >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        total as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ItemKind, ItemStats};

    #[test]
    fn default_player_matches_starting_stats() {
        let player = PlayerState::default();
        assert_eq!(player.position, Position::new(1, 1));
        assert_eq!(player.health, ResourceMeter::new(100, 100));
        assert_eq!(player.attack, 10);
        assert_eq!(player.defense, 5);
        assert_eq!(player.level, 1);
    }

    #[test]
    fn effective_stats_include_equipment_and_buffs() {
        let mut player = PlayerState::default();
        let sword = Item::new(
            ItemId(1),
            "Sword",
            ItemKind::Weapon,
            ItemStats {
                attack: 4,
                ..ItemStats::default()
            },
        );
        player.equipment.weapon = Some(sword);

        let mut buffs = ActiveBuffs::new();
        buffs.attack_bonus = 2.7;
        buffs.defense_bonus = -100.0;

        assert_eq!(player.effective_attack(&buffs), 16);
        assert_eq!(player.effective_defense(&buffs), 0);
    }

    #[test]
    fn level_up_threshold_grows_with_level() {
        let mut player = PlayerState::default();
        player.experience = 99;
        assert!(!player.can_level_up());
        player.experience = 100;
        assert!(player.can_level_up());
        player.level = 2;
        assert!(!player.can_level_up());
    }
}
