//! State type definitions.
//!
//! - `common`: positions, ids and meters shared by every state type
//! - `player`: the player's avatar
//! - `item`: inventory items and equipment slots
//! - `buffs`: buff table and tap boosters
//! - `mine`: passive GNOME producers
//! - `task`: one-time social tasks

mod buffs;
mod common;
mod item;
mod mine;
mod player;
mod task;

pub use buffs::{ActiveBuffs, Booster, BuffKind};
pub use common::{EnemyId, ItemId, Millis, Position, ResourceMeter};
pub use item::{Equipment, EquipmentSlot, Item, ItemKind, ItemRarity, ItemStats};
pub use mine::{Mine, MineId};
pub use player::PlayerState;
pub use task::{Task, TaskId, TaskKind};
