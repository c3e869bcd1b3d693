//! Procedurally generated dungeon levels.
//!
//! A [`Dungeon`] is immutable once generated. Removing an enemy or a pickup
//! produces a derived copy ([`Dungeon::without_enemy`],
//! [`Dungeon::without_pickup`]); the engine swaps the copy into
//! [`GameState`](crate::state::GameState) rather than patching in place.
//!
//! - `config`: generator input and validation
//! - `generator`: maze carve and placement passes
//! - `ascii`: text map rendering and parsing
//! - `sigil`: dungeon-wide modifiers and their effect step

mod ascii;
mod config;
mod enemy;
mod generator;
pub mod sigil;
mod tile;

pub use config::{Axis, DungeonConfig, DungeonError};
pub use enemy::{Enemy, EnemyKind, EnemyStats, TokenPickup};
pub use generator::generate;
pub use sigil::{Sigil, SigilEffect, SigilKind};
pub use tile::{Tile, TileKind};

use std::collections::VecDeque;

use crate::state::{EnemyId, Position};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dungeon {
    width: u32,
    height: u32,
    difficulty: u32,
    /// Row-major, `width * height` entries.
    tiles: Vec<Tile>,
    enemies: Vec<Enemy>,
    pickups: Vec<TokenPickup>,
    sigil: Option<Sigil>,
}

impl Dungeon {
    /// All-wall grid. The generator and the ascii parser carve from here.
    pub(crate) fn blank(width: u32, height: u32, difficulty: u32) -> Self {
        Self {
            width,
            height,
            difficulty,
            tiles: vec![Tile::wall(); width as usize * height as usize],
            enemies: Vec::new(),
            pickups: Vec::new(),
            sigil: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn pickups(&self) -> &[TokenPickup] {
        &self.pickups
    }

    pub fn sigil(&self) -> Option<&Sigil> {
        self.sigil.as_ref()
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    fn position_of(&self, index: usize) -> Position {
        let width = self.width as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.index(position).map(|index| &self.tiles[index])
    }

    pub fn kind_at(&self, position: Position) -> Option<TileKind> {
        self.tile(position).map(|tile| tile.kind)
    }

    pub fn is_passable(&self, position: Position) -> bool {
        self.kind_at(position).is_some_and(TileKind::is_passable)
    }

    pub(crate) fn set_kind(&mut self, position: Position, kind: TileKind) {
        if let Some(index) = self.index(position) {
            self.tiles[index].kind = kind;
        }
    }

    /// Positions of every tile of `kind`, in row-major order.
    pub fn positions_of(&self, kind: TileKind) -> impl Iterator<Item = Position> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, tile)| tile.kind == kind)
            .map(|(index, _)| self.position_of(index))
    }

    pub fn entrance(&self) -> Option<Position> {
        self.positions_of(TileKind::Entrance).next()
    }

    pub fn exit(&self) -> Option<Position> {
        self.positions_of(TileKind::Exit).next()
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub fn enemy_at(&self, position: Position) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.position == position)
    }

    pub fn pickup_at(&self, position: Position) -> Option<&TokenPickup> {
        self.pickups
            .iter()
            .find(|pickup| pickup.position == position)
    }

    /// Sum of every pickup still lying in the dungeon.
    pub fn remaining_tokens(&self) -> u64 {
        self.pickups.iter().map(|pickup| pickup.amount).sum()
    }

    pub(crate) fn push_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    pub(crate) fn push_pickup(&mut self, pickup: TokenPickup) {
        self.pickups.push(pickup);
    }

    /// Copy of this dungeon without the given enemy.
    #[must_use]
    pub fn without_enemy(&self, id: EnemyId) -> Self {
        let mut next = self.clone();
        next.enemies.retain(|enemy| enemy.id != id);
        next
    }

    /// Copy of this dungeon without the pickup at `position`.
    #[must_use]
    pub fn without_pickup(&self, position: Position) -> Self {
        let mut next = self.clone();
        next.pickups.retain(|pickup| pickup.position != position);
        next
    }

    #[must_use]
    pub fn with_sigil(mut self, sigil: Option<Sigil>) -> Self {
        self.sigil = sigil;
        self
    }

    /// Copy with the tile at `position` marked discovered.
    #[must_use]
    pub fn discovered_at(&self, position: Position) -> Self {
        let mut next = self.clone();
        if let Some(index) = next.index(position) {
            next.tiles[index].discovered = true;
        }
        next
    }

    /// Whether every passable tile can be reached from `start` through
    /// 4-connected passable tiles.
    pub fn is_connected_from(&self, start: Position) -> bool {
        let Some(start_index) = self.index(start) else {
            return false;
        };
        if !self.tiles[start_index].is_passable() {
            return false;
        }

        let mut seen = vec![false; self.tiles.len()];
        let mut queue = VecDeque::from([start]);
        seen[start_index] = true;

        while let Some(current) = queue.pop_front() {
            for (dx, dy) in [(0, -1), (0, 1), (1, 0), (-1, 0)] {
                let next = Position::new(current.x + dx, current.y + dy);
                let Some(index) = self.index(next) else {
                    continue;
                };
                if !seen[index] && self.tiles[index].is_passable() {
                    seen[index] = true;
                    queue.push_back(next);
                }
            }
        }

        self.tiles
            .iter()
            .zip(&seen)
            .all(|(tile, seen)| *seen || !tile.is_passable())
    }
}
