//! Text maps.
//!
//! | glyph | meaning |
//! |---|---|
//! | `#` `.` | wall, floor |
//! | `E` `X` | entrance, exit |
//! | `$` `F` `S` | shop, forge, shrine |
//! | `g` `s` `m` `c` | goblin, skeleton, mimic, cursed merchant (on floor) |
//! | `*` | token pickup (on floor) |
//!
//! When parsing, a digit `1`-`9` is also accepted as a pickup of that amount.

use std::fmt;

use crate::config::GameConfig;
use crate::state::{EnemyId, Position};

use super::{Axis, Dungeon, DungeonError, Enemy, EnemyKind, TileKind, TokenPickup};

impl Dungeon {
    /// Builds a dungeon from a text map. Leading and trailing whitespace on
    /// each line is ignored, as are blank lines.
    ///
    /// Enemies are spawned at `difficulty` with the minimum token reward and
    /// numbered in row-major order.
    pub fn from_ascii(map: &str, difficulty: u32) -> Result<Self, DungeonError> {
        let rows: Vec<&str> = map
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let Some(first) = rows.first() else {
            return Err(DungeonError::TooSmall {
                axis: Axis::Height,
                value: 0,
                minimum: 1,
            });
        };
        let width = first.chars().count();

        let mut dungeon = Dungeon::blank(width as u32, rows.len() as u32, difficulty);
        let mut next_enemy = 0;

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(DungeonError::RaggedMap {
                    row: y,
                    found,
                    expected: width,
                });
            }

            for (x, glyph) in row.chars().enumerate() {
                let position = Position::new(x as i32, y as i32);

                if let Some(kind) = TileKind::from_glyph(glyph) {
                    dungeon.set_kind(position, kind);
                } else if let Some(kind) = EnemyKind::from_glyph(glyph) {
                    dungeon.set_kind(position, TileKind::Floor);
                    dungeon.push_enemy(Enemy::spawn(
                        EnemyId(next_enemy),
                        kind,
                        position,
                        difficulty,
                        GameConfig::ENEMY_REWARD_MIN as u64,
                    ));
                    next_enemy += 1;
                } else if let Some(amount) = pickup_amount(glyph) {
                    dungeon.set_kind(position, TileKind::Floor);
                    dungeon.push_pickup(TokenPickup::new(position, amount));
                } else {
                    return Err(DungeonError::UnknownGlyph { glyph, x, y });
                }
            }
        }

        Ok(dungeon)
    }

    fn glyph_at(&self, position: Position) -> char {
        if let Some(enemy) = self.enemy_at(position) {
            enemy.kind.glyph()
        } else if self.pickup_at(position).is_some() {
            '*'
        } else {
            self.kind_at(position).unwrap_or_default().glyph()
        }
    }
}

fn pickup_amount(glyph: char) -> Option<u64> {
    match glyph {
        '*' => Some(1),
        '1'..='9' => glyph.to_digit(10).map(u64::from),
        _ => None,
    }
}

impl fmt::Display for Dungeon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() as i32 {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width() as i32 {
                write!(f, "{}", self.glyph_at(Position::new(x, y)))?;
            }
        }
        Ok(())
    }
}
