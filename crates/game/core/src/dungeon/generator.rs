//! Dungeon generation passes.
//!
//! Every random draw comes from the injected `rng`, in a fixed order:
//! maze carve, special rooms, enemies (kind, x, y, reward per candidate),
//! token pickups (row-major), sigil. Replaying the same seed reproduces the
//! same dungeon.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::GameConfig;
use crate::state::{EnemyId, Position};

use super::{
    Dungeon, DungeonConfig, DungeonError, Enemy, EnemyKind, Sigil, SigilKind, TileKind,
    TokenPickup,
};

/// Carve offsets to the neighbouring maze cell two tiles away.
const MAZE_STEPS: [(i32, i32); 4] = [(0, -2), (2, 0), (0, 2), (-2, 0)];

pub fn generate<R>(config: &DungeonConfig, rng: &mut R) -> Result<Dungeon, DungeonError>
where
    R: Rng + ?Sized,
{
    config.validate()?;

    let mut dungeon = Dungeon::blank(config.width, config.height, config.difficulty);

    carve_maze(&mut dungeon, rng);
    place_endpoints(&mut dungeon);
    place_rooms(&mut dungeon, rng);
    place_enemies(&mut dungeon, config, rng);
    place_pickups(&mut dungeon, config, rng);

    let sigil = roll_sigil(rng);
    Ok(dungeon.with_sigil(sigil))
}

struct CarveFrame {
    cell: Position,
    steps: [(i32, i32); 4],
    next: usize,
}

impl CarveFrame {
    fn enter<R: Rng + ?Sized>(cell: Position, rng: &mut R) -> Self {
        let mut steps = MAZE_STEPS;
        steps.shuffle(rng);
        Self {
            cell,
            steps,
            next: 0,
        }
    }
}

/// Recursive-backtracker carve driven by an explicit stack.
///
/// Each frame shuffles its neighbour order on entry and resumes where it left
/// off after a child frame is popped, so the carve visits cells in the same
/// order as the recursive formulation without growing the call stack.
///
/// The origin is the grid centre snapped to the odd lattice,
/// `((w / 2) | 1, (h / 2) | 1)`. When a dimension is `1 mod 4` the literal
/// centre sits on a wall between cells, so the snapped origin differs from
/// it. Every odd interior cell is carved, so the entrance and exit always
/// border a floor tile.
fn carve_maze<R: Rng + ?Sized>(dungeon: &mut Dungeon, rng: &mut R) {
    let width = dungeon.width() as i32;
    let height = dungeon.height() as i32;
    let is_interior =
        |cell: Position| cell.x > 0 && cell.x < width - 1 && cell.y > 0 && cell.y < height - 1;

    let origin = Position::new((width / 2) | 1, (height / 2) | 1);
    dungeon.set_kind(origin, TileKind::Floor);

    let mut stack = vec![CarveFrame::enter(origin, rng)];
    while let Some(frame) = stack.last_mut() {
        let Some(&(dx, dy)) = frame.steps.get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;
        let cell = frame.cell;

        let target = Position::new(cell.x + dx, cell.y + dy);
        if !is_interior(target) || dungeon.kind_at(target) != Some(TileKind::Wall) {
            continue;
        }

        let between = Position::new(cell.x + dx / 2, cell.y + dy / 2);
        dungeon.set_kind(between, TileKind::Floor);
        dungeon.set_kind(target, TileKind::Floor);
        stack.push(CarveFrame::enter(target, rng));
    }
}

/// Entrance on the top border above `(1, 1)`, exit on the bottom border
/// below `(width - 2, height - 2)`.
fn place_endpoints(dungeon: &mut Dungeon) {
    let width = dungeon.width() as i32;
    let height = dungeon.height() as i32;
    dungeon.set_kind(Position::new(1, 0), TileKind::Entrance);
    dungeon.set_kind(Position::new(width - 2, height - 1), TileKind::Exit);
}

/// Rejection-samples an interior floor tile for each special room.
fn place_rooms<R: Rng + ?Sized>(dungeon: &mut Dungeon, rng: &mut R) {
    let width = dungeon.width() as i32;
    let height = dungeon.height() as i32;

    for room in TileKind::ROOMS {
        loop {
            let candidate = Position::new(
                rng.gen_range(1..width - 1),
                rng.gen_range(1..height - 1),
            );
            if dungeon.kind_at(candidate) == Some(TileKind::Floor) {
                dungeon.set_kind(candidate, room);
                break;
            }
        }
    }
}

/// Rolls `enemy_budget` candidates over the whole grid and keeps those that
/// land on a free floor tile. Dropped candidates still consume their draws.
fn place_enemies<R: Rng + ?Sized>(dungeon: &mut Dungeon, config: &DungeonConfig, rng: &mut R) {
    let mut next_id = 0;

    for _ in 0..config.enemy_budget() {
        let kind = EnemyKind::ALL[rng.gen_range(0..EnemyKind::ALL.len())];
        let position = Position::new(
            rng.gen_range(0..config.width) as i32,
            rng.gen_range(0..config.height) as i32,
        );
        let reward = scaled(
            rng.gen_range(GameConfig::ENEMY_REWARD_MIN..GameConfig::ENEMY_REWARD_MAX),
            config.token_multiplier,
        );

        if dungeon.kind_at(position) != Some(TileKind::Floor)
            || dungeon.enemy_at(position).is_some()
        {
            continue;
        }

        dungeon.push_enemy(Enemy::spawn(
            EnemyId(next_id),
            kind,
            position,
            config.difficulty,
            reward,
        ));
        next_id += 1;
    }
}

/// Row-major scan over free floor tiles. Pickups that floor to zero tokens
/// are not placed.
fn place_pickups<R: Rng + ?Sized>(dungeon: &mut Dungeon, config: &DungeonConfig, rng: &mut R) {
    for y in 0..config.height as i32 {
        for x in 0..config.width as i32 {
            let position = Position::new(x, y);
            if dungeon.kind_at(position) != Some(TileKind::Floor)
                || dungeon.enemy_at(position).is_some()
            {
                continue;
            }
            if !rng.gen_bool(GameConfig::TOKEN_PICKUP_CHANCE) {
                continue;
            }

            let amount = scaled(
                rng.gen_range(GameConfig::PICKUP_MIN..GameConfig::PICKUP_MAX),
                config.token_multiplier,
            );
            if amount > 0 {
                dungeon.push_pickup(TokenPickup::new(position, amount));
            }
        }
    }
}

fn roll_sigil<R: Rng + ?Sized>(rng: &mut R) -> Option<Sigil> {
    if !rng.gen_bool(GameConfig::SIGIL_CHANCE) {
        return None;
    }
    let kind = SigilKind::CATALOG[rng.gen_range(0..SigilKind::CATALOG.len())];
    Some(Sigil::from_kind(kind))
}

fn scaled(roll: f64, multiplier: f64) -> u64 {
    (roll * multiplier).floor() as u64
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn generate_seeded(config: DungeonConfig, seed: u64) -> Dungeon {
        generate(&config, &mut ChaCha8Rng::seed_from_u64(seed)).expect("valid config")
    }

    #[test]
    fn same_seed_reproduces_dungeon() {
        let config = DungeonConfig::new(15, 15, 1, 1.0);
        assert_eq!(generate_seeded(config, 7), generate_seeded(config, 7));
    }

    #[test]
    fn invalid_config_fails_before_drawing() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let before = rng.clone();
        let result = generate(&DungeonConfig::new(14, 15, 0, 1.0), &mut rng);
        assert!(matches!(result, Err(DungeonError::EvenDimension { .. })));
        assert_eq!(rng, before);
    }

    #[test]
    fn carve_covers_every_odd_cell() {
        for size in [5, 7, 9, 15, 17, 21] {
            let dungeon = generate_seeded(DungeonConfig::new(size, size, 0, 1.0), 11);
            for y in (1..size as i32 - 1).step_by(2) {
                for x in (1..size as i32 - 1).step_by(2) {
                    assert!(
                        dungeon.is_passable(Position::new(x, y)),
                        "cell ({x}, {y}) not carved in {size}x{size}"
                    );
                }
            }
        }
    }

    #[test]
    fn scenario_fifteen_by_fifteen() {
        let config = DungeonConfig::new(15, 15, 1, 1.0);
        let dungeon = generate_seeded(config, 42);

        assert_eq!(dungeon.width(), 15);
        assert_eq!(dungeon.height(), 15);
        assert_eq!(dungeon.tiles().len(), 225);
        assert_eq!(dungeon.positions_of(TileKind::Entrance).count(), 1);
        assert_eq!(dungeon.positions_of(TileKind::Exit).count(), 1);
        assert_eq!(dungeon.entrance(), Some(Position::new(1, 0)));
        assert_eq!(dungeon.exit(), Some(Position::new(13, 14)));
        assert_eq!(config.enemy_budget(), 33);
        assert!(dungeon.enemies().len() <= 33);

        for room in TileKind::ROOMS {
            assert_eq!(dungeon.positions_of(room).count(), 1, "{room}");
        }
        for enemy in dungeon.enemies() {
            assert_eq!(enemy.health, 12);
            assert_eq!(enemy.attack, 6);
            assert_eq!(enemy.defense, 2);
            assert_eq!(enemy.experience_reward, 15);
            assert!((5..15).contains(&enemy.token_reward));
        }
        for pickup in dungeon.pickups() {
            assert!((1..6).contains(&pickup.amount));
        }
    }

    #[test]
    fn token_multiplier_scales_rewards() {
        let dungeon = generate_seeded(DungeonConfig::new(21, 21, 0, 10.0), 5);
        assert!(dungeon.enemies().iter().all(|enemy| enemy.token_reward >= 50));
        assert!(dungeon.pickups().iter().all(|pickup| pickup.amount >= 10));
    }

    #[test]
    fn enemy_ids_are_sequential() {
        let dungeon = generate_seeded(DungeonConfig::new(21, 21, 0, 1.0), 9);
        for (index, enemy) in dungeon.enemies().iter().enumerate() {
            assert_eq!(enemy.id, EnemyId(index as u32));
        }
    }

    #[test]
    fn sigils_appear_for_some_seeds() {
        let config = DungeonConfig::new(5, 5, 0, 1.0);
        let with_sigil = (0..64)
            .filter(|seed| generate_seeded(config, *seed).sigil().is_some())
            .count();
        assert!(with_sigil > 0 && with_sigil < 64);
    }
}
