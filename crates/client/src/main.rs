//! Gnome game client binary.
//!
//! Headless composition root: builds a [`GameSession`] from the environment
//! and either plays a short demo run or replays JSON intents from stdin.
//!
//! ```bash
//! # demo: a few taps, then a wall-following walk through one dungeon
//! cargo run -p gnome-client
//!
//! # one intent per line
//! echo '{"type":"LEVEL_UP"}' | cargo run -p gnome-client -- --intents
//! ```

use std::io::BufRead;

use anyhow::{Context, Result};
use gnome_core::{Action, CardinalDirection, EnemyId, GameConfig, GameState, MineId, Position};
use gnome_runtime::{Dispatched, GameSession, RuntimeConfig, RuntimeError, UserId};

const DEMO_TAPS: usize = 3;
const DEMO_STEPS: usize = 60;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::from_env();
    let user_id = std::env::var("GNOME_USER_ID").unwrap_or_else(|_| "local".to_owned());

    tracing::info!("Starting gnome client for {}", user_id);
    tracing::info!("Save directory: {:?}", config.save_dir);

    let mut session = GameSession::builder(UserId::new(&user_id), user_id.clone())
        .config(config)
        .build()
        .context("failed to build session")?;
    session.start().await.context("failed to start session")?;

    if std::env::args().any(|arg| arg == "--intents") {
        replay_intents(&mut session)?;
    } else {
        play_demo(&mut session).await?;
    }

    if let Some(state) = session.state() {
        print_summary(state);
    }
    Ok(())
}

fn replay_intents(session: &mut GameSession) -> Result<()> {
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match session.dispatch_intent(&line) {
            Ok(Dispatched::Applied(outcome)) => println!("ok  {:?}", outcome.action_result),
            Ok(Dispatched::Rejected(error)) => println!("no  {error}"),
            Err(error) => println!("err {} ({})", error.user_message(), error.code()),
        }
    }
    Ok(())
}

async fn play_demo(session: &mut GameSession) -> Result<()> {
    for _ in 0..DEMO_TAPS {
        match session.tap().await {
            Ok(reward) => println!("tap +{reward:.2}"),
            Err(error @ RuntimeError::RateLimited(_)) => {
                println!("{}", error.user_message());
                break;
            }
            Err(error) => return Err(error.into()),
        }
    }

    match session.collect_mine(MineId(GameConfig::STARTER_MINE)).await {
        Ok(amount) => println!("mine +{amount:.4}"),
        Err(error) => println!("mine: {}", error.user_message()),
    }

    session.enter_new_dungeon()?;
    if let Some(state) = session.state() {
        println!("{}", render(state));
    }

    let mut heading = CardinalDirection::South;
    for _ in 0..DEMO_STEPS {
        if let Some(enemy) = adjacent_enemy(session) {
            session.dispatch(Action::start_combat(enemy))?;
            if session.state().is_some_and(|state| state.player.health.is_empty()) {
                break;
            }
            continue;
        }

        // Right-hand rule: prefer turning right, then straight, left, back.
        let mut moved = false;
        for direction in [
            turn_right(heading),
            heading,
            turn_left(heading),
            turn_right(turn_right(heading)),
        ] {
            if session.step(direction)?.is_applied() {
                heading = direction;
                moved = true;
                break;
            }
        }
        if !moved || at_exit(session) {
            break;
        }
    }

    if let Some(state) = session.state() {
        println!("{}", render(state));
    }
    Ok(())
}

fn adjacent_enemy(session: &GameSession) -> Option<EnemyId> {
    let state = session.state()?;
    let position = state.player.position;
    state
        .dungeon()?
        .enemies()
        .iter()
        .find(|enemy| enemy.position.manhattan(position) <= 1)
        .map(|enemy| enemy.id)
}

fn at_exit(session: &GameSession) -> bool {
    session.state().is_some_and(|state| {
        state
            .dungeon()
            .and_then(|dungeon| dungeon.exit())
            .is_some_and(|exit| exit == state.player.position)
    })
}

fn turn_right(direction: CardinalDirection) -> CardinalDirection {
    match direction {
        CardinalDirection::North => CardinalDirection::East,
        CardinalDirection::East => CardinalDirection::South,
        CardinalDirection::South => CardinalDirection::West,
        CardinalDirection::West => CardinalDirection::North,
    }
}

fn turn_left(direction: CardinalDirection) -> CardinalDirection {
    turn_right(turn_right(turn_right(direction)))
}

/// Map with the player drawn as `@`.
fn render(state: &GameState) -> String {
    let Some(dungeon) = state.dungeon() else {
        return String::from("(no dungeon)");
    };
    let Position { x, y } = state.player.position;

    dungeon
        .to_string()
        .lines()
        .enumerate()
        .map(|(row, line)| {
            line.chars()
                .enumerate()
                .map(|(col, glyph)| {
                    if row as i32 == y && col as i32 == x {
                        '@'
                    } else {
                        glyph
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_summary(state: &GameState) {
    println!(
        "level {} | hp {}/{} | tokens {} | GNOME {:.2} | earned {:.2} | tap power {:.2} | nonce {}",
        state.player.level,
        state.player.health.current,
        state.player.health.maximum,
        state.tokens,
        state.gnome_balance,
        state.total_earned,
        state.tap_power,
        state.nonce
    );
}
