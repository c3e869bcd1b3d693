//! Runtime configuration and environment loading.
use std::env;
use std::path::PathBuf;

use gnome_core::{DungeonConfig, GameConfig, Millis};

use crate::rate_limit::RateLimitPolicy;

/// Settings for a [`GameSession`](crate::GameSession).
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub cache_ttl_ms: Millis,
    pub tap_limit: RateLimitPolicy,
    pub task_limit: RateLimitPolicy,
    /// Applied per mine.
    pub mine_limit: RateLimitPolicy,
    pub event_buffer_size: usize,
    /// Directory for file-backed saves. `None` keeps state in memory.
    pub save_dir: Option<PathBuf>,
    /// Fixed generator seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            cache_ttl_ms: 60_000,
            tap_limit: RateLimitPolicy::TAP,
            task_limit: RateLimitPolicy::TASK_COMPLETION,
            mine_limit: RateLimitPolicy::MINE_COLLECTION,
            event_buffer_size: 100,
            save_dir: None,
            seed: None,
        }
    }
}

impl RuntimeConfig {
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::default()
    }

    /// Construct configuration from process environment variables.
    ///
    /// - `GNOME_DUNGEON_WIDTH` / `GNOME_DUNGEON_HEIGHT`
    /// - `GNOME_CACHE_TTL_MS`
    /// - `GNOME_TAP_MAX_ATTEMPTS` / `GNOME_TAP_WINDOW_MS`
    /// - `GNOME_EVENT_BUFFER`
    /// - `GNOME_SAVE_DIR` (defaults to the platform data directory)
    /// - `GNOME_SEED`
    pub fn from_env() -> Self {
        let mut config = Self {
            save_dir: default_save_dir(),
            ..Self::default()
        };

        if let (Some(width), Some(height)) = (
            read_env::<u32>("GNOME_DUNGEON_WIDTH"),
            read_env::<u32>("GNOME_DUNGEON_HEIGHT"),
        ) {
            config.game_config = GameConfig::with_dungeon_size(width, height);
        }

        if let Some(ttl) = read_env::<Millis>("GNOME_CACHE_TTL_MS") {
            config.cache_ttl_ms = ttl;
        }

        if let Some(max_attempts) = read_env::<usize>("GNOME_TAP_MAX_ATTEMPTS") {
            config.tap_limit.max_attempts = max_attempts.max(1);
        }

        if let Some(window_ms) = read_env::<Millis>("GNOME_TAP_WINDOW_MS") {
            config.tap_limit.window_ms = window_ms;
        }

        if let Some(capacity) = read_env::<usize>("GNOME_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        if let Some(dir) = read_env::<PathBuf>("GNOME_SAVE_DIR") {
            config.save_dir = Some(dir);
        }

        config.seed = read_env::<u64>("GNOME_SEED");

        config
    }

    /// Generator settings for a dungeon at `difficulty`.
    pub fn dungeon(&self, difficulty: u32, token_multiplier: f64) -> DungeonConfig {
        DungeonConfig::new(
            self.game_config.dungeon_width,
            self.game_config.dungeon_height,
            difficulty,
            token_multiplier,
        )
    }
}

#[derive(Debug, Default)]
pub struct RuntimeConfigBuilder {
    config: RuntimeConfig,
}

impl RuntimeConfigBuilder {
    pub fn dungeon_size(mut self, width: u32, height: u32) -> Self {
        self.config.game_config = GameConfig::with_dungeon_size(width, height);
        self
    }

    pub fn cache_ttl_ms(mut self, ttl: Millis) -> Self {
        self.config.cache_ttl_ms = ttl;
        self
    }

    pub fn tap_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.config.tap_limit = policy;
        self
    }

    pub fn task_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.config.task_limit = policy;
        self
    }

    pub fn mine_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.config.mine_limit = policy;
        self
    }

    pub fn event_buffer_size(mut self, capacity: usize) -> Self {
        self.config.event_buffer_size = capacity.max(1);
        self
    }

    pub fn save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.save_dir = Some(dir.into());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> RuntimeConfig {
        self.config
    }
}

/// Platform data directory, e.g. `~/.local/share/gnome` on Linux.
fn default_save_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "gnome").map(|dirs| dirs.data_dir().join("saves"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = RuntimeConfig::builder()
            .dungeon_size(21, 11)
            .seed(9)
            .event_buffer_size(0)
            .build();

        assert_eq!(config.game_config, GameConfig::with_dungeon_size(21, 11));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.event_buffer_size, 1);
        assert_eq!(config.tap_limit, RateLimitPolicy::TAP);
        assert_eq!(config.task_limit, RateLimitPolicy::TASK_COMPLETION);
        assert_eq!(config.mine_limit, RateLimitPolicy::MINE_COLLECTION);
        assert_eq!(config.save_dir, None);
    }

    #[test]
    fn dungeon_config_uses_configured_size() {
        let config = RuntimeConfig::default();
        let dungeon = config.dungeon(3, 1.5);
        assert_eq!((dungeon.width, dungeon.height), (15, 15));
        assert_eq!(dungeon.difficulty, 3);
        assert_eq!(dungeon.token_multiplier, 1.5);
    }
}
