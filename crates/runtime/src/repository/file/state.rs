//! File-based StateRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use gnome_core::GameState;

use crate::api::UserId;
use crate::events::EventBus;
use crate::repository::{RepositoryError, Result, StateRepository, announce_save};

/// File-based implementation of StateRepository.
///
/// Stores each user's state as `state_{user_id}.bin` in bincode format.
/// Writes go to a temp file first and are renamed into place, so a crash
/// never leaves a half-written save behind.
pub struct FileStateRepository {
    base_dir: PathBuf,
    events: Option<EventBus>,
}

impl FileStateRepository {
    /// Create a new file-based state repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            events: None,
        })
    }

    /// Publish a [`StoreEvent`](crate::events::StoreEvent) on every save.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn state_path(&self, user_id: &UserId) -> Result<PathBuf> {
        if !user_id.is_path_safe() {
            return Err(RepositoryError::InvalidUserId(user_id.to_string()));
        }
        Ok(self.base_dir.join(format!("state_{}.bin", user_id)))
    }
}

impl StateRepository for FileStateRepository {
    fn save(&self, user_id: &UserId, state: &GameState) -> Result<()> {
        let path = self.state_path(user_id)?;
        let temp_path = path.with_extension("bin.tmp");

        let bytes =
            bincode::serialize(state).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved state[{}] nonce={} to {}", user_id, state.nonce, path.display());

        announce_save(self.events.as_ref(), user_id, state);
        Ok(())
    }

    fn load(&self, user_id: &UserId) -> Result<Option<GameState>> {
        let path = self.state_path(user_id)?;

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let state: GameState = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tracing::debug!("Loaded state[{}] from {}", user_id, path.display());

        Ok(Some(state))
    }

    fn exists(&self, user_id: &UserId) -> bool {
        self.state_path(user_id)
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    fn delete(&self, user_id: &UserId) -> Result<()> {
        let path = self.state_path(user_id)?;

        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted state[{}]", user_id);
        }

        Ok(())
    }

    fn list_users(&self) -> Result<Vec<UserId>> {
        let mut users = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(user) = filename
                    .strip_prefix("state_")
                    .and_then(|s| s.strip_suffix(".bin"))
            {
                users.push(UserId::new(user));
            }
        }

        users.sort_unstable();
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FileStateRepository::new(dir.path()).expect("repo");
        let user = UserId::new("user-1");
        let mut state = GameState::new();
        state.tokens = 42;

        repo.save(&user, &state).expect("save");

        assert!(repo.exists(&user));
        assert_eq!(repo.load(&user).expect("load"), Some(state));
        assert_eq!(repo.list_users().expect("list"), vec![user.clone()]);
        assert!(!dir.path().join("state_user-1.bin.tmp").exists());

        repo.delete(&user).expect("delete");
        assert_eq!(repo.load(&user).expect("load"), None);
    }

    #[test]
    fn rejects_ids_that_escape_the_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FileStateRepository::new(dir.path()).expect("repo");
        let user = UserId::new("../evil");

        let error = repo.save(&user, &GameState::new()).expect_err("unsafe id");
        assert!(matches!(error, RepositoryError::InvalidUserId(_)));
        assert!(!repo.exists(&user));
    }

    #[test]
    fn states_with_a_sigil_dungeon_load_back() {
        use gnome_core::{Dungeon, Sigil, SigilKind, Task, TaskId, TaskKind};

        let dir = tempfile::tempdir().expect("tempdir");
        let repo = FileStateRepository::new(dir.path()).expect("repo");
        let user = UserId::new("delver");

        let dungeon = Dungeon::from_ascii("#E#\n#g#\n#X#", 1)
            .expect("valid map")
            .with_sigil(Some(Sigil::from_kind(SigilKind::DoubleRewards)));
        let mut state = GameState::for_profile(2, 10.0, Vec::new(), None, 0).with_dungeon(dungeon);
        state
            .tasks
            .push(Task::new(TaskId::new("yt"), TaskKind::Youtube, "Watch", 5.0));

        repo.save(&user, &state).expect("save");
        let loaded = repo.load(&user).expect("load").expect("saved state");

        assert_eq!(loaded, state);
        assert_eq!(loaded.digest(), state.digest());
        assert_eq!(
            loaded.dungeon().and_then(|dungeon| dungeon.sigil()).map(|sigil| sigil.kind),
            Some(SigilKind::DoubleRewards)
        );
    }
}
