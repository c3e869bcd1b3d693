//! Asynchronous abstraction over the remote session backend.
//!
//! The backend owns identity, lifetime stats (rank, earnings, streaks),
//! referrals and the task catalogue.
//! Runtime users plug in a [`SessionProvider`]; [`InMemorySessionProvider`]
//! serves tests and offline play.
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use gnome_core::{Booster, Millis, Task, TaskId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::errors::{Result, RuntimeError};

/// Opaque user identifier assigned by the session backend.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id can be embedded in a file name as-is.
    pub fn is_path_safe(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Profile data held by the session backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub username: String,
    pub referral_code: String,
    /// Referral code of the user who invited this one.
    pub referred_by: Option<String>,
    pub rank: u32,
    pub total_earned: f64,
    pub login_streak: u32,
    pub last_login_at: Millis,
    pub last_spin_at: Option<Millis>,
    pub boosters: Vec<Booster>,
}

/// Remote session backend.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Logs the user in, creating a profile on first contact.
    async fn initialize_session(
        &self,
        user_id: &UserId,
        username: &str,
        now: Millis,
    ) -> Result<UserProfile>;

    /// Fetches the profile of a known user.
    async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>>;

    /// Stores the user's lifetime earnings.
    async fn record_earnings(&self, user_id: &UserId, total_earned: f64) -> Result<()>;

    /// Stores the time of the user's daily spin.
    async fn record_spin(&self, user_id: &UserId, at: Millis) -> Result<()>;

    /// Links the user to the owner of `code`. A user is referred at most once.
    async fn apply_referral(&self, user_id: &UserId, code: &str) -> Result<UserProfile>;

    /// Task catalogue as seen by the user, with their completions marked.
    async fn tasks(&self, user_id: &UserId) -> Result<Vec<Task>>;

    /// Marks a task completed for the user. Repeating it is a no-op.
    async fn record_task_completion(&self, user_id: &UserId, task: &TaskId) -> Result<()>;
}

/// True when no spin was recorded or the last one fell on another UTC day.
pub fn is_spin_available(last_spin_at: Option<Millis>, now: Millis) -> bool {
    match last_spin_at {
        None => true,
        Some(last) => utc_date(last) != utc_date(now),
    }
}

fn utc_date(at: Millis) -> Option<NaiveDate> {
    let millis = i64::try_from(at).ok()?;
    DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

/// Streak after logging in at `now`: +1 on the next calendar day, back to 1
/// after a gap, unchanged on the same day.
fn next_login_streak(streak: u32, last_login_at: Millis, now: Millis) -> u32 {
    match (utc_date(last_login_at), utc_date(now)) {
        (Some(last), Some(today)) => match (today - last).num_days() {
            0 => streak.max(1),
            1 => streak.saturating_add(1),
            _ => 1,
        },
        _ => 1,
    }
}

const REFERRAL_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const REFERRAL_LENGTH: usize = 6;

struct Directory {
    users: HashMap<UserId, UserProfile>,
    tasks: Vec<Task>,
    completed: HashMap<UserId, HashSet<TaskId>>,
    rng: StdRng,
}

impl Directory {
    fn user_mut(&mut self, user_id: &UserId) -> Result<&mut UserProfile> {
        self.users
            .get_mut(user_id)
            .ok_or_else(|| RuntimeError::Auth(format!("unknown user {user_id}")))
    }
}

/// Session backend that keeps every profile in process memory.
pub struct InMemorySessionProvider {
    directory: Mutex<Directory>,
}

impl InMemorySessionProvider {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic referral codes, for tests.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            directory: Mutex::new(Directory {
                users: HashMap::new(),
                tasks: Vec::new(),
                completed: HashMap::new(),
                rng,
            }),
        }
    }

    /// Inserts or replaces a profile.
    pub fn insert(&self, profile: UserProfile) -> Result<()> {
        let mut directory = self.lock()?;
        directory.users.insert(profile.user_id.clone(), profile);
        Ok(())
    }

    /// Adds a task to the catalogue offered to every user.
    pub fn publish_task(&self, task: Task) -> Result<()> {
        self.lock()?.tasks.push(task);
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Directory>> {
        self.directory
            .lock()
            .map_err(|_| RuntimeError::Init("session directory lock was poisoned".into()))
    }
}

impl Default for InMemorySessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn referral_code(rng: &mut impl Rng) -> String {
    (0..REFERRAL_LENGTH)
        .map(|_| REFERRAL_ALPHABET[rng.gen_range(0..REFERRAL_ALPHABET.len())] as char)
        .collect()
}

#[async_trait]
impl SessionProvider for InMemorySessionProvider {
    async fn initialize_session(
        &self,
        user_id: &UserId,
        username: &str,
        now: Millis,
    ) -> Result<UserProfile> {
        let mut directory = self.lock()?;
        let Directory { users, rng, .. } = &mut *directory;

        let profile = match users.get_mut(user_id) {
            Some(profile) => {
                profile.login_streak =
                    next_login_streak(profile.login_streak, profile.last_login_at, now);
                profile.last_login_at = now;
                profile.clone()
            }
            None => {
                let profile = UserProfile {
                    user_id: user_id.clone(),
                    username: username.to_owned(),
                    referral_code: referral_code(rng),
                    referred_by: None,
                    rank: 0,
                    total_earned: 0.0,
                    login_streak: 1,
                    last_login_at: now,
                    last_spin_at: None,
                    boosters: Vec::new(),
                };
                users.insert(user_id.clone(), profile.clone());
                profile
            }
        };

        Ok(profile)
    }

    async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        Ok(self.lock()?.users.get(user_id).cloned())
    }

    async fn record_earnings(&self, user_id: &UserId, total_earned: f64) -> Result<()> {
        self.lock()?.user_mut(user_id)?.total_earned = total_earned;
        Ok(())
    }

    async fn record_spin(&self, user_id: &UserId, at: Millis) -> Result<()> {
        self.lock()?.user_mut(user_id)?.last_spin_at = Some(at);
        Ok(())
    }

    async fn apply_referral(&self, user_id: &UserId, code: &str) -> Result<UserProfile> {
        let mut directory = self.lock()?;
        let referrer = directory
            .users
            .values()
            .find(|profile| profile.referral_code == code)
            .map(|profile| profile.user_id.clone())
            .ok_or_else(|| RuntimeError::Referral(format!("unknown referral code {code}")))?;

        let profile = directory.user_mut(user_id)?;
        if referrer == profile.user_id {
            return Err(RuntimeError::Referral("cannot use your own code".into()));
        }
        if let Some(existing) = &profile.referred_by {
            return Err(RuntimeError::Referral(format!(
                "already referred with {existing}"
            )));
        }

        profile.referred_by = Some(code.to_owned());
        Ok(profile.clone())
    }

    async fn tasks(&self, user_id: &UserId) -> Result<Vec<Task>> {
        let directory = self.lock()?;
        let done = directory.completed.get(user_id);
        Ok(directory
            .tasks
            .iter()
            .map(|task| Task {
                completed: done.is_some_and(|done| done.contains(&task.id)),
                ..task.clone()
            })
            .collect())
    }

    async fn record_task_completion(&self, user_id: &UserId, task: &TaskId) -> Result<()> {
        let mut directory = self.lock()?;
        directory.user_mut(user_id)?;
        directory
            .completed
            .entry(user_id.clone())
            .or_default()
            .insert(task.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: Millis = 86_400_000;
    // 2024-01-01T12:00:00Z
    const NOON: Millis = 1_704_110_400_000;

    #[tokio::test]
    async fn first_login_creates_profile() {
        let provider = InMemorySessionProvider::seeded(7);
        let user = UserId::new("u1");

        let profile = provider
            .initialize_session(&user, "gnome", NOON)
            .await
            .expect("profile");

        assert_eq!(profile.login_streak, 1);
        assert_eq!(profile.referral_code.len(), 6);
        assert!(
            profile
                .referral_code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        );
        assert_eq!(provider.profile(&user).await.expect("lookup"), Some(profile));
    }

    #[tokio::test]
    async fn login_streak_follows_calendar_days() {
        let provider = InMemorySessionProvider::seeded(7);
        let user = UserId::new("u1");

        provider.initialize_session(&user, "g", NOON).await.expect("day 0");
        let same_day = provider
            .initialize_session(&user, "g", NOON + 3_600_000)
            .await
            .expect("same day");
        assert_eq!(same_day.login_streak, 1);

        let next_day = provider
            .initialize_session(&user, "g", NOON + DAY)
            .await
            .expect("next day");
        assert_eq!(next_day.login_streak, 2);

        let after_gap = provider
            .initialize_session(&user, "g", NOON + 3 * DAY)
            .await
            .expect("gap");
        assert_eq!(after_gap.login_streak, 1);
    }

    #[tokio::test]
    async fn recording_for_unknown_user_is_an_auth_error() {
        let provider = InMemorySessionProvider::seeded(1);
        let error = provider
            .record_spin(&UserId::new("ghost"), NOON)
            .await
            .expect_err("unknown");
        assert!(matches!(error, RuntimeError::Auth(_)));
    }

    #[tokio::test]
    async fn referrals_apply_once_and_never_to_self() {
        let provider = InMemorySessionProvider::seeded(5);
        let host = UserId::new("host");
        let guest = UserId::new("guest");
        let code = provider
            .initialize_session(&host, "h", NOON)
            .await
            .expect("host")
            .referral_code;
        provider.initialize_session(&guest, "g", NOON).await.expect("guest");

        let own = provider.apply_referral(&host, &code).await;
        assert!(matches!(own, Err(RuntimeError::Referral(_))));

        let linked = provider.apply_referral(&guest, &code).await.expect("link");
        assert_eq!(linked.referred_by.as_deref(), Some(code.as_str()));

        let again = provider.apply_referral(&guest, &code).await;
        assert!(matches!(again, Err(RuntimeError::Referral(_))));
        let unknown = provider.apply_referral(&host, "ZZZZZZ").await;
        assert!(matches!(unknown, Err(RuntimeError::Referral(_))));
    }

    #[tokio::test]
    async fn task_completions_are_tracked_per_user() {
        let provider = InMemorySessionProvider::seeded(5);
        let task = TaskId::new("yt");
        provider
            .publish_task(Task::new(
                task.clone(),
                gnome_core::TaskKind::Youtube,
                "Watch",
                10.0,
            ))
            .expect("publish");
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");
        provider.initialize_session(&alice, "a", NOON).await.expect("alice");
        provider.initialize_session(&bob, "b", NOON).await.expect("bob");

        provider
            .record_task_completion(&alice, &task)
            .await
            .expect("complete");
        provider
            .record_task_completion(&alice, &task)
            .await
            .expect("idempotent");

        assert!(provider.tasks(&alice).await.expect("alice")[0].completed);
        assert!(!provider.tasks(&bob).await.expect("bob")[0].completed);
    }

    #[test]
    fn spin_resets_at_utc_midnight() {
        assert!(is_spin_available(None, NOON));
        assert!(!is_spin_available(Some(NOON), NOON + 11 * 3_600_000));
        assert!(is_spin_available(Some(NOON), NOON + 12 * 3_600_000));
        // Same day of month, different month.
        assert!(is_spin_available(Some(NOON), NOON + 31 * DAY));
    }

    #[test]
    fn user_ids_with_separators_are_not_path_safe() {
        assert!(UserId::new("abc_DEF-123").is_path_safe());
        assert!(!UserId::new("").is_path_safe());
        assert!(!UserId::new("a/b").is_path_safe());
        assert!(!UserId::new("..").is_path_safe());
    }
}
