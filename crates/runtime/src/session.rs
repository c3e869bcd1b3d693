//! Per-player session that owns the live [`GameState`].
//!
//! [`GameSession`] is the only place where runtime concerns meet the
//! engine. It stamps actions with the clock and rate-limits taps, task
//! completions and mine collections. Every accepted state is persisted and
//! cached, and what happened is published on the bus.

use std::sync::Arc;

use gnome_core::{
    Action, ActionResult, CardinalDirection, CollectPickupAction, ExecuteError, ExecutionOutcome,
    GameEngine, GameError, GameState, Millis, MineId, TaskId, generate,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::broadcast;

use crate::api::{
    InMemorySessionProvider, Result, RuntimeError, SessionProvider, UserId, UserProfile,
    is_spin_available,
};
use crate::cache::SnapshotCache;
use crate::clock::{Clock, SystemClock};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, GameStateEvent, StoreEvent, Topic};
use crate::intent::parse_intent;
use crate::rate_limit::{RateLimitPolicy, RateLimiter};
use crate::repository::{FileStateRepository, InMemoryStateRepo, StateRepository};

const TAP_LIMIT_KEY: &str = "tap";
const TASK_LIMIT_KEY: &str = "task_completion";

/// What the engine did with a dispatched action.
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatched {
    Applied(ExecutionOutcome),
    /// The state is unchanged.
    Rejected(ExecuteError),
}

impl Dispatched {
    pub fn is_applied(&self) -> bool {
        matches!(self, Dispatched::Applied(_))
    }

    pub fn action_result(&self) -> Option<&ActionResult> {
        match self {
            Dispatched::Applied(outcome) => Some(&outcome.action_result),
            Dispatched::Rejected(_) => None,
        }
    }

    pub fn into_result(self) -> std::result::Result<ExecutionOutcome, ExecuteError> {
        match self {
            Dispatched::Applied(outcome) => Ok(outcome),
            Dispatched::Rejected(error) => Err(error),
        }
    }
}

pub struct GameSession<C = SystemClock> {
    config: RuntimeConfig,
    user_id: UserId,
    username: String,
    profile: Option<UserProfile>,
    state: Option<GameState>,
    repository: Arc<dyn StateRepository>,
    sessions: Arc<dyn SessionProvider>,
    events: EventBus,
    clock: C,
    limiter: RateLimiter<C>,
    cache: SnapshotCache<GameState, C>,
    rng: StdRng,
}

impl GameSession<SystemClock> {
    pub fn builder(user_id: UserId, username: impl Into<String>) -> GameSessionBuilder {
        GameSessionBuilder::new(user_id, username.into())
    }
}

impl<C: Clock + Clone> GameSession<C> {
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Live state, once [`start`](Self::start) has succeeded.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.events.subscribe(topic)
    }

    fn live_state(&self) -> Result<&GameState> {
        self.state.as_ref().ok_or(RuntimeError::NotStarted)
    }

    /// Loads the player's state.
    ///
    /// A fresh cache entry wins. Otherwise the player logs in with the
    /// session provider and the saved state is loaded, or a new one is
    /// seeded from the profile. Calling this again refreshes the session.
    pub async fn start(&mut self) -> Result<&GameState> {
        if let Some(cached) = self.cache.get(SnapshotCache::<GameState, C>::DEFAULT_KEY) {
            tracing::debug!("Restored state[{}] from cache", self.user_id);
            return Ok(&*self.state.insert(cached));
        }

        let now = self.clock.now_millis();
        let profile = self
            .sessions
            .initialize_session(&self.user_id, &self.username, now)
            .await?;

        let tasks = self.sessions.tasks(&self.user_id).await?;

        let mut state = match self.repository.load(&self.user_id)? {
            Some(saved) => {
                let mut state = saved;
                let sync = Action::sync_profile(profile.rank, profile.boosters.clone(), now);
                // Profile sync cannot fail.
                let _ = GameEngine::new(&mut state).execute(&sync);
                state
            }
            None => GameState::for_profile(
                profile.rank,
                profile.total_earned,
                profile.boosters.clone(),
                profile.last_spin_at,
                now,
            ),
        };
        // Task sync cannot fail either.
        let _ = GameEngine::new(&mut state).execute(&Action::sync_tasks(tasks));

        tracing::info!(
            "Session started for {} (streak {}, nonce {}, tap power {:.2})",
            self.user_id,
            profile.login_streak,
            state.nonce,
            state.tap_power
        );

        self.cache
            .insert(SnapshotCache::<GameState, C>::DEFAULT_KEY, state.clone());
        self.profile = Some(profile);
        Ok(&*self.state.insert(state))
    }

    /// Runs `action` through the engine.
    ///
    /// Accepted actions are persisted, cached and published. Rejections
    /// leave everything untouched and are reported in the result.
    pub fn dispatch(&mut self, action: Action) -> Result<Dispatched> {
        let state = self.state.as_mut().ok_or(RuntimeError::NotStarted)?;
        let before = state.clone();
        let executed = GameEngine::new(state).execute(&action);

        match executed {
            Ok(outcome) => {
                if let Err(error) = self.persist() {
                    tracing::warn!(
                        "Reverting {} for {}: {}",
                        action.as_snake_case(),
                        self.user_id,
                        error
                    );
                    self.state = Some(before);
                    return Err(error);
                }

                tracing::debug!(
                    "Applied {} for {} (nonce {})",
                    action.as_snake_case(),
                    self.user_id,
                    outcome.nonce
                );
                self.events
                    .publish(Event::GameState(GameStateEvent::ActionApplied {
                        action,
                        result: outcome.action_result.clone(),
                        nonce: outcome.nonce,
                    }));
                Ok(Dispatched::Applied(outcome))
            }
            Err(error) => {
                tracing::warn!(
                    "Rejected {} for {} [{}]: {}",
                    action.as_snake_case(),
                    self.user_id,
                    error.error_code(),
                    error
                );
                self.events
                    .publish(Event::GameState(GameStateEvent::ActionRejected {
                        action,
                        phase: error.phase(),
                        code: error.error_code().to_owned(),
                        error: error.to_string(),
                    }));
                Ok(Dispatched::Rejected(error))
            }
        }
    }

    /// Parses a JSON intent and dispatches it.
    pub fn dispatch_intent(&mut self, json: &str) -> Result<Dispatched> {
        let action = parse_intent(json)?;
        self.dispatch(action)
    }

    fn persist(&mut self) -> Result<()> {
        let state = self.live_state()?;
        self.repository.save(&self.user_id, state)?;
        let snapshot = state.clone();
        self.cache
            .insert(SnapshotCache::<GameState, C>::DEFAULT_KEY, snapshot);
        Ok(())
    }

    /// Dispatches `action` behind the limiter for `key`.
    ///
    /// Only accepted actions spend budget. A rejection or a failed save
    /// leaves the window untouched.
    fn dispatch_limited(
        &mut self,
        key: &str,
        policy: RateLimitPolicy,
        action: Action,
    ) -> Result<ExecutionOutcome> {
        self.live_state()?;
        self.limiter.permit(key, policy)?;
        let outcome = self.dispatch(action)?.into_result()?;
        self.limiter.record(key);
        Ok(outcome)
    }

    async fn report_earnings(&self) -> Result<f64> {
        let total_earned = self.live_state()?.total_earned;
        self.sessions
            .record_earnings(&self.user_id, total_earned)
            .await?;
        Ok(total_earned)
    }

    /// Taps once and returns the reward.
    ///
    /// Taps beyond the configured rate fail with
    /// [`RuntimeError::RateLimited`] and change nothing.
    pub async fn tap(&mut self) -> Result<f64> {
        let now = self.clock.now_millis();
        let outcome =
            self.dispatch_limited(TAP_LIMIT_KEY, self.config.tap_limit, Action::tap(now))?;
        let ActionResult::Tapped { reward } = outcome.action_result else {
            return Ok(0.0);
        };

        let total_earned = self.live_state()?.total_earned;
        self.events
            .publish(Event::GameState(GameStateEvent::TapRewarded {
                reward,
                total_earned,
            }));
        self.report_earnings().await?;

        Ok(reward)
    }

    /// Completes a task, pays its reward and tells the backend.
    pub async fn complete_task(&mut self, task: TaskId) -> Result<f64> {
        let outcome = self.dispatch_limited(
            TASK_LIMIT_KEY,
            self.config.task_limit,
            Action::complete_task(task.clone()),
        )?;
        let ActionResult::TaskCompleted { reward, .. } = outcome.action_result else {
            return Ok(0.0);
        };

        self.sessions
            .record_task_completion(&self.user_id, &task)
            .await?;
        self.report_earnings().await?;
        Ok(reward)
    }

    /// Collects what `mine` produced so far. Each mine has its own limit.
    pub async fn collect_mine(&mut self, mine: MineId) -> Result<f64> {
        let key = format!("mine:{}", mine.0);
        let now = self.clock.now_millis();
        let outcome =
            self.dispatch_limited(&key, self.config.mine_limit, Action::collect_mine(mine, now))?;
        let ActionResult::MineCollected { amount, .. } = outcome.action_result else {
            return Ok(0.0);
        };

        self.report_earnings().await?;
        Ok(amount)
    }

    pub fn upgrade_mine(&mut self, mine: MineId) -> Result<Dispatched> {
        self.dispatch(Action::upgrade_mine(mine))
    }

    /// Pulls the task catalogue from the session provider.
    pub async fn sync_tasks(&mut self) -> Result<Dispatched> {
        self.live_state()?;
        let tasks = self.sessions.tasks(&self.user_id).await?;
        self.dispatch(Action::sync_tasks(tasks))
    }

    /// Links this player to the owner of a referral code.
    pub async fn redeem_referral(&mut self, code: &str) -> Result<&UserProfile> {
        self.live_state()?;
        let profile = self.sessions.apply_referral(&self.user_id, code).await?;
        tracing::info!("{} was referred with {}", self.user_id, code);
        Ok(&*self.profile.insert(profile))
    }

    /// Generates a dungeon sized by the config, scaled to the player's level
    /// and token bonus, and enters it.
    pub fn enter_new_dungeon(&mut self) -> Result<Dispatched> {
        let state = self.live_state()?;
        let dungeon_config = self
            .config
            .dungeon(state.player_level(), state.active_buffs.token_bonus);

        let dungeon =
            generate(&dungeon_config, &mut self.rng).map_err(RuntimeError::InvalidConfig)?;

        tracing::info!(
            "Generated {}x{} dungeon (difficulty {}, {} enemies, {} pickups, sigil {})",
            dungeon.width(),
            dungeon.height(),
            dungeon.difficulty(),
            dungeon.enemies().len(),
            dungeon.pickups().len(),
            dungeon
                .sigil()
                .map(|sigil| sigil.kind.as_ref())
                .unwrap_or("none")
        );

        self.dispatch(Action::enter_dungeon(dungeon))
    }

    /// Moves one tile and collects any pickup on the destination.
    ///
    /// Returns the outcome of the move.
    pub fn step(&mut self, direction: CardinalDirection) -> Result<Dispatched> {
        let moved = self.dispatch(Action::step(direction))?;

        if let Some(ActionResult::Moved { to }) = moved.action_result() {
            let has_pickup = self
                .live_state()?
                .dungeon()
                .is_some_and(|dungeon| dungeon.pickup_at(*to).is_some());
            if has_pickup {
                self.dispatch(CollectPickupAction.into())?;
            }
        }

        Ok(moved)
    }

    /// True when the daily spin has not been used today (UTC).
    pub fn spin_available(&self) -> Result<bool> {
        let state = self.live_state()?;
        Ok(is_spin_available(state.last_spin_at, self.clock.now_millis()))
    }

    /// Reacts to a repository change notification.
    ///
    /// When another writer replaced this player's save, the saved state is
    /// adopted (last writer wins). Returns whether the local state changed.
    pub fn handle_store_event(&mut self, event: &StoreEvent) -> Result<bool> {
        let StoreEvent::Changed { user_id, digest } = event;
        if *user_id != self.user_id || self.live_state()?.digest() == *digest {
            return Ok(false);
        }

        let Some(saved) = self.repository.load(&self.user_id)? else {
            return Ok(false);
        };

        tracing::warn!(
            "State of {} changed elsewhere; adopting nonce {} ({})",
            self.user_id,
            saved.nonce,
            hex::encode(&digest[..8])
        );
        self.cache
            .insert(SnapshotCache::<GameState, C>::DEFAULT_KEY, saved.clone());
        self.state = Some(saved);
        Ok(true)
    }

    /// Time of the last accepted tap, if any.
    pub fn last_tap_at(&self) -> Option<Millis> {
        self.state.as_ref().and_then(|state| state.last_tap_at)
    }
}

/// Builder for [`GameSession`].
pub struct GameSessionBuilder<C = SystemClock> {
    user_id: UserId,
    username: String,
    config: RuntimeConfig,
    repository: Option<Arc<dyn StateRepository>>,
    sessions: Option<Arc<dyn SessionProvider>>,
    events: Option<EventBus>,
    clock: C,
}

impl GameSessionBuilder<SystemClock> {
    fn new(user_id: UserId, username: String) -> Self {
        Self {
            user_id,
            username,
            config: RuntimeConfig::default(),
            repository: None,
            sessions: None,
            events: None,
            clock: SystemClock,
        }
    }
}

impl<C: Clock + Clone> GameSessionBuilder<C> {
    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an existing repository. It should publish on the same bus.
    pub fn repository(mut self, repository: Arc<dyn StateRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn session_provider(mut self, sessions: Arc<dyn SessionProvider>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Share an event bus with other sessions.
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn clock<C2: Clock + Clone>(self, clock: C2) -> GameSessionBuilder<C2> {
        GameSessionBuilder {
            user_id: self.user_id,
            username: self.username,
            config: self.config,
            repository: self.repository,
            sessions: self.sessions,
            events: self.events,
            clock,
        }
    }

    /// Without an explicit repository, saves go to `config.save_dir` when
    /// set and stay in memory otherwise.
    pub fn build(self) -> Result<GameSession<C>> {
        let events = self
            .events
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));

        let repository: Arc<dyn StateRepository> = match (self.repository, &self.config.save_dir)
        {
            (Some(repository), _) => repository,
            (None, Some(dir)) => {
                Arc::new(FileStateRepository::new(dir)?.with_events(events.clone()))
            }
            (None, None) => Arc::new(InMemoryStateRepo::new().with_events(events.clone())),
        };

        let sessions: Arc<dyn SessionProvider> = match self.sessions {
            Some(sessions) => sessions,
            None => Arc::new(InMemorySessionProvider::new()),
        };

        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(GameSession {
            limiter: RateLimiter::new(self.clock.clone()),
            cache: SnapshotCache::with_ttl(self.clock.clone(), self.config.cache_ttl_ms),
            config: self.config,
            user_id: self.user_id,
            username: self.username,
            profile: None,
            state: None,
            repository,
            sessions,
            events,
            clock: self.clock,
            rng,
        })
    }
}
