//! End-to-end session flows: login, taps, dungeon play, persistence and
//! cross-session refresh.

use std::sync::Arc;

use gnome_core::{
    ActionResult, BuffKind, CardinalDirection, GameState, MineId, Position, Task, TaskId,
    TaskKind, TransitionPhase,
};
use gnome_runtime::{
    Dispatched, ErrorCode, Event, EventBus, GameSession, GameStateEvent, InMemorySessionProvider,
    InMemoryStateRepo, ManualClock, RepositoryError, RuntimeConfig, RuntimeError,
    SessionProvider, StateRepository, Topic, UserId,
};
use tokio::sync::broadcast::error::TryRecvError;

// 2024-01-01T12:00:00Z
const NOON: u64 = 1_704_110_400_000;
const HOUR: u64 = 3_600_000;

/// Store whose disk is always full.
struct FullDisk;

impl StateRepository for FullDisk {
    fn save(&self, _user_id: &UserId, _state: &GameState) -> gnome_runtime::repository::Result<()> {
        Err(RepositoryError::Io(std::io::Error::other("no space left on device")))
    }

    fn load(&self, _user_id: &UserId) -> gnome_runtime::repository::Result<Option<GameState>> {
        Ok(None)
    }

    fn exists(&self, _user_id: &UserId) -> bool {
        false
    }

    fn delete(&self, _user_id: &UserId) -> gnome_runtime::repository::Result<()> {
        Ok(())
    }
}

struct Fixture {
    clock: ManualClock,
    bus: EventBus,
    repository: Arc<InMemoryStateRepo>,
    sessions: Arc<InMemorySessionProvider>,
}

impl Fixture {
    fn new() -> Self {
        let bus = EventBus::new();
        Self {
            clock: ManualClock::new(NOON),
            repository: Arc::new(InMemoryStateRepo::new().with_events(bus.clone())),
            sessions: Arc::new(InMemorySessionProvider::seeded(11)),
            bus,
        }
    }

    fn session(&self, user: &str) -> GameSession<ManualClock> {
        GameSession::builder(UserId::new(user), user)
            .config(RuntimeConfig::builder().seed(7).build())
            .repository(self.repository.clone())
            .session_provider(self.sessions.clone())
            .events(self.bus.clone())
            .clock(self.clock.clone())
            .build()
            .expect("session")
    }
}

#[tokio::test]
async fn actions_before_start_are_refused() {
    let fixture = Fixture::new();
    let mut session = fixture.session("early");

    let error = session
        .dispatch(gnome_core::Action::collect_tokens(1))
        .expect_err("not started");
    assert!(matches!(error, RuntimeError::NotStarted));
    assert_eq!(error.code(), ErrorCode::InitFailed);
}

#[tokio::test]
async fn taps_are_rate_limited_and_recorded() {
    let fixture = Fixture::new();
    let mut session = fixture.session("tapper");
    session.start().await.expect("start");

    for _ in 0..5 {
        assert_eq!(session.tap().await.expect("tap"), 1.0);
    }

    let error = session.tap().await.expect_err("sixth tap");
    assert_eq!(error.code(), ErrorCode::RateLimitExceeded);
    assert!(error.is_retryable());
    assert_eq!(session.state().expect("state").total_earned, 5.0);

    fixture.clock.advance(5_000);
    session.tap().await.expect("window passed");

    let state = session.state().expect("state");
    assert_eq!(state.total_earned, 6.0);
    assert_eq!(state.last_tap_at, Some(NOON + 5_000));

    let profile = fixture
        .sessions
        .profile(&UserId::new("tapper"))
        .await
        .expect("lookup")
        .expect("profile");
    assert_eq!(profile.total_earned, 6.0);
}

#[tokio::test]
async fn rejected_actions_publish_and_change_nothing() {
    let fixture = Fixture::new();
    let mut events = fixture.bus.subscribe(Topic::GameState);
    let mut session = fixture.session("walker");
    session.start().await.expect("start");
    let before = session.state().cloned().expect("state");

    let dispatched = session
        .dispatch(gnome_core::Action::step(CardinalDirection::North))
        .expect("dispatch");

    assert!(!dispatched.is_applied());
    assert_eq!(session.state(), Some(&before));
    assert!(!fixture.repository.exists(session.user_id()));

    match events.recv().await.expect("event") {
        Event::GameState(GameStateEvent::ActionRejected { phase, code, .. }) => {
            assert_eq!(phase, TransitionPhase::PreValidate);
            assert_eq!(code, "MOVE_NO_DUNGEON");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn entering_a_generated_dungeon_starts_at_the_entrance() {
    let fixture = Fixture::new();
    let mut session = fixture.session("delver");
    session.start().await.expect("start");

    let entered = session.enter_new_dungeon().expect("enter");
    assert_eq!(
        entered.action_result(),
        Some(&ActionResult::DungeonEntered {
            entrance: Position::new(1, 0)
        })
    );

    let state = session.state().expect("state");
    let dungeon = state.dungeon().expect("dungeon");
    assert_eq!((dungeon.width(), dungeon.height()), (15, 15));
    assert_eq!(dungeon.difficulty(), 1);
    assert_eq!(state.player.position, Position::new(1, 0));

    // The tile below the entrance is always carved.
    let moved = session.step(CardinalDirection::South).expect("step");
    assert!(matches!(moved, Dispatched::Applied(_)));

    let state = session.state().expect("state");
    assert_eq!(state.player.position, Position::new(1, 1));
    let dungeon = state.dungeon().expect("dungeon");
    assert!(dungeon.pickup_at(Position::new(1, 1)).is_none());
    assert_eq!(
        fixture
            .repository
            .load(session.user_id())
            .expect("load")
            .as_ref(),
        Some(state)
    );
}

#[tokio::test]
async fn intents_reach_the_engine() {
    let fixture = Fixture::new();
    let mut session = fixture.session("buffer");
    session.start().await.expect("start");

    session
        .dispatch_intent(r#"{"type":"APPLY_BUFF","payload":{"buff":"tokenBonus","value":0.5}}"#)
        .expect("dispatch")
        .into_result()
        .expect("applied");
    assert_eq!(
        session.state().expect("state").active_buffs.get(BuffKind::TokenBonus),
        1.5
    );

    let error = session
        .dispatch_intent(r#"{"type":"APPLY_BUFF","payload":{"buff":"luck","value":9}}"#)
        .expect_err("unknown buff");
    assert_eq!(error.code(), ErrorCode::InvalidIntent);
}

#[tokio::test]
async fn other_writers_win_on_refresh() {
    let fixture = Fixture::new();
    let mut store_events = fixture.bus.subscribe(Topic::Store);
    let mut phone = fixture.session("shared");
    let mut laptop = fixture.session("shared");
    phone.start().await.expect("phone");
    laptop.start().await.expect("laptop");

    phone
        .dispatch(gnome_core::Action::collect_tokens(10))
        .expect("collect");

    let Event::Store(change) = store_events.recv().await.expect("store event") else {
        panic!("expected a store event");
    };

    assert!(!phone.handle_store_event(&change).expect("own write"));
    assert!(laptop.handle_store_event(&change).expect("refresh"));
    assert_eq!(laptop.state().expect("state").tokens, 10);
    assert_eq!(laptop.state(), phone.state());
}

#[tokio::test]
async fn restarts_prefer_cache_then_store() {
    let fixture = Fixture::new();
    let mut session = fixture.session("returning");
    session.start().await.expect("start");
    session
        .dispatch(gnome_core::Action::collect_tokens(4))
        .expect("collect");
    let live = session.state().cloned().expect("state");

    // Within the TTL the cached snapshot is served as-is.
    let cached = session.start().await.expect("restart").clone();
    assert_eq!(cached, live);

    // A brand new session falls back to the repository.
    let mut fresh = fixture.session("returning");
    let restored: GameState = fresh.start().await.expect("restore").clone();
    assert_eq!(restored.tokens, 4);
    assert!(restored.nonce > live.nonce);
}

#[tokio::test]
async fn file_store_survives_process_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let sessions: Arc<InMemorySessionProvider> = Arc::new(InMemorySessionProvider::seeded(3));
    let config = RuntimeConfig::builder().save_dir(dir.path()).seed(1).build();

    let mut first = GameSession::builder(UserId::new("disk"), "disk")
        .config(config.clone())
        .session_provider(sessions.clone())
        .clock(ManualClock::new(NOON))
        .build()
        .expect("first");
    first.start().await.expect("start");
    first
        .dispatch(gnome_core::Action::collect_tokens(5))
        .expect("collect");

    let mut second = GameSession::builder(UserId::new("disk"), "disk")
        .config(config)
        .session_provider(sessions)
        .clock(ManualClock::new(NOON + 1_000))
        .build()
        .expect("second");
    let state = second.start().await.expect("restart");

    assert_eq!(state.tokens, 5);
    assert!(dir.path().join("state_disk.bin").exists());
}

#[tokio::test]
async fn failed_saves_roll_back_quietly() {
    let fixture = Fixture::new();
    let mut session = GameSession::builder(UserId::new("unlucky"), "unlucky")
        .config(RuntimeConfig::builder().seed(7).build())
        .repository(Arc::new(FullDisk))
        .session_provider(fixture.sessions.clone())
        .events(fixture.bus.clone())
        .clock(fixture.clock.clone())
        .build()
        .expect("session");
    session.start().await.expect("start");
    let before = session.state().cloned().expect("state");
    let mut events = fixture.bus.subscribe(Topic::GameState);

    let error = session
        .dispatch(gnome_core::Action::collect_tokens(5))
        .expect_err("save fails");

    assert_eq!(error.code(), ErrorCode::StorageFailed);
    assert_eq!(session.state(), Some(&before));
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    // Lost taps do not spend the tap budget either.
    for _ in 0..6 {
        let error = session.tap().await.expect_err("save fails");
        assert_eq!(error.code(), ErrorCode::StorageFailed);
    }
    assert_eq!(session.state(), Some(&before));
}

#[tokio::test]
async fn rejected_taps_keep_their_budget() {
    let fixture = Fixture::new();
    let mut session = fixture.session("jittery");
    session.start().await.expect("start");

    for _ in 0..4 {
        session.tap().await.expect("tap");
    }

    // A clock that steps backwards produces an out-of-order tap.
    fixture.clock.set(NOON - 1);
    let error = session.tap().await.expect_err("out of order");
    assert!(matches!(error, RuntimeError::Rejected(_)));

    fixture.clock.set(NOON);
    session.tap().await.expect("fifth accepted tap");
    let error = session.tap().await.expect_err("budget spent");
    assert_eq!(error.code(), ErrorCode::RateLimitExceeded);
}

#[tokio::test]
async fn task_rewards_are_paid_once() {
    let fixture = Fixture::new();
    fixture
        .sessions
        .publish_task(Task::new(
            TaskId::new("yt"),
            TaskKind::Youtube,
            "Watch the trailer",
            50.0,
        ))
        .expect("publish");
    let mut session = fixture.session("quester");
    session.start().await.expect("start");
    assert_eq!(session.state().expect("state").tasks.len(), 1);

    let reward = session
        .complete_task(TaskId::new("yt"))
        .await
        .expect("complete");
    assert_eq!(reward, 50.0);

    let again = session
        .complete_task(TaskId::new("yt"))
        .await
        .expect_err("already paid");
    assert!(matches!(again, RuntimeError::Rejected(_)));

    let state = session.state().expect("state");
    assert_eq!(state.total_earned, 50.0);
    assert_eq!(state.gnome_balance, 50.0);

    let user = UserId::new("quester");
    let profile = fixture
        .sessions
        .profile(&user)
        .await
        .expect("lookup")
        .expect("profile");
    assert_eq!(profile.total_earned, 50.0);
    assert!(fixture.sessions.tasks(&user).await.expect("tasks")[0].completed);

    // Another device sees the completion after loading the save.
    let mut other = fixture.session("quester");
    other.start().await.expect("restart");
    assert!(other.complete_task(TaskId::new("yt")).await.is_err());
    assert_eq!(other.state().expect("state").total_earned, 50.0);
}

#[tokio::test]
async fn task_completions_are_rate_limited() {
    let fixture = Fixture::new();
    for id in ["a", "b", "c", "d"] {
        fixture
            .sessions
            .publish_task(Task::new(TaskId::new(id), TaskKind::Airdrop, id, 1.0))
            .expect("publish");
    }
    let mut session = fixture.session("grinder");
    session.start().await.expect("start");

    for id in ["a", "b", "c"] {
        session.complete_task(TaskId::new(id)).await.expect("complete");
    }
    let error = session
        .complete_task(TaskId::new("d"))
        .await
        .expect_err("fourth in a minute");
    assert_eq!(error.code(), ErrorCode::RateLimitExceeded);

    fixture.clock.advance(60_000);
    session.complete_task(TaskId::new("d")).await.expect("window passed");
}

#[tokio::test]
async fn mines_collect_once_per_window_and_upgrades_cost_gnome() {
    let fixture = Fixture::new();
    let mut session = fixture.session("miner");
    session.start().await.expect("start");

    fixture.clock.advance(2 * HOUR);
    let collected = session.collect_mine(MineId(1)).await.expect("collect");
    assert_eq!(collected, 2.0);

    let error = session
        .collect_mine(MineId(1))
        .await
        .expect_err("one collection per window");
    assert_eq!(error.code(), ErrorCode::RateLimitExceeded);

    let rejected = session
        .upgrade_mine(MineId(1))
        .expect("dispatch")
        .into_result()
        .expect_err("too poor");
    assert_eq!(RuntimeError::from(rejected).code(), ErrorCode::InsufficientFunds);

    let state = session.state().expect("state");
    assert_eq!(state.gnome_balance, 2.0);
    assert_eq!(state.mine(MineId(1)).map(|mine| mine.level), Some(1));
}

#[tokio::test]
async fn referral_codes_link_players() {
    let fixture = Fixture::new();
    let mut host = fixture.session("host");
    host.start().await.expect("host");
    let code = host.profile().expect("profile").referral_code.clone();

    let mut guest = fixture.session("guest");
    guest.start().await.expect("guest");
    let profile = guest.redeem_referral(&code).await.expect("redeem");
    assert_eq!(profile.referred_by.as_deref(), Some(code.as_str()));

    let error = host.redeem_referral(&code).await.expect_err("own code");
    assert_eq!(error.code(), ErrorCode::InvalidReferral);
}
