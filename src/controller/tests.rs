use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::oneshot;

use super::*;
use crate::{
    settings::Settings,
    state::FileStateStore,
    test_support::{ClearFailingStore, FailingSink, ManualClock, MemoryBadge, RecordingAlarms, RecordingSink, RecordingTimers},
    wake::{WakeKind, WakeTrigger},
};

const PRIMARY_MS: u64 = 1_500_000;

struct Harness {
    _dir: TempDir,
    clock: Arc<ManualClock>,
    store: Arc<FileStateStore>,
    alarms: Arc<RecordingAlarms>,
    timers: Arc<RecordingTimers>,
    badge: Arc<MemoryBadge>,
    sink: Arc<RecordingSink>,
    controller: TimerController,
}

fn harness() -> Harness {
    harness_with(Settings::default(), None)
}

fn harness_with(settings: Settings, extra_sink: Option<Arc<dyn CompletionSink>>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(0));
    let store = Arc::new(FileStateStore::in_dir(dir.path()));
    let alarms = Arc::new(RecordingAlarms::default());
    let timers = Arc::new(RecordingTimers::default());
    let badge = Arc::new(MemoryBadge::default());
    let sink = Arc::new(RecordingSink::default());

    let mut controller = TimerController::new(
        store.clone(),
        Arc::new(settings),
        alarms.clone(),
        timers.clone(),
        badge.clone(),
        clock.clone(),
    );
    if let Some(extra) = extra_sink {
        controller = controller.with_sink(extra);
    }
    let controller = controller.with_sink(sink.clone());

    Harness {
        _dir: dir,
        clock,
        store,
        alarms,
        timers,
        badge,
        sink,
        controller,
    }
}

fn wake(kind: WakeKind, armed_for: i64) -> TimerEvent {
    TimerEvent::Wake(WakeEvent {
        kind,
        armed_for: Some(armed_for),
    })
}

fn assert_idle(h: &Harness) {
    assert_eq!(h.store.load(), TimerState::idle());
    assert_eq!(h.badge.read(), "");
    assert!(h.alarms.armed().is_empty());
}

#[test]
fn start_persists_running_state_and_arms_wakes() {
    let h = harness();
    h.clock.set(1_000_000);

    let state = h.controller.start(TimerCategory::Primary).unwrap();

    assert!(state.is_running());
    assert_eq!(state.category, Some(TimerCategory::Primary));
    assert_eq!(state.total_duration_ms, PRIMARY_MS);
    assert_eq!(state.scheduled_completion_ms, Some(2_500_000));
    assert_eq!(h.store.load(), state);

    let armed = h.alarms.armed();
    let kinds: Vec<_> = armed.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![WakeKind::Precision, WakeKind::Fallback, WakeKind::Badge]);
    assert_eq!(armed[0].trigger, WakeTrigger::At(2_475_000));
    assert_eq!(armed[1].trigger, WakeTrigger::At(2_500_000));

    assert_eq!(h.badge.read(), "25");
    assert_eq!(h.badge.color().as_deref(), Some("#dc3545"));

    let pending = h.timers.take();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].0, BADGE_FOLLOW_UP);
    assert!(matches!(pending[0].1, TimerEvent::BadgeRefresh));
}

#[test]
fn start_uses_configured_minutes() {
    let settings = Settings {
        minutes_in_short_rest: 3,
        ..Settings::default()
    };
    let h = harness_with(settings, None);

    let state = h.controller.start(TimerCategory::ShortRest).unwrap();
    assert_eq!(state.total_duration_ms, 180_000);
    assert_eq!(state.scheduled_completion_ms, Some(180_000));
    assert_eq!(h.badge.read(), "3");
}

#[test]
fn start_supersedes_a_running_timer() {
    let h = harness();
    h.controller.start(TimerCategory::Primary).unwrap();
    h.clock.set(60_000);

    let state = h.controller.start(TimerCategory::LongRest).unwrap();

    assert_eq!(state.scheduled_completion_ms, Some(960_000));
    assert_eq!(h.store.load(), state);
    assert_eq!(h.alarms.cancellations(), 2);
    assert!(h.alarms.armed().iter().all(|r| r.armed_for == Some(960_000)));
    assert_eq!(h.badge.read(), "15");
    assert!(h.sink.events().is_empty());
}

#[test]
fn reset_returns_to_idle_from_any_state() {
    let h = harness();
    h.controller.reset().unwrap();
    assert_idle(&h);

    h.controller.start(TimerCategory::Primary).unwrap();
    h.controller.reset().unwrap();
    assert_idle(&h);
    assert_eq!(h.controller.scheduled_completion(), None);
}

#[test]
fn fallback_wake_completes_exactly_once() {
    let h = harness();
    h.controller.start(TimerCategory::Primary).unwrap();
    assert_eq!(h.controller.scheduled_completion(), Some(1_500_000));

    h.clock.set(1_500_000);
    h.controller.handle(wake(WakeKind::Fallback, 1_500_000));
    h.controller.handle(wake(WakeKind::Fallback, 1_500_000));

    let events = h.sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].category, TimerCategory::Primary);
    assert_eq!(events[0].total_duration_ms, PRIMARY_MS);
    assert_eq!(events[0].source, CompletionSource::Fallback);
    assert_eq!(events[0].lateness_ms(), 0);
    assert_idle(&h);
}

#[test]
fn declaring_completion_twice_emits_once() {
    let h = harness();
    h.controller.start(TimerCategory::ShortRest).unwrap();
    h.clock.set(300_000);

    assert!(h.controller.declare_completion(None, CompletionSource::Fallback));
    assert!(!h.controller.declare_completion(None, CompletionSource::Fallback));
    assert_eq!(h.sink.events().len(), 1);
}

#[test]
fn stale_wakes_are_a_no_op() {
    let h = harness();
    h.controller.start(TimerCategory::Primary).unwrap();
    h.clock.set(1_000);
    let current = h.controller.start(TimerCategory::ShortRest).unwrap();
    let badge_before = h.badge.read();
    let writes_before = h.badge.writes();

    h.timers.take();

    // a minute boundary has passed for the current timer, so a refresh would change the label
    h.clock.set(62_000);
    h.controller.handle(wake(WakeKind::Fallback, 1_500_000));
    h.controller.handle(wake(WakeKind::Precision, 1_500_000));
    h.controller.handle(wake(WakeKind::Badge, 1_500_000));

    assert!(h.sink.events().is_empty());
    assert_eq!(h.store.load(), current);
    assert_eq!(h.badge.read(), badge_before);
    assert_eq!(h.badge.writes(), writes_before);
    assert!(h.timers.take().is_empty());

    // the live badge wake still works
    h.controller.handle(wake(WakeKind::Badge, 301_000));
    assert_eq!(h.badge.read(), "3");
    assert_eq!(h.timers.take().len(), 1);
}

#[test]
fn precision_wake_waits_out_the_exact_remainder() {
    let h = harness();
    h.controller.start(TimerCategory::Primary).unwrap();
    h.timers.take();

    h.clock.set(1_476_000);
    h.controller.handle(wake(WakeKind::Precision, 1_500_000));

    let pending = h.timers.take();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].0, Duration::from_millis(24_000));
    assert!(matches!(pending[0].1, TimerEvent::PrecisionElapsed { armed_for: 1_500_000 }));
    assert!(h.sink.events().is_empty());

    h.clock.set(1_500_000);
    let (_, elapsed) = pending.into_iter().next().unwrap();
    h.controller.handle(elapsed);

    let events = h.sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].source, CompletionSource::Precision);
    assert_idle(&h);

    // the fallback arriving afterwards finds nothing to do
    h.controller.handle(wake(WakeKind::Fallback, 1_500_000));
    assert_eq!(h.sink.events().len(), 1);
}

#[test]
fn late_precision_wake_completes_immediately() {
    let h = harness();
    h.controller.start(TimerCategory::Primary).unwrap();
    h.timers.take();

    h.clock.set(1_500_250);
    h.controller.handle(wake(WakeKind::Precision, 1_500_000));

    assert!(h.timers.take().is_empty());
    let events = h.sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].lateness_ms(), 250);
}

#[test]
fn precision_wait_for_a_replaced_timer_is_ignored() {
    let h = harness();
    h.controller.start(TimerCategory::Primary).unwrap();
    h.clock.set(1_480_000);
    h.controller.handle(wake(WakeKind::Precision, 1_500_000));
    let pending = h.timers.take();
    let (_, elapsed) = pending.into_iter().last().unwrap();

    h.controller.reset().unwrap();
    let replacement = h.controller.start(TimerCategory::LongRest).unwrap();
    h.clock.set(1_500_000);
    h.controller.handle(elapsed);

    assert!(h.sink.events().is_empty());
    assert_eq!(h.store.load(), replacement);
}

#[test]
fn precision_wake_while_idle_does_nothing() {
    let h = harness();
    h.controller.handle(wake(WakeKind::Precision, 1_500_000));

    assert!(h.timers.take().is_empty());
    assert!(h.sink.events().is_empty());
}

#[test]
fn badge_wake_tracks_remaining_minutes() {
    let h = harness();
    h.controller.start(TimerCategory::Primary).unwrap();
    h.timers.take();

    h.clock.set(1_000);
    h.controller.handle(TimerEvent::BadgeRefresh);
    assert_eq!(h.badge.read(), "24");

    h.clock.set(1_460_000);
    h.controller.handle(wake(WakeKind::Badge, 1_500_000));
    assert_eq!(h.badge.read(), "<1");

    let pending = h.timers.take();
    assert_eq!(pending.len(), 1);
    assert!(matches!(pending[0].1, TimerEvent::BadgeRefresh));
}

#[test]
fn badge_wake_on_overdue_timer_clears_label_only() {
    let h = harness();
    let state = h.controller.start(TimerCategory::ShortRest).unwrap();

    h.clock.set(300_500);
    h.controller.handle(wake(WakeKind::Badge, 300_000));

    assert_eq!(h.badge.read(), "");
    assert_eq!(h.store.load(), state);
    assert!(h.sink.events().is_empty());
}

#[test]
fn badge_refresh_while_idle_leaves_badge_alone() {
    let h = harness();
    h.controller.handle(TimerEvent::BadgeRefresh);

    assert_eq!(h.badge.writes(), 0);
}

#[test]
fn reset_before_any_wake_never_completes() {
    let h = harness();
    h.controller.start(TimerCategory::ShortRest).unwrap();
    let armed = h.alarms.armed();
    assert_eq!(armed.len(), 3);

    h.controller.reset().unwrap();
    assert!(h.alarms.armed().is_empty());

    // wakes already in flight when the reset happened
    h.clock.set(300_000);
    for request in armed {
        h.controller.handle(TimerEvent::Wake(request.event()));
    }
    h.controller.handle(TimerEvent::PrecisionElapsed { armed_for: 300_000 });

    assert!(h.sink.events().is_empty());
    assert_idle(&h);
}

#[test]
fn failing_sink_does_not_block_reset_or_other_sinks() {
    let h = harness_with(Settings::default(), Some(Arc::new(FailingSink)));
    h.controller.start(TimerCategory::LongRest).unwrap();

    h.clock.set(900_000);
    h.controller.handle(wake(WakeKind::Fallback, 900_000));

    assert_eq!(h.sink.events().len(), 1);
    assert_idle(&h);
}

#[test]
fn reconcile_rearms_a_timer_that_is_still_due() {
    let h = harness();
    let state = TimerState::running(TimerCategory::Primary, 1_500_000, PRIMARY_MS);
    h.store.save(&state).unwrap();
    h.clock.set(600_000);

    h.controller.reconcile("startup");

    let armed = h.alarms.armed();
    assert_eq!(armed.len(), 3);
    assert!(armed.iter().all(|r| r.armed_for == Some(1_500_000)));
    assert_eq!(h.badge.read(), "15");
    assert_eq!(h.store.load(), state);
}

#[test]
fn reconcile_close_to_completion_skips_precision_wake() {
    let h = harness();
    h.store
        .save(&TimerState::running(TimerCategory::ShortRest, 300_000, 300_000))
        .unwrap();
    h.clock.set(290_000);

    h.controller.reconcile("startup");

    let kinds: Vec<_> = h.alarms.armed().iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![WakeKind::Fallback, WakeKind::Badge]);
    assert_eq!(h.badge.read(), "<1");
}

#[test]
fn resume_after_completion_instant_completes() {
    let h = harness();
    h.controller.start(TimerCategory::ShortRest).unwrap();

    h.clock.set(900_000);
    h.controller.handle(TimerEvent::Resumed);

    let events = h.sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].source, CompletionSource::Reconcile);
    assert_idle(&h);
}

#[test]
fn reconcile_while_idle_clears_leftovers() {
    let h = harness();
    h.badge.write("7", Some("#28a745"));

    h.controller.reconcile("startup");

    assert_eq!(h.badge.read(), "");
    assert_eq!(h.alarms.cancellations(), 1);
}

#[test]
fn commands_reply_through_oneshot() {
    let h = harness();

    let (tx, mut rx) = oneshot::channel();
    h.controller.handle(TimerEvent::Command(Command::Start {
        category: TimerCategory::Primary,
        reply: tx,
    }));
    let started = rx.try_recv().unwrap().unwrap();
    assert!(started.is_running());

    let (tx, mut rx) = oneshot::channel();
    h.controller
        .handle(TimerEvent::Command(Command::ScheduledCompletion { reply: tx }));
    assert_eq!(rx.try_recv().unwrap(), Some(1_500_000));

    h.clock.set(500_000);
    let (tx, mut rx) = oneshot::channel();
    h.controller.handle(TimerEvent::Command(Command::Status { reply: tx }));
    let snapshot = rx.try_recv().unwrap();
    assert_eq!(snapshot.remaining_ms, Some(1_000_000));
    assert_eq!(snapshot.badge, "25");

    let (tx, mut rx) = oneshot::channel();
    h.controller.handle(TimerEvent::Command(Command::Reset { reply: tx }));
    assert!(rx.try_recv().unwrap().is_ok());
    assert_idle(&h);
}

#[test]
fn completion_with_a_failing_clear_still_leaves_the_timer_idle() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(0));
    let store = Arc::new(ClearFailingStore::new(FileStateStore::in_dir(dir.path())));
    let alarms = Arc::new(RecordingAlarms::default());
    let sink = Arc::new(RecordingSink::default());
    let controller = TimerController::new(
        store.clone(),
        Arc::new(Settings::default()),
        alarms.clone(),
        Arc::new(RecordingTimers::default()),
        Arc::new(MemoryBadge::default()),
        clock.clone(),
    )
    .with_sink(sink.clone());

    controller.start(TimerCategory::ShortRest).unwrap();
    store.fail_clear(true);

    clock.set(300_000);
    controller.handle(wake(WakeKind::Fallback, 300_000));
    assert_eq!(sink.events().len(), 1);
    assert!(!store.load().is_running());
    assert!(alarms.armed().is_empty());

    clock.set(400_000);
    controller.handle(TimerEvent::Resumed);
    assert_eq!(sink.events().len(), 1);
}
