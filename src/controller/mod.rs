//! Timer controller: the Idle/Running state machine
//!
//! Every handler reloads the timer state from the store before acting. The
//! in-memory fields here are collaborators only; nothing about the running
//! timer is trusted unless it was read back from durable storage.

pub mod events;
pub mod handle;

#[cfg(test)]
mod tests;

use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info};

use crate::{
    badge::{BadgeIndicator, BadgeRenderer},
    clock::Clock,
    completion::{CompletionEvent, CompletionSink, CompletionSource},
    error::StoreError,
    settings::SettingsProvider,
    state::{StateStore, TimerState},
    timer::{resolve_duration_ms, TimerCategory},
    wake::{HostAlarms, InProcessTimer, WakeEvent, WakeKind, WakeScheduler},
};

pub use events::{Command, TimerEvent, TimerSnapshot};
pub use handle::TimerHandle;

/// Delay of the extra badge render after a start or badge wake
pub const BADGE_FOLLOW_UP: Duration = Duration::from_secs(1);

pub struct TimerController {
    store: Arc<dyn StateStore>,
    settings: Arc<dyn SettingsProvider>,
    wakes: WakeScheduler,
    timers: Arc<dyn InProcessTimer>,
    badge: BadgeRenderer,
    clock: Arc<dyn Clock>,
    sinks: Vec<Arc<dyn CompletionSink>>,
}

impl TimerController {
    pub fn new(
        store: Arc<dyn StateStore>,
        settings: Arc<dyn SettingsProvider>,
        alarms: Arc<dyn HostAlarms>,
        timers: Arc<dyn InProcessTimer>,
        badge: Arc<dyn BadgeIndicator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            settings,
            wakes: WakeScheduler::new(alarms),
            timers,
            badge: BadgeRenderer::new(badge),
            clock,
            sinks: Vec::new(),
        }
    }

    /// Register a collaborator to be told about completed timers
    pub fn with_sink(mut self, sink: Arc<dyn CompletionSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Dispatch one event from the event loop
    pub fn handle(&self, event: TimerEvent) {
        match event {
            TimerEvent::Command(command) => self.handle_command(command),
            TimerEvent::Wake(wake) => self.on_wake(wake),
            TimerEvent::PrecisionElapsed { armed_for } => self.on_precision_elapsed(armed_for),
            TimerEvent::BadgeRefresh => self.refresh_badge(),
            TimerEvent::Resumed => self.reconcile("resume"),
        }
    }

    fn handle_command(&self, command: Command) {
        // A dropped reply only means the caller stopped waiting
        match command {
            Command::Start { category, reply } => {
                let _ = reply.send(self.start(category));
            }
            Command::Reset { reply } => {
                let _ = reply.send(self.reset());
            }
            Command::ScheduledCompletion { reply } => {
                let _ = reply.send(self.scheduled_completion());
            }
            Command::Status { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    /// Start a timer of `category`, superseding whatever was running
    pub fn start(&self, category: TimerCategory) -> Result<TimerState, StoreError> {
        self.reset()?;

        let duration_ms = resolve_duration_ms(category, &self.settings.settings());
        let now = self.clock.now_ms();
        let scheduled = now + duration_ms as i64;
        let state = TimerState::running(category, scheduled, duration_ms);
        self.store.save(&state)?;

        info!(
            "Setting timer: {} for {}ms, scheduled at {}",
            category, duration_ms, scheduled
        );

        self.wakes.arm(scheduled, now);
        self.badge.render_remaining(duration_ms as i64, category.badge_color());
        self.timers.after(BADGE_FOLLOW_UP, TimerEvent::BadgeRefresh);

        Ok(state)
    }

    /// Cancel every wake, forget the timer and clear the badge
    pub fn reset(&self) -> Result<(), StoreError> {
        self.wakes.cancel_all();
        let cleared = self.store.clear();
        self.badge.clear();
        cleared
    }

    pub fn scheduled_completion(&self) -> Option<i64> {
        self.store.load().scheduled_completion_ms
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let state = self.store.load();
        TimerSnapshot {
            remaining_ms: state.remaining_ms(self.clock.now_ms()),
            state,
            badge: self.badge.current_label(),
        }
    }

    pub fn on_wake(&self, wake: WakeEvent) {
        debug!("{} wake fired (armed for {:?})", wake.kind, wake.armed_for);
        match wake.kind {
            WakeKind::Precision => self.on_precision_wake(wake.armed_for),
            WakeKind::Fallback => self.on_fallback_wake(wake.armed_for),
            WakeKind::Badge => self.on_badge_wake(wake.armed_for),
        }
    }

    /// Revived shortly before completion: wait out the exact remainder in-process
    pub fn on_precision_wake(&self, armed_for: Option<i64>) {
        let state = self.store.load();
        let Some(scheduled) = self.current_scheduled(&state, armed_for) else {
            debug!("Ignoring stale precision wake");
            return;
        };

        let delay = scheduled - self.clock.now_ms();
        info!("Precision wake for timer due at {}, waiting {}ms", scheduled, delay);
        if delay > 0 {
            self.timers.after(
                Duration::from_millis(delay as u64),
                TimerEvent::PrecisionElapsed { armed_for: scheduled },
            );
        } else {
            self.declare_completion(Some(scheduled), CompletionSource::Precision);
        }
    }

    /// The in-process wait ran out; completes only if the same timer is still running
    pub fn on_precision_elapsed(&self, armed_for: i64) {
        self.declare_completion(Some(armed_for), CompletionSource::Precision);
    }

    pub fn on_fallback_wake(&self, armed_for: Option<i64>) {
        self.declare_completion(armed_for, CompletionSource::Fallback);
    }

    pub fn on_badge_wake(&self, armed_for: Option<i64>) {
        let state = self.store.load();
        if self.current_scheduled(&state, armed_for).is_none() {
            debug!("Ignoring stale badge wake");
            return;
        }
        self.refresh_badge();
        self.timers.after(BADGE_FOLLOW_UP, TimerEvent::BadgeRefresh);
    }

    /// Bring the badge in line with the stored timer
    pub fn refresh_badge(&self) {
        let state = self.store.load();
        let (Some(category), Some(remaining)) = (state.category, state.remaining_ms(self.clock.now_ms())) else {
            return;
        };
        if remaining <= 0 {
            debug!("Timer overdue on badge refresh, clearing badge");
        }
        self.badge.render_remaining(remaining, category.badge_color());
    }

    /// Re-derive wakes from the stored timer after the host lost them
    pub fn reconcile(&self, reason: &str) {
        let state = self.store.load();
        let Some(scheduled) = self.current_scheduled(&state, None) else {
            debug!("Reconcile ({}): no running timer", reason);
            self.wakes.cancel_all();
            self.badge.clear();
            return;
        };

        let now = self.clock.now_ms();
        if scheduled <= now {
            info!("Reconcile ({}): timer due at {} already lapsed", reason, scheduled);
            self.declare_completion(Some(scheduled), CompletionSource::Reconcile);
            return;
        }

        info!("Reconcile ({}): re-arming wakes for timer due at {}", reason, scheduled);
        self.wakes.cancel_all();
        self.wakes.arm(scheduled, now);
        self.refresh_badge();
    }

    /// Finish the running timer if it is the one `expected` names.
    ///
    /// Returns whether a completion was emitted. The reset at the end makes a
    /// second call for the same timer observe Idle and do nothing.
    pub fn declare_completion(&self, expected: Option<i64>, source: CompletionSource) -> bool {
        let state = self.store.load();
        let Some(scheduled) = self.current_scheduled(&state, expected) else {
            debug!("Ignoring completion from {:?}: timer no longer current", source);
            return false;
        };
        let Some(category) = state.category else {
            return false;
        };

        let event = CompletionEvent {
            category,
            total_duration_ms: state.total_duration_ms,
            scheduled_completion_ms: scheduled,
            completed_at_ms: self.clock.now_ms(),
            source,
        };
        info!(
            "Timer expired: {} via {:?}, {}ms late",
            category,
            source,
            event.lateness_ms()
        );

        for sink in &self.sinks {
            if let Err(e) = sink.on_completion(&event) {
                error!("Completion sink failed: {}", e);
            }
        }

        if let Err(e) = self.reset() {
            // Reconcile must never see the completed timer as Running
            error!("Failed to reset timer after completion: {}", e);
            if let Err(e) = self.store.save(&TimerState::idle()) {
                error!("Failed to mark completed timer idle: {}", e);
            }
        }
        true
    }

    /// Scheduled completion of the running timer, if it matches `armed_for`
    fn current_scheduled(&self, state: &TimerState, armed_for: Option<i64>) -> Option<i64> {
        let scheduled = state.scheduled_completion_ms.filter(|_| state.is_running())?;
        match armed_for {
            Some(expected) if expected != scheduled => None,
            _ => Some(scheduled),
        }
    }
}
