//! Tokio-backed host alarms and in-process timers
//!
//! Alarms are tokio tasks that post a `TimerEvent` into the controller's
//! event loop when they fire. Tokio timers run on the monotonic clock, which
//! stops while the machine is suspended, so an alarm can fire late after a
//! resume; the resume watcher reconciles that case.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, sleep, Instant},
};
use tracing::{debug, warn};

use super::{HostAlarms, InProcessTimer, WakeKind, WakeRequest, WakeTrigger};
use crate::{clock::Clock, controller::TimerEvent};

/// Host alarm primitive built on tokio tasks
pub struct TokioAlarms {
    events: mpsc::UnboundedSender<TimerEvent>,
    clock: Arc<dyn Clock>,
    /// Absolute alarms never fire sooner than this after being armed
    min_delay: Duration,
    armed: Mutex<HashMap<WakeKind, JoinHandle<()>>>,
}

impl TokioAlarms {
    pub fn new(events: mpsc::UnboundedSender<TimerEvent>, clock: Arc<dyn Clock>, min_delay: Duration) -> Self {
        Self {
            events,
            clock,
            min_delay,
            armed: Mutex::new(HashMap::new()),
        }
    }

    /// Number of alarms currently armed
    pub fn armed_count(&self) -> usize {
        let armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        armed.values().filter(|handle| !handle.is_finished()).count()
    }

    fn delay_until(&self, at_ms: i64) -> Duration {
        let wait = Duration::from_millis((at_ms - self.clock.now_ms()).max(0) as u64);
        wait.max(self.min_delay)
    }
}

impl HostAlarms for TokioAlarms {
    fn arm(&self, request: WakeRequest) {
        let events = self.events.clone();
        let wake = request.event();

        let handle = match request.trigger {
            WakeTrigger::At(at_ms) => {
                let wait = self.delay_until(at_ms);
                tokio::spawn(async move {
                    sleep(wait).await;
                    if events.send(TimerEvent::Wake(wake)).is_err() {
                        warn!("Alarm {} fired after the event loop stopped", request.kind);
                    }
                })
            }
            WakeTrigger::Every(period) => tokio::spawn(async move {
                let mut ticks = interval_at(Instant::now() + period, period);
                loop {
                    ticks.tick().await;
                    if events.send(TimerEvent::Wake(wake)).is_err() {
                        break;
                    }
                }
            }),
        };

        let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = armed.insert(request.kind, handle) {
            previous.abort();
        }
    }

    fn cancel_all(&self) {
        let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        for (kind, handle) in armed.drain() {
            debug!("Cancelling {} alarm", kind);
            handle.abort();
        }
    }
}

/// In-process timer: a detached tokio sleep that posts one event
pub struct TokioInProcessTimer {
    events: mpsc::UnboundedSender<TimerEvent>,
}

impl TokioInProcessTimer {
    pub fn new(events: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self { events }
    }
}

impl InProcessTimer for TokioInProcessTimer {
    fn after(&self, delay: Duration, event: TimerEvent) {
        let events = self.events.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            if events.send(event).is_err() {
                debug!("In-process timer fired after the event loop stopped");
            }
        });
    }
}
