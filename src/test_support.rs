//! Fakes for the host primitives and collaborators, shared by unit tests

use std::{
    sync::{
        atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use crate::{
    badge::{Badge, BadgeIndicator},
    clock::Clock,
    completion::{CompletionEvent, CompletionSink},
    controller::TimerEvent,
    error::{SinkError, StoreError},
    state::{FileStateStore, StateStore, TimerState},
    wake::{HostAlarms, InProcessTimer, WakeRequest},
};

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Host alarms that only remember what is armed
#[derive(Debug, Default)]
pub struct RecordingAlarms {
    armed: Mutex<Vec<WakeRequest>>,
    cancellations: AtomicUsize,
}

impl RecordingAlarms {
    pub fn armed(&self) -> Vec<WakeRequest> {
        self.armed.lock().unwrap().clone()
    }

    pub fn cancellations(&self) -> usize {
        self.cancellations.load(Ordering::SeqCst)
    }
}

impl HostAlarms for RecordingAlarms {
    fn arm(&self, request: WakeRequest) {
        let mut armed = self.armed.lock().unwrap();
        armed.retain(|r| r.kind != request.kind);
        armed.push(request);
    }

    fn cancel_all(&self) {
        self.armed.lock().unwrap().clear();
        self.cancellations.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-process timer that hands its events back to the test instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingTimers {
    pending: Mutex<Vec<(Duration, TimerEvent)>>,
}

impl RecordingTimers {
    pub fn take(&self) -> Vec<(Duration, TimerEvent)> {
        std::mem::take(&mut *self.pending.lock().unwrap())
    }
}

impl InProcessTimer for RecordingTimers {
    fn after(&self, delay: Duration, event: TimerEvent) {
        self.pending.lock().unwrap().push((delay, event));
    }
}

/// Badge indicator that counts writes
#[derive(Debug, Default)]
pub struct MemoryBadge {
    badge: Mutex<Badge>,
    writes: AtomicUsize,
}

impl MemoryBadge {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn color(&self) -> Option<String> {
        self.badge.lock().unwrap().color.clone()
    }
}

impl BadgeIndicator for MemoryBadge {
    fn write(&self, text: &str, color: Option<&str>) {
        *self.badge.lock().unwrap() = Badge {
            text: text.to_string(),
            color: color.map(str::to_string),
        };
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    fn read(&self) -> String {
        self.badge.lock().unwrap().text.clone()
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<CompletionEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<CompletionEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl CompletionSink for RecordingSink {
    fn on_completion(&self, event: &CompletionEvent) -> Result<(), SinkError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Sink that always fails
#[derive(Debug, Default)]
pub struct FailingSink;

impl CompletionSink for FailingSink {
    fn on_completion(&self, _event: &CompletionEvent) -> Result<(), SinkError> {
        Err(SinkError::Custom("notification backend unavailable".to_string()))
    }
}

/// File store whose `clear` can be switched to fail
pub struct ClearFailingStore {
    inner: FileStateStore,
    fail_clear: AtomicBool,
}

impl ClearFailingStore {
    pub fn new(inner: FileStateStore) -> Self {
        Self {
            inner,
            fail_clear: AtomicBool::new(false),
        }
    }

    pub fn fail_clear(&self, fail: bool) {
        self.fail_clear.store(fail, Ordering::SeqCst);
    }
}

impl StateStore for ClearFailingStore {
    fn load(&self) -> TimerState {
        self.inner.load()
    }

    fn save(&self, state: &TimerState) -> Result<(), StoreError> {
        self.inner.save(state)
    }

    fn clear(&self) -> Result<(), StoreError> {
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(StoreError::Remove {
                path: self.inner.path().to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only data dir"),
            });
        }
        self.inner.clear()
    }
}
