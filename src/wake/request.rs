//! Wake requests and the host primitives that honor them

use std::{fmt, time::Duration};

use serde::Serialize;

use crate::controller::TimerEvent;

/// Named wake categories; arming a name again replaces the previous request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WakeKind {
    /// Fires shortly before completion to revive the process for an exact in-process wait
    Precision,
    /// Fires exactly at completion in case the in-process wait was lost
    Fallback,
    /// Periodic badge refresh
    Badge,
}

impl fmt::Display for WakeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WakeKind::Precision => "timer-wake",
            WakeKind::Fallback => "timer-fallback",
            WakeKind::Badge => "badge",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeTrigger {
    /// Fire once at a wall-clock instant (epoch ms)
    At(i64),
    /// Fire repeatedly with this period, first after one period
    Every(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeRequest {
    pub kind: WakeKind,
    pub trigger: WakeTrigger,
    /// Scheduled completion of the timer this wake belongs to
    pub armed_for: Option<i64>,
}

impl WakeRequest {
    /// The event delivered when this request fires
    pub fn event(&self) -> WakeEvent {
        WakeEvent {
            kind: self.kind,
            armed_for: self.armed_for,
        }
    }
}

/// A fired wake as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeEvent {
    pub kind: WakeKind,
    pub armed_for: Option<i64>,
}

/// Host scheduling primitive: coarse, durable-looking wakes that revive the controller
pub trait HostAlarms: Send + Sync {
    fn arm(&self, request: WakeRequest);
    fn cancel_all(&self);
}

/// Short-lived in-process timer, used for exact waits and quick badge refreshes.
///
/// Nothing armed here survives a restart or is tracked for cancellation;
/// whoever receives the event re-validates against the store.
pub trait InProcessTimer: Send + Sync {
    fn after(&self, delay: Duration, event: TimerEvent);
}
