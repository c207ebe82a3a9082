//! Events consumed by the timer event loop

use serde::Serialize;
use tokio::sync::oneshot;

use crate::{
    error::StoreError,
    state::TimerState,
    timer::TimerCategory,
    wake::WakeEvent,
};

/// Inbound commands from the outer command surface
#[derive(Debug)]
pub enum Command {
    Start {
        category: TimerCategory,
        reply: oneshot::Sender<Result<TimerState, StoreError>>,
    },
    Reset {
        reply: oneshot::Sender<Result<(), StoreError>>,
    },
    ScheduledCompletion {
        reply: oneshot::Sender<Option<i64>>,
    },
    Status {
        reply: oneshot::Sender<TimerSnapshot>,
    },
}

/// Everything the controller reacts to, handled strictly one at a time
#[derive(Debug)]
pub enum TimerEvent {
    Command(Command),
    /// A host alarm fired
    Wake(WakeEvent),
    /// The in-process wait started by a precision wake ran out
    PrecisionElapsed { armed_for: i64 },
    /// One-off badge refresh shortly after a start or badge wake
    BadgeRefresh,
    /// The machine came back from suspend
    Resumed,
}

/// Point-in-time view of the timer for status queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub remaining_ms: Option<i64>,
    pub badge: String,
}
