//! Wake scheduling module
//!
//! Host alarms revive the controller; in-process timers refine the wait.

pub mod host;
pub mod request;
pub mod scheduler;

pub use host::{TokioAlarms, TokioInProcessTimer};
pub use request::{HostAlarms, InProcessTimer, WakeEvent, WakeKind, WakeRequest, WakeTrigger};
pub use scheduler::{plan_wakes, WakeScheduler, BADGE_WAKE_PERIOD, PRECISION_LEAD_MS};
