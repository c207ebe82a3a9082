//! Completion sinks
//!
//! Collaborators told about every finished timer. A failing sink is logged
//! by the controller and never affects the timer state machine.

pub mod notifier;
pub mod timeline;

use serde::{Deserialize, Serialize};

use crate::{error::SinkError, timer::TimerCategory};

pub use notifier::{Notification, Notifier};
pub use timeline::{TimelineLog, TimelineRecord, TIMELINE_FILE};

/// Which path noticed the timer was done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionSource {
    Precision,
    Fallback,
    Reconcile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub category: TimerCategory,
    pub total_duration_ms: u64,
    pub scheduled_completion_ms: i64,
    pub completed_at_ms: i64,
    pub source: CompletionSource,
}

impl CompletionEvent {
    /// How late the completion was noticed, in milliseconds
    pub fn lateness_ms(&self) -> i64 {
        self.completed_at_ms - self.scheduled_completion_ms
    }
}

/// Receives completed timers
pub trait CompletionSink: Send + Sync {
    fn on_completion(&self, event: &CompletionEvent) -> Result<(), SinkError>;
}
