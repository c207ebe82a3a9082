//! Timer state record, the single source of truth for the active countdown

use serde::{Deserialize, Serialize};

use crate::timer::TimerCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
}

/// Persisted timer state
///
/// `status == Idle` iff `category` and `scheduled_completion_ms` are both
/// `None`, and `total_duration_ms` is zero only when idle. The constructors
/// are the only way the controller builds one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub status: TimerStatus,
    pub category: Option<TimerCategory>,
    /// Wall-clock instant (epoch ms) the timer is due to finish
    pub scheduled_completion_ms: Option<i64>,
    pub total_duration_ms: u64,
}

impl TimerState {
    /// Create an idle timer state
    pub fn idle() -> Self {
        Self {
            status: TimerStatus::Idle,
            category: None,
            scheduled_completion_ms: None,
            total_duration_ms: 0,
        }
    }

    /// Create a running timer state
    pub fn running(category: TimerCategory, scheduled_completion_ms: i64, total_duration_ms: u64) -> Self {
        Self {
            status: TimerStatus::Running,
            category: Some(category),
            scheduled_completion_ms: Some(scheduled_completion_ms),
            total_duration_ms,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Whether this is the running timer that was scheduled to finish at `scheduled_ms`
    pub fn is_running_for(&self, scheduled_ms: i64) -> bool {
        self.is_running() && self.scheduled_completion_ms == Some(scheduled_ms)
    }

    /// Milliseconds left at `now_ms`; negative once the timer is overdue
    pub fn remaining_ms(&self, now_ms: i64) -> Option<i64> {
        if !self.is_running() {
            return None;
        }
        self.scheduled_completion_ms.map(|at| at - now_ms)
    }

    /// Whether the record satisfies the idle/running invariants.
    ///
    /// Records read back from disk are checked with this before use.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            TimerStatus::Idle => {
                self.category.is_none() && self.scheduled_completion_ms.is_none() && self.total_duration_ms == 0
            }
            TimerStatus::Running => {
                self.category.is_some() && self.scheduled_completion_ms.is_some() && self.total_duration_ms > 0
            }
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::idle()
    }
}
