//! Two-tier wake policy
//!
//! The host alarm is too coarse to finish a timer on the second, so it is
//! only used to get the controller running again shortly before completion.
//! The exact remainder is then waited out in-process. A second host alarm at
//! the completion instant covers the case where that in-process wait is
//! lost to another suspension.

use std::{sync::Arc, time::Duration};
use tracing::debug;

use super::{HostAlarms, WakeKind, WakeRequest, WakeTrigger};

/// How long before completion the precision wake fires
pub const PRECISION_LEAD_MS: i64 = 25_000;

/// Period of the badge refresh wake
pub const BADGE_WAKE_PERIOD: Duration = Duration::from_secs(60);

/// Wakes needed for a timer due at `scheduled_ms`, evaluated at `now_ms`
pub fn plan_wakes(scheduled_ms: i64, now_ms: i64) -> Vec<WakeRequest> {
    let mut plan = Vec::with_capacity(3);
    let remaining = scheduled_ms - now_ms;

    if remaining > PRECISION_LEAD_MS {
        plan.push(WakeRequest {
            kind: WakeKind::Precision,
            trigger: WakeTrigger::At(scheduled_ms - PRECISION_LEAD_MS),
            armed_for: Some(scheduled_ms),
        });
    }

    plan.push(WakeRequest {
        kind: WakeKind::Fallback,
        trigger: WakeTrigger::At(scheduled_ms),
        armed_for: Some(scheduled_ms),
    });

    plan.push(WakeRequest {
        kind: WakeKind::Badge,
        trigger: WakeTrigger::Every(BADGE_WAKE_PERIOD),
        armed_for: Some(scheduled_ms),
    });

    plan
}

/// Arms and cancels the wakes of the active timer on the host
pub struct WakeScheduler {
    host: Arc<dyn HostAlarms>,
}

impl WakeScheduler {
    pub fn new(host: Arc<dyn HostAlarms>) -> Self {
        Self { host }
    }

    /// Arm every wake the timer due at `scheduled_ms` needs
    pub fn arm(&self, scheduled_ms: i64, now_ms: i64) -> Vec<WakeKind> {
        plan_wakes(scheduled_ms, now_ms)
            .into_iter()
            .map(|request| {
                debug!("Arming {} wake: {:?}", request.kind, request.trigger);
                self.host.arm(request);
                request.kind
            })
            .collect()
    }

    /// Cancel wakes of every category
    pub fn cancel_all(&self) {
        debug!("Cancelling all wakes");
        self.host.cancel_all();
    }
}
