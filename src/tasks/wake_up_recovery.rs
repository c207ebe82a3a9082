//! Wake-up recovery background task
//!
//! Tokio timers follow the monotonic clock, which does not advance while the
//! machine is suspended. Comparing it against the wall clock reveals a
//! suspend, after which the controller is asked to reconcile.

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, Instant};
use tracing::{debug, info, warn};

use crate::{clock::Clock, controller::TimerHandle};

/// How often the clocks are compared
pub const RESUME_CHECK_INTERVAL: Duration = Duration::from_secs(15);

/// Wall-clock drift beyond the monotonic clock that counts as a suspend
pub const RESUME_TOLERANCE: Duration = Duration::from_secs(5);

/// Whether the wall clock ran ahead of the monotonic clock by more than `tolerance`
pub fn suspended_between(wall_elapsed_ms: i64, monotonic_elapsed: Duration, tolerance: Duration) -> bool {
    let drift = wall_elapsed_ms - monotonic_elapsed.as_millis() as i64;
    drift > tolerance.as_millis() as i64
}

/// Background task that checks for system wake-up and triggers timer reconciliation
pub async fn wake_up_recovery_task(timer: TimerHandle, clock: Arc<dyn Clock>) {
    info!("Starting wake-up recovery task");

    let mut ticks = interval(RESUME_CHECK_INTERVAL);
    let mut last_wall = clock.now_ms();
    let mut last_mono = Instant::now();

    loop {
        ticks.tick().await;

        let wall = clock.now_ms();
        let mono = Instant::now();
        let wall_elapsed = wall - last_wall;
        let mono_elapsed = mono.duration_since(last_mono);
        last_wall = wall;
        last_mono = mono;

        if suspended_between(wall_elapsed, mono_elapsed, RESUME_TOLERANCE) {
            info!(
                "System wake-up detected ({}ms wall vs {}ms monotonic), reconciling timer",
                wall_elapsed,
                mono_elapsed.as_millis()
            );
            if let Err(e) = timer.notify_resumed() {
                warn!("Failed to trigger wake-up reconciliation: {}", e);
                break;
            }
        } else {
            debug!("No suspend detected");
        }
    }
}
