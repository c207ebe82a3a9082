//! Timer event loop background task

use tokio::sync::mpsc;
use tracing::info;

use crate::controller::{TimerController, TimerEvent};

/// Runs the controller: reconciles stored state once, then handles events one at a time
pub async fn timer_event_loop(controller: TimerController, mut events: mpsc::UnboundedReceiver<TimerEvent>) {
    info!("Starting timer event loop");

    // Wakes armed before a restart died with the old process
    controller.reconcile("startup");

    while let Some(event) = events.recv().await {
        controller.handle(event);
    }

    info!("Timer event loop stopped");
}
