//! Tomato Clock daemon
//!
//! This is the main entry point for the tomato-clockd application.

use std::sync::Arc;
use tokio::{net::TcpListener, sync::mpsc};
use tracing::info;

use tomato_clockd::{
    api::create_router,
    badge::WatchBadge,
    clock::{Clock, SystemClock},
    completion::{Notifier, TimelineLog},
    config::Config,
    controller::{TimerController, TimerHandle},
    settings::{JsonSettingsFile, SettingsProvider},
    state::{AppState, FileStateStore},
    tasks::{timer_event_loop, wake_up_recovery_task},
    utils::shutdown_signal,
    wake::{TokioAlarms, TokioInProcessTimer},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("tomato_clockd={},tower_http=info", config.log_level()))
        .init();

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    info!("Starting tomato-clockd v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, data_dir={}, settings={}",
        config.host,
        config.port,
        data_dir.display(),
        config.settings_path().display()
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let settings: Arc<dyn SettingsProvider> = Arc::new(JsonSettingsFile::new(config.settings_path()));
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let (badge, badge_rx) = WatchBadge::new();
    let timeline = Arc::new(TimelineLog::in_dir(&data_dir));
    let notifier = Arc::new(Notifier::new(Arc::clone(&settings)));

    let controller = TimerController::new(
        Arc::new(FileStateStore::in_dir(&data_dir)),
        Arc::clone(&settings),
        Arc::new(TokioAlarms::new(events_tx.clone(), Arc::clone(&clock), config.alarm_min_delay())),
        Arc::new(TokioInProcessTimer::new(events_tx.clone())),
        Arc::new(badge),
        Arc::clone(&clock),
    )
    .with_sink(notifier)
    .with_sink(timeline.clone());

    let handle = TimerHandle::new(events_tx);

    // Start the timer event loop and the wake-up recovery task
    tokio::spawn(timer_event_loop(controller, events_rx));
    tokio::spawn(wake_up_recovery_task(handle.clone(), Arc::clone(&clock)));

    let state = AppState::new(handle, badge_rx, timeline, config.port, config.host.clone());
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/:category/start - Start a primary, short-rest or long-rest timer");
    info!("  POST /timer/reset           - Reset the timer");
    info!("  GET  /timer/scheduled       - Scheduled completion of the running timer");
    info!("  GET  /badge                 - Current badge label");
    info!("  GET  /status                - Timer status");
    info!("  GET  /timeline              - Completed timers");
    info!("  GET  /health                - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to install signal handler: {}", e),
            }
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
