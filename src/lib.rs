//! Tomato Clock daemon - a countdown timer that survives suspension
//!
//! The timer state lives on disk and every wake-up re-reads it. Coarse host
//! alarms revive the controller shortly before completion, an in-process
//! timer waits out the exact remainder, and a compact badge label mirrors
//! the minutes left.

pub mod api;
pub mod badge;
pub mod clock;
pub mod completion;
pub mod config;
pub mod controller;
pub mod error;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;
pub mod wake;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use controller::{TimerController, TimerHandle};
pub use state::{AppState, TimerState};
pub use timer::TimerCategory;
pub use utils::signals::shutdown_signal;
