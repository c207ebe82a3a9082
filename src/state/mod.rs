//! State management module
//!
//! The persisted timer record, the store that keeps it, and the shared
//! state handed to the HTTP layer.

pub mod app_state;
pub mod store;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use store::{FileStateStore, StateStore, TIMER_STATE_FILE};
pub use timer_state::{TimerState, TimerStatus};
