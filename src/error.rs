//! Error types shared across the daemon

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the persistent timer state store.
///
/// Only writes surface these; a failed read degrades to the idle state.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write timer state to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove timer state at {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode timer state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failures reported by a completion sink.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to append to timeline {path}: {source}")]
    Timeline {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode completion record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

/// Failures talking to the timer event loop from the outside.
#[derive(Error, Debug)]
pub enum HandleError {
    #[error("Timer event loop is not running")]
    LoopClosed,

    #[error("Timer event loop dropped the reply")]
    NoReply,

    #[error(transparent)]
    Store(#[from] StoreError),
}
