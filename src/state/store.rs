//! Durable storage for the timer state
//!
//! The daemon may be killed or the machine suspended between any two
//! operations, so the state lives on disk and every write replaces the whole
//! record atomically (write to a sibling temp file, then rename over).

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use super::TimerState;
use crate::error::StoreError;

/// File name of the timer record inside the data directory
pub const TIMER_STATE_FILE: &str = "timer.json";

/// Single-key store for the active timer
pub trait StateStore: Send + Sync {
    /// Load the persisted state, or the idle state if none is usable
    fn load(&self) -> TimerState;
    fn save(&self, state: &TimerState) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// JSON file backed store
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the record as `timer.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(TIMER_STATE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> TimerState {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return TimerState::idle(),
            Err(e) => {
                warn!("Failed to read timer state {}: {}", self.path.display(), e);
                return TimerState::idle();
            }
        };

        match serde_json::from_slice::<TimerState>(&raw) {
            Ok(state) if state.is_consistent() => state,
            Ok(state) => {
                warn!("Discarding inconsistent timer state: {:?}", state);
                TimerState::idle()
            }
            Err(e) => {
                warn!("Discarding corrupt timer state {}: {}", self.path.display(), e);
                TimerState::idle()
            }
        }
    }

    fn save(&self, state: &TimerState) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec(state)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.write_err(e))?;
        }

        let tmp = self.temp_path();
        let mut file = fs::File::create(&tmp).map_err(|e| self.write_err(e))?;
        file.write_all(&encoded).map_err(|e| self.write_err(e))?;
        file.sync_all().map_err(|e| self.write_err(e))?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(|e| self.write_err(e))?;

        debug!("Timer state saved: {:?}", state);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
