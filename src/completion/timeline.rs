//! Append-only history of completed timers (one JSON object per line)

use std::{
    fs::{self, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::{debug, error, warn};

use super::{CompletionEvent, CompletionSink};
use crate::{error::SinkError, timer::TimerCategory};

pub const TIMELINE_FILE: &str = "timeline.jsonl";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineRecord {
    pub category: TimerCategory,
    pub total_duration_ms: u64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TimelineLog {
    path: PathBuf,
}

impl TimelineLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(TIMELINE_FILE))
    }

    fn io_err(&self, source: std::io::Error) -> SinkError {
        SinkError::Timeline {
            path: self.path.clone(),
            source,
        }
    }

    pub fn append(&self, record: &TimelineRecord) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        file.write_all(&line).map_err(|e| self.io_err(e))?;
        Ok(())
    }

    /// All readable records, oldest first. Unparseable lines are skipped.
    pub fn records(&self) -> Result<Vec<TimelineRecord>, SinkError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(e)),
        };

        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.io_err(e))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping bad timeline line: {}", e),
            }
        }
        Ok(records)
    }
}

impl CompletionSink for TimelineLog {
    fn on_completion(&self, event: &CompletionEvent) -> Result<(), SinkError> {
        let completed_at = DateTime::<Utc>::from_timestamp_millis(event.completed_at_ms)
            .ok_or_else(|| SinkError::Custom(format!("Invalid completion time {}", event.completed_at_ms)))?;

        let record = TimelineRecord {
            category: event.category,
            total_duration_ms: event.total_duration_ms,
            completed_at,
        };

        // Inside the daemon the file write happens on the blocking pool
        let Ok(runtime) = Handle::try_current() else {
            self.append(&record)?;
            debug!("Timeline entry added for {}", record.category);
            return Ok(());
        };
        let log = self.clone();
        runtime.spawn_blocking(move || match log.append(&record) {
            Ok(()) => debug!("Timeline entry added for {}", record.category),
            Err(e) => error!("Failed to append timeline entry: {}", e),
        });
        Ok(())
    }
}
