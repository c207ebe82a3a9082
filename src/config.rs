//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "tomato-clockd")]
#[command(about = "A suspend-tolerant countdown timer daemon")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding the timer state and timeline
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Settings file (defaults to settings.json in the data directory)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Minimum delay of host alarms in seconds, to mimic a coarse scheduler
    #[arg(long, default_value = "0")]
    pub alarm_min_delay_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Data directory, falling back to the platform data dir
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tomato-clockd")
        })
    }

    pub fn settings_path(&self) -> PathBuf {
        self.settings
            .clone()
            .unwrap_or_else(|| self.data_dir().join("settings.json"))
    }

    pub fn alarm_min_delay(&self) -> Duration {
        Duration::from_secs(self.alarm_min_delay_secs)
    }
}
