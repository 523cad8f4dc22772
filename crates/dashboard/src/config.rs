//! Dashboard configuration

pub use mev_inspector_aggregation::DEFAULT_TOP_BOTS;

use std::path::PathBuf;
use std::time::Duration;

/// Event log path the detector writes to by default.
pub const DEFAULT_LOG_PATH: &str = "mev_data.jsonl";

/// Seconds between refreshes.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Full-screen dashboard redrawn on every tick
    #[default]
    Terminal,
    /// One JSON document per tick
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// JSONL event log to tail
    pub log_path: PathBuf,

    /// Seconds to sleep between refreshes
    pub refresh_interval_secs: u64,

    /// Leaderboard size
    pub top_n: usize,

    pub format: OutputFormat,

    /// Draw the terminal dashboard on the alternate screen
    pub alternate_screen: bool,

    /// Prometheus metrics bind address, disabled when unset
    pub metrics_bind_address: Option<String>,

    /// File receiving one JSON snapshot per refresh
    pub snapshot_output_path: Option<PathBuf>,
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            top_n: DEFAULT_TOP_BOTS,
            format: OutputFormat::Terminal,
            alternate_screen: true,
            metrics_bind_address: None,
            snapshot_output_path: None,
        }
    }
}
