//! Dashboard refresh loop.

use crate::config::DashboardConfig;
use crate::render::{RenderError, SummaryRenderer};
use async_trait::async_trait;
use mev_inspector_aggregation::{summarize_with_limit, DashboardSummary, DEFAULT_TOP_BOTS};
use mev_inspector_ingestion::{EventLogError, EventLogReader, SkipCounts};
use mev_inspector_telemetry::{audit, Metrics};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Error type for the refresh loop. Either one ends the loop.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error(transparent)]
    Read(#[from] EventLogError),
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
}

/// Suspension between ticks.
///
/// Swapped out in tests so the loop runs without wall-clock waits.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// What one tick read and rendered.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    #[serde(flatten)]
    pub summary: DashboardSummary,
    pub skipped: SkipCounts,
    #[serde(skip)]
    pub read_duration: Duration,
}

/// Read, aggregate and render the event log on a fixed interval.
pub struct RefreshLoop<R, S> {
    reader: EventLogReader,
    renderer: R,
    sleeper: S,
    interval: Duration,
    top_n: usize,
    metrics: Option<Metrics>,
    snapshot_path: Option<PathBuf>,
}

impl<R: SummaryRenderer, S: Sleeper> RefreshLoop<R, S> {
    /// Create a loop with the default interval and leaderboard size.
    pub fn new(reader: EventLogReader, renderer: R, sleeper: S) -> Self {
        Self {
            reader,
            renderer,
            sleeper,
            interval: DashboardConfig::default().refresh_interval(),
            top_n: DEFAULT_TOP_BOTS,
            metrics: None,
            snapshot_path: None,
        }
    }

    /// Create a loop from a dashboard configuration.
    pub fn from_config(config: &DashboardConfig, renderer: R, sleeper: S) -> Self {
        let mut refresh = Self::new(EventLogReader::new(&config.log_path), renderer, sleeper)
            .with_interval(config.refresh_interval())
            .with_top_n(config.top_n);
        refresh.snapshot_path = config.snapshot_output_path.clone();
        refresh
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Run a single refresh: read the whole log, aggregate, render.
    pub fn tick(&mut self) -> Result<TickReport, RefreshError> {
        let started = Instant::now();
        let read = match self.reader.read() {
            Ok(read) => read,
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    metrics.inc_read_errors();
                }
                return Err(e.into());
            }
        };
        let read_duration = started.elapsed();

        let report = TickReport {
            summary: summarize_with_limit(&read.events, self.top_n),
            skipped: read.skipped,
            read_duration,
        };

        self.renderer.render(&report.summary)?;

        if let Some(metrics) = &self.metrics {
            metrics.observe_read_latency(read_duration.as_secs_f64());
            metrics.observe_refresh(
                report.summary.total_attacks,
                report.summary.unique_bots,
                report.summary.last_block.block(),
                report.skipped.total(),
            );
        }

        if let Err(e) = audit::write_snapshot(self.snapshot_path.as_ref(), &report) {
            warn!("Failed to write snapshot: {}", e);
        }

        debug!(
            "Refreshed {} events ({} skipped lines) in {:?}",
            report.summary.total_attacks,
            report.skipped.total(),
            read_duration
        );
        Ok(report)
    }

    /// Refresh forever. Only returns on a read or render failure.
    pub async fn run(&mut self) -> Result<(), RefreshError> {
        info!(
            "Watching {:?}, refreshing every {:?}",
            self.reader.path(),
            self.interval
        );

        loop {
            self.tick()?;
            self.sleeper.sleep(self.interval).await;
        }
    }

    /// Run exactly `ticks` refreshes, sleeping after each.
    pub async fn run_ticks(&mut self, ticks: usize) -> Result<Vec<TickReport>, RefreshError> {
        let mut reports = Vec::with_capacity(ticks);
        for _ in 0..ticks {
            reports.push(self.tick()?);
            self.sleeper.sleep(self.interval).await;
        }
        Ok(reports)
    }
}
