//! Prometheus metrics for the dashboard refresh loop.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder,
};

/// Metrics collector for the refresh loop.
///
/// Each instance owns its registry so several can coexist (tests, embedding).
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    ticks: IntCounter,
    read_errors: IntCounter,
    events: IntGauge,
    unique_bots: IntGauge,
    last_block: IntGauge,
    skipped_lines: IntGauge,
    read_latency: Histogram,
}

impl Metrics {
    /// Create a new metrics instance.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let ticks = IntCounter::new(
            "mev_inspector_refresh_ticks_total",
            "Total number of completed dashboard refreshes",
        )?;
        let read_errors = IntCounter::new(
            "mev_inspector_read_errors_total",
            "Total number of event log reads that failed",
        )?;
        let events = IntGauge::new(
            "mev_inspector_events",
            "Sandwich events in the log at the last refresh",
        )?;
        let unique_bots = IntGauge::new(
            "mev_inspector_unique_bots",
            "Distinct bot addresses at the last refresh",
        )?;
        let last_block = IntGauge::new(
            "mev_inspector_last_block",
            "Most recent attack block at the last refresh, 0 when none",
        )?;
        let skipped_lines = IntGauge::new(
            "mev_inspector_skipped_lines",
            "Log lines that did not parse at the last refresh",
        )?;
        let read_latency = Histogram::with_opts(HistogramOpts::new(
            "mev_inspector_read_latency_seconds",
            "Event log read and parse latency in seconds",
        ))?;

        registry.register(Box::new(ticks.clone()))?;
        registry.register(Box::new(read_errors.clone()))?;
        registry.register(Box::new(events.clone()))?;
        registry.register(Box::new(unique_bots.clone()))?;
        registry.register(Box::new(last_block.clone()))?;
        registry.register(Box::new(skipped_lines.clone()))?;
        registry.register(Box::new(read_latency.clone()))?;

        Ok(Self {
            registry,
            ticks,
            read_errors,
            events,
            unique_bots,
            last_block,
            skipped_lines,
            read_latency,
        })
    }

    /// Record the outcome of a completed refresh.
    pub fn observe_refresh(
        &self,
        events: usize,
        unique_bots: usize,
        last_block: Option<u64>,
        skipped_lines: usize,
    ) {
        self.ticks.inc();
        self.events.set(events as i64);
        self.unique_bots.set(unique_bots as i64);
        self.last_block.set(last_block.unwrap_or(0) as i64);
        self.skipped_lines.set(skipped_lines as i64);
    }

    /// Increment the read errors counter.
    pub fn inc_read_errors(&self) {
        self.read_errors.inc();
    }

    /// Record read latency.
    pub fn observe_read_latency(&self, duration_secs: f64) {
        self.read_latency.observe(duration_secs);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.get()
    }

    /// Get Prometheus metrics as a string.
    pub fn gather(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_is_exported() {
        let metrics = Metrics::new().unwrap();
        metrics.observe_refresh(3, 2, Some(105), 1);
        metrics.observe_read_latency(0.002);

        let text = metrics.gather().unwrap();
        assert!(text.contains("mev_inspector_refresh_ticks_total 1"));
        assert!(text.contains("mev_inspector_events 3"));
        assert!(text.contains("mev_inspector_unique_bots 2"));
        assert!(text.contains("mev_inspector_last_block 105"));
        assert!(text.contains("mev_inspector_skipped_lines 1"));
        assert!(text.contains("mev_inspector_read_latency_seconds_count 1"));
    }

    #[test]
    fn test_instances_are_independent() {
        let first = Metrics::new().unwrap();
        let second = Metrics::new().unwrap();
        first.observe_refresh(1, 1, None, 0);
        first.inc_read_errors();

        assert_eq!(first.ticks(), 1);
        assert_eq!(second.ticks(), 0);
        assert!(second.gather().unwrap().contains("mev_inspector_read_errors_total 0"));
    }
}
