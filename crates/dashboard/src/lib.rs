//! Live dashboard over the sandwich event log.
//!
//! The refresh loop re-reads the whole log on every tick, aggregates it and
//! hands the summary to a [`SummaryRenderer`]. Nothing carries over between
//! ticks.

pub mod config;
pub mod export;
pub mod render;
pub mod scheduler;

pub use config::{DashboardConfig, OutputFormat};
pub use render::{JsonRenderer, RenderError, SummaryRenderer, TerminalRenderer};
pub use scheduler::{RefreshError, RefreshLoop, Sleeper, TickReport, TokioSleeper};
