//! Observability for the MEV inspector dashboard.

pub mod metrics;
pub mod logging;
pub mod audit;
pub mod server;

pub use metrics::Metrics;
pub use logging::{init_logging, LogFormat};
pub use server::serve_metrics;
