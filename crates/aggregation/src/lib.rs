//! Summary views computed from the sandwich event log.

pub mod ranking;
pub mod summary;

pub use ranking::{rank_bots, BotCount};
pub use summary::{summarize, summarize_with_limit, DashboardSummary, DEFAULT_TOP_BOTS};
