//! Dashboard summary aggregation.

use crate::ranking::{rank_bots, BotCount};
use mev_inspector_events::{EventRow, LastBlock, SandwichEvent};
use serde::Serialize;
use std::collections::HashSet;

/// Number of bots on the leaderboard unless configured otherwise.
pub const DEFAULT_TOP_BOTS: usize = 5;

/// Everything the dashboard shows for one refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_attacks: usize,
    pub unique_bots: usize,
    pub last_block: LastBlock,
    /// Every event, most recent block first.
    pub latest_records: Vec<EventRow>,
    pub top_bots: Vec<BotCount>,
}

impl DashboardSummary {
    /// True when no attack has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.total_attacks == 0
    }
}

/// Summarize events with the default leaderboard size.
///
/// `events` is expected in the reader's order (block number descending);
/// that order is kept in `latest_records`.
pub fn summarize(events: &[SandwichEvent]) -> DashboardSummary {
    summarize_with_limit(events, DEFAULT_TOP_BOTS)
}

/// Summarize events, keeping at most `top_n` bots on the leaderboard.
pub fn summarize_with_limit(events: &[SandwichEvent], top_n: usize) -> DashboardSummary {
    let unique_bots = events
        .iter()
        .map(|e| e.bot_address.as_str())
        .collect::<HashSet<_>>()
        .len();

    DashboardSummary {
        total_attacks: events.len(),
        unique_bots,
        last_block: events.iter().map(|e| e.block_number).max().into(),
        latest_records: events.iter().map(EventRow::from).collect(),
        top_bots: rank_bots(events, top_n),
    }
}
