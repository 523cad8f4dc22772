//! Event log ingestion for the MEV inspector dashboard.

pub mod event_log;

pub use event_log::{
    parse_line, read_events, EventLogError, EventLogReader, LineOutcome, ReadReport, SkipCounts,
    SkipReason,
};
