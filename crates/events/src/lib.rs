//! Sandwich attack event records as written to the JSONL event log.

pub mod models;

pub use models::{EventRow, LastBlock, SandwichEvent};
