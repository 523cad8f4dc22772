//! Event log models and types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single sandwich attack observation, one per log line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SandwichEvent {
    pub block_number: u64,
    pub bot_address: String,
    pub victim_address: String,
    pub tx_front: String,
    /// Every other field, kept verbatim whatever its type.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SandwichEvent {
    /// Create an event with only the required fields set.
    pub fn new(
        block_number: u64,
        bot_address: impl Into<String>,
        victim_address: impl Into<String>,
        tx_front: impl Into<String>,
    ) -> Self {
        Self {
            block_number,
            bot_address: bot_address.into(),
            victim_address: victim_address.into(),
            tx_front: tx_front.into(),
            extra: Map::new(),
        }
    }

    /// Victim transaction hash, when the producer wrote one as a string.
    pub fn tx_victim(&self) -> Option<&str> {
        self.extra.get("tx_victim").and_then(Value::as_str)
    }

    /// Back-running transaction hash, when the producer wrote one as a string.
    pub fn tx_back(&self) -> Option<&str> {
        self.extra.get("tx_back").and_then(Value::as_str)
    }

    /// Project the event onto the dashboard table columns.
    pub fn to_row(&self) -> EventRow {
        EventRow::from(self)
    }
}

/// Fixed-column projection shown in the "latest attacks" table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    pub block_number: u64,
    pub bot_address: String,
    pub victim_address: String,
    pub tx_front: String,
}

impl EventRow {
    /// Column headers, in display and export order.
    pub const COLUMNS: [&'static str; 4] =
        ["block_number", "bot_address", "victim_address", "tx_front"];
}

impl From<&SandwichEvent> for EventRow {
    fn from(event: &SandwichEvent) -> Self {
        Self {
            block_number: event.block_number,
            bot_address: event.bot_address.clone(),
            victim_address: event.victim_address.clone(),
            tx_front: event.tx_front.clone(),
        }
    }
}

/// Most recent attack block, or nothing seen yet.
///
/// Kept as a tagged value so an empty log never reads as block 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LastBlock {
    #[default]
    Waiting,
    Block(u64),
}

impl LastBlock {
    pub fn block(&self) -> Option<u64> {
        match self {
            LastBlock::Waiting => None,
            LastBlock::Block(number) => Some(*number),
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, LastBlock::Waiting)
    }
}

impl From<Option<u64>> for LastBlock {
    fn from(block: Option<u64>) -> Self {
        block.map_or(LastBlock::Waiting, LastBlock::Block)
    }
}

impl fmt::Display for LastBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastBlock::Waiting => f.write_str("Waiting..."),
            LastBlock::Block(number) => write!(f, "{}", number),
        }
    }
}

impl Serialize for LastBlock {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.block().serialize(serializer)
    }
}
