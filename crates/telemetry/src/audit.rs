//! Snapshot logging of rendered summaries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

#[derive(Serialize)]
struct Snapshot<'a, T> {
    refreshed_at: DateTime<Utc>,
    #[serde(flatten)]
    payload: &'a T,
}

/// Append a timestamped JSON snapshot line to the snapshot file.
///
/// # Arguments
/// * `path` - Path to the snapshot file; nothing is written when `None`
/// * `payload` - Serializable payload, must serialize as a JSON object
pub fn write_snapshot<P: AsRef<Path>, T: Serialize>(
    path: Option<P>,
    payload: &T,
) -> anyhow::Result<()> {
    if let Some(snapshot_path) = path {
        let json = serde_json::to_string(&Snapshot {
            refreshed_at: Utc::now(),
            payload,
        })?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&snapshot_path)?;
        writeln!(file, "{}", json)?;
        debug!("Wrote snapshot to {:?}", snapshot_path.as_ref());
    }
    Ok(())
}
