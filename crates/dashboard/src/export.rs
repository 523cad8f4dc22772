//! CSV export of the latest attacks table.

use mev_inspector_events::EventRow;
use std::path::Path;
use tracing::info;

/// Write rows to a CSV file, header first.
///
/// # Returns
/// The number of data rows written
pub fn write_csv<P: AsRef<Path>>(rows: &[EventRow], path: P) -> Result<usize, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())?;

    // Written by hand so an empty table still gets a header.
    writer.write_record(EventRow::COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Exported {} rows to {:?}", rows.len(), path.as_ref());
    Ok(rows.len())
}
