//! Append-only JSONL event log reader.

use mev_inspector_events::SandwichEvent;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Error type for event log reads.
///
/// A missing log and unparseable lines are not errors; only I/O failures
/// other than not-found end up here.
#[derive(Debug, thiserror::Error)]
pub enum EventLogError {
    #[error("Failed to read event log {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a log line produced no event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Empty or whitespace-only line.
    Blank,
    /// Not JSON at all, truncated JSON, or invalid UTF-8.
    Malformed,
    /// Valid JSON that is not an event object with the required fields.
    InvalidRecord,
}

/// Result of parsing a single log line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Parsed(SandwichEvent),
    Skipped(SkipReason),
}

/// Per-reason count of lines that produced no event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub blank: usize,
    pub malformed: usize,
    pub invalid_record: usize,
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Blank => self.blank += 1,
            SkipReason::Malformed => self.malformed += 1,
            SkipReason::InvalidRecord => self.invalid_record += 1,
        }
    }

    /// Lines skipped for any reason.
    pub fn total(&self) -> usize {
        self.blank + self.malformed + self.invalid_record
    }
}

/// Everything one pass over the log produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadReport {
    /// Parsed events, sorted by block number descending.
    pub events: Vec<SandwichEvent>,
    pub skipped: SkipCounts,
    /// Number of lines seen, parsed or not.
    pub lines: usize,
}

impl ReadReport {
    fn push(&mut self, outcome: LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Parsed(event) => self.events.push(event),
            LineOutcome::Skipped(reason) => self.skipped.record(reason),
        }
    }
}

/// Parse one raw log line.
///
/// # Arguments
/// * `line` - Line bytes without the trailing newline
pub fn parse_line(line: &[u8]) -> LineOutcome {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.iter().all(u8::is_ascii_whitespace) {
        return LineOutcome::Skipped(SkipReason::Blank);
    }

    let value: serde_json::Value = match serde_json::from_slice(line) {
        Ok(value) => value,
        Err(_) => return LineOutcome::Skipped(SkipReason::Malformed),
    };

    match serde_json::from_value(value) {
        Ok(event) => LineOutcome::Parsed(event),
        Err(_) => LineOutcome::Skipped(SkipReason::InvalidRecord),
    }
}

/// Reader over a newline-delimited JSON event log.
///
/// Holds no state between reads: every call re-reads the whole file.
#[derive(Debug, Clone)]
pub struct EventLogReader {
    path: PathBuf,
}

impl EventLogReader {
    /// Create a reader for the log at `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole log.
    ///
    /// # Returns
    /// Events sorted by block number descending (file order among equal
    /// blocks) and the count of skipped lines. A missing log yields an
    /// empty report.
    pub fn read(&self) -> Result<ReadReport, EventLogError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Event log {:?} does not exist yet", self.path);
                return Ok(ReadReport::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut report = ReadReport::default();
        for line in BufReader::new(file).split(b'\n') {
            let line = line.map_err(|e| self.io_error(e))?;
            report.push(parse_line(&line));
        }

        report
            .events
            .sort_by(|a, b| b.block_number.cmp(&a.block_number));

        if report.skipped.total() > 0 {
            debug!(
                "Skipped {} of {} lines in {:?} ({} blank, {} malformed, {} invalid)",
                report.skipped.total(),
                report.lines,
                self.path,
                report.skipped.blank,
                report.skipped.malformed,
                report.skipped.invalid_record,
            );
        }

        Ok(report)
    }

    fn io_error(&self, source: io::Error) -> EventLogError {
        EventLogError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Read the events in the log at `path`, most recent block first.
pub fn read_events<P: AsRef<Path>>(path: P) -> Result<Vec<SandwichEvent>, EventLogError> {
    EventLogReader::new(path.as_ref()).read().map(|report| report.events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_log(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn event_line(block: u64, bot: &str) -> String {
        format!(
            r#"{{"block_number":{},"bot_address":"{}","victim_address":"0xV","tx_front":"0xT{}"}}"#,
            block, bot, block
        )
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mev_data.jsonl");

        let report = EventLogReader::new(&path).read().unwrap();
        assert!(report.events.is_empty());
        assert_eq!(report.lines, 0);
        assert!(read_events(&path).unwrap().is_empty());
    }

    #[test]
    fn test_empty_file_is_empty() {
        let file = write_log(&[]);
        assert!(read_events(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_sorted_by_block_descending() {
        let file = write_log(&[
            &event_line(100, "0xA"),
            &event_line(105, "0xA"),
            "not json",
            &event_line(102, "0xB"),
        ]);

        let blocks: Vec<u64> = read_events(file.path())
            .unwrap()
            .iter()
            .map(|e| e.block_number)
            .collect();
        assert_eq!(blocks, vec![105, 102, 100]);
    }

    #[test]
    fn test_equal_blocks_keep_file_order() {
        let file = write_log(&[&event_line(9, "0xFirst"), &event_line(9, "0xSecond")]);
        let events = read_events(file.path()).unwrap();
        assert_eq!(events[0].bot_address, "0xFirst");
        assert_eq!(events[1].bot_address, "0xSecond");
    }

    #[test]
    fn test_skip_reasons_are_counted() {
        let file = write_log(&[
            &event_line(1, "0xA"),
            "",
            "   ",
            "not json",
            r#"{"block_number":2,"bot_address":"0xA""#,
            "42",
            r#"{"block_number":3}"#,
            r#"{"block_number":-4,"bot_address":"0xA","victim_address":"0xV","tx_front":"0xT"}"#,
            &event_line(5, "0xB"),
        ]);

        let report = EventLogReader::new(file.path()).read().unwrap();
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.lines, 9);
        assert_eq!(
            report.skipped,
            SkipCounts {
                blank: 2,
                malformed: 2,
                invalid_record: 3,
            }
        );
        assert_eq!(report.skipped.total(), 7);
    }

    #[test]
    fn test_torn_final_line_is_skipped() {
        let mut file = write_log(&[&event_line(10, "0xA")]);
        write!(file, r#"{{"block_number":11,"bot_addr"#).unwrap();
        file.flush().unwrap();

        let report = EventLogReader::new(file.path()).read().unwrap();
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.skipped.malformed, 1);
    }

    #[test]
    fn test_crlf_and_invalid_utf8_lines() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(event_line(1, "0xA").as_bytes()).unwrap();
        file.write_all(b"\r\n\xff\xfe garbage\n").unwrap();
        file.flush().unwrap();

        let report = EventLogReader::new(file.path()).read().unwrap();
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.skipped.malformed, 1);
    }

    #[test]
    fn test_non_string_optional_fields_still_parse() {
        let file = write_log(&[
            r#"{"block_number":101,"bot_address":"0xA","victim_address":"0xV","tx_front":"0xT","tx_victim":7}"#,
            r#"{"block_number":102,"bot_address":"0xB","victim_address":"0xV","tx_front":"0xT","tx_back":{"hash":"0xB"}}"#,
            r#"{"block_number":103,"bot_address":"0xC","victim_address":"0xV","tx_front":"0xT","tx_victim":null}"#,
        ]);

        let report = EventLogReader::new(file.path()).read().unwrap();
        assert_eq!(report.events.len(), 3);
        assert_eq!(report.skipped.total(), 0);
        assert_eq!(report.events[2].extra["tx_victim"], 7);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let line = event_line(7, "0xA");
        let file = write_log(&[&line, &line]);
        assert_eq!(read_events(file.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EventLogReader::new(dir.path()).read().unwrap_err();
        assert!(matches!(err, EventLogError::Io { .. }));
    }

    #[test]
    fn test_parse_line_outcomes() {
        assert_eq!(parse_line(b""), LineOutcome::Skipped(SkipReason::Blank));
        assert_eq!(parse_line(b"{"), LineOutcome::Skipped(SkipReason::Malformed));
        assert_eq!(
            parse_line(b"[1,2]"),
            LineOutcome::Skipped(SkipReason::InvalidRecord)
        );
        assert!(matches!(
            parse_line(event_line(3, "0xA").as_bytes()),
            LineOutcome::Parsed(event) if event.block_number == 3
        ));
    }
}
