use agmerge_types::{EARLIEST, Record, RecordKind};
use chrono::{DateTime, Utc};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A line that could not be decoded into a record
#[derive(Debug)]
pub struct LineError {
    /// 1-based line number within the file
    pub line_number: usize,
    pub error: agmerge_types::Error,
}

/// Result of reading one fragment: the surviving records plus what was dropped
#[derive(Debug, Default)]
pub struct ParsedLog {
    pub records: Vec<Record>,
    pub dropped: Vec<LineError>,
    /// Set when the whole file could not be read; `records` is then empty
    pub read_error: Option<String>,
}

/// Decode JSONL text. Blank lines are skipped, undecodable lines are collected
/// in `dropped` instead of failing the whole text.
pub fn parse_records(text: &str) -> ParsedLog {
    let mut parsed = ParsedLog::default();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match Record::parse_line(line) {
            Ok(record) => parsed.records.push(record),
            Err(error) => parsed.dropped.push(LineError {
                line_number: index + 1,
                error,
            }),
        }
    }

    parsed
}

/// Read one fragment file, logging every problem as a warning.
///
/// Never fails: an unreadable file yields an empty log so the merge can
/// continue with the remaining fragments.
pub fn read_session_log(path: &Path) -> ParsedLog {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "Error reading session file, treating it as empty"
            );
            return ParsedLog {
                read_error: Some(err.to_string()),
                ..Default::default()
            };
        }
    };

    let parsed = parse_records(&text);
    for dropped in &parsed.dropped {
        tracing::warn!(
            path = %path.display(),
            line = dropped.line_number,
            error = %dropped.error,
            "Skipping malformed line"
        );
    }
    tracing::debug!(
        path = %path.display(),
        records = parsed.records.len(),
        dropped = parsed.dropped.len(),
        "Read session file"
    );

    parsed
}

/// Records of one fragment file (see [`read_session_log`])
pub fn read_session_records(path: &Path) -> Vec<Record> {
    read_session_log(path).records
}

/// Timestamp of the first `session_start` record in a file.
///
/// Reads only as far as that record. Files without one, or that cannot be
/// read, sort first. Blank and malformed lines are skipped rather than ending
/// the scan, so a damaged leading line does not hide a later start record.
pub fn read_start_time(path: &Path) -> DateTime<Utc> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "Cannot open file for start time");
            return EARLIEST;
        }
    };

    for line in BufReader::new(file).lines() {
        let Ok(line) = line else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Ok(record) = Record::parse_line(line)
            && record.kind() == RecordKind::SessionStart
        {
            return record.instant();
        }
    }

    EARLIEST
}
