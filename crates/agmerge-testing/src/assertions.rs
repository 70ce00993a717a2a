//! Custom assertions for merged session files.
//!
//! Provides high-level checks that make tests more readable:
//! - Output file structure (start, messages, summary, end)
//! - Message ordering and session stamping
//! - Summary totals lookup

use agmerge_types::{RecordKind, parse_timestamp};
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read a JSONL file into JSON values, failing on any malformed line.
pub fn read_jsonl(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    content
        .lines()
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("{}:{} is not valid JSON", path.display(), i + 1))
        })
        .collect()
}

/// All `session_*.jsonl` files directly inside `dir`, sorted by name.
pub fn session_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let is_session_file = {
            let name = entry.file_name().to_string_lossy();
            name.starts_with("session_") && name.ends_with(".jsonl")
        };
        if entry.file_type().is_file() && is_session_file {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn kind_of(record: &Value) -> RecordKind {
    RecordKind::from_type(record["type"].as_str())
}

/// Message records (`user`, `assistant`, `assistant_thinking`) in file order.
pub fn messages(records: &[Value]) -> Vec<&Value> {
    records
        .iter()
        .filter(|record| kind_of(record).is_message())
        .collect()
}

/// Assert the fixed layout: start, messages, summary, end (then anything else).
pub fn assert_merged_layout(records: &[Value]) -> Result<()> {
    if records.len() < 3 {
        anyhow::bail!("Expected at least 3 records, got {}", records.len());
    }

    if kind_of(&records[0]) != RecordKind::SessionStart {
        anyhow::bail!("First record is not session_start: {}", records[0]);
    }

    let message_count = messages(records).len();
    for (offset, record) in records[1..=message_count].iter().enumerate() {
        if !kind_of(record).is_message() {
            anyhow::bail!("Record {} is not a message: {}", offset + 1, record);
        }
    }

    let summary = records
        .get(message_count + 1)
        .context("Missing session_summary after messages")?;
    if kind_of(summary) != RecordKind::SessionSummary {
        anyhow::bail!("Expected session_summary after messages, got {}", summary);
    }

    let end = records
        .get(message_count + 2)
        .context("Missing session_end after summary")?;
    if kind_of(end) != RecordKind::SessionEnd {
        anyhow::bail!("Expected session_end after summary, got {}", end);
    }

    Ok(())
}

/// Assert messages are non-decreasing by timestamp.
pub fn assert_messages_sorted(records: &[Value]) -> Result<()> {
    let instants: Vec<_> = messages(records)
        .iter()
        .map(|m| parse_timestamp(m["timestamp"].as_str().unwrap_or_default()))
        .collect();

    for (i, pair) in instants.windows(2).enumerate() {
        if pair[0] > pair[1] {
            anyhow::bail!(
                "Messages {} and {} are out of order ({} > {})",
                i,
                i + 1,
                pair[0],
                pair[1]
            );
        }
    }

    Ok(())
}

/// Assert every start/summary/end/message record carries `session_id`.
pub fn assert_all_stamped(records: &[Value], session_id: &str) -> Result<()> {
    for (i, record) in records.iter().enumerate() {
        if kind_of(record) == RecordKind::Other {
            continue;
        }
        let stamped = record["session_id"]
            .as_str()
            .with_context(|| format!("Record {} has no session_id", i))?;
        if stamped != session_id {
            anyhow::bail!(
                "Record {} has session_id {} but expected {}",
                i,
                stamped,
                session_id
            );
        }
    }

    Ok(())
}

/// The `summary_data` object of the (single) summary record.
pub fn summary_data(records: &[Value]) -> Result<&Value> {
    let summaries: Vec<&Value> = records
        .iter()
        .filter(|record| kind_of(record) == RecordKind::SessionSummary)
        .collect();

    if summaries.len() != 1 {
        anyhow::bail!("Expected exactly 1 session_summary, got {}", summaries.len());
    }

    summaries[0]
        .get("summary_data")
        .context("session_summary has no summary_data")
}
