//! Fragment file construction.
//!
//! Builds `session_<id>.jsonl` fragments line by line, the way the logging
//! environment writes them, so tests can describe interrupted sessions
//! declaratively.

use agmerge_types::SummaryData;
use anyhow::Result;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Builder for one fragment file.
///
/// # Example
/// ```
/// use agmerge_testing::FragmentBuilder;
///
/// let fragment = FragmentBuilder::new("abc")
///     .start("2025-01-01T10:00:00Z")
///     .user("2025-01-01T10:00:01Z", "hello")
///     .assistant("2025-01-01T10:00:02Z", "hi")
///     .end("2025-01-01T10:00:03Z");
///
/// assert_eq!(fragment.message_count(), 2);
/// assert_eq!(fragment.to_jsonl().lines().count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct FragmentBuilder {
    session_id: String,
    lines: Vec<String>,
    messages: usize,
}

impl FragmentBuilder {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            lines: Vec::new(),
            messages: 0,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Number of `user` / `assistant` / `assistant_thinking` lines added so far
    pub fn message_count(&self) -> usize {
        self.messages
    }

    pub fn file_name(&self) -> String {
        format!("session_{}.jsonl", self.session_id)
    }

    pub fn raw_file_name(&self) -> String {
        format!("session_{}_raw.jsonl", self.session_id)
    }

    pub fn start(self, timestamp: &str) -> Self {
        let line = json!({
            "type": "session_start",
            "timestamp": timestamp,
            "session_id": self.session_id,
        });
        self.push(line)
    }

    pub fn end(self, timestamp: &str) -> Self {
        let line = json!({
            "type": "session_end",
            "timestamp": timestamp,
            "session_id": self.session_id,
        });
        self.push(line)
    }

    pub fn user(self, timestamp: &str, content: &str) -> Self {
        self.message("user", Some(timestamp), content)
    }

    pub fn assistant(self, timestamp: &str, content: &str) -> Self {
        self.message("assistant", Some(timestamp), content)
    }

    pub fn thinking(self, timestamp: &str, content: &str) -> Self {
        self.message("assistant_thinking", Some(timestamp), content)
    }

    /// A message line; `timestamp: None` omits the field entirely
    pub fn message(mut self, kind: &str, timestamp: Option<&str>, content: &str) -> Self {
        let mut line = json!({
            "type": kind,
            "session_id": self.session_id,
            "content": content,
        });
        if let Some(ts) = timestamp {
            line["timestamp"] = Value::from(ts);
        }
        self.messages += 1;
        self.push(line)
    }

    /// A record of a type the merge does not classify (tool calls, snapshots, ...)
    pub fn event(self, kind: &str, timestamp: &str) -> Self {
        let line = json!({
            "type": kind,
            "timestamp": timestamp,
            "session_id": self.session_id,
        });
        self.push(line)
    }

    pub fn summary(self, timestamp: &str, data: &SummaryData) -> Self {
        self.summary_value(timestamp, data.to_value())
    }

    /// Summary with an arbitrary (possibly partial) `summary_data` object
    pub fn summary_value(self, timestamp: &str, summary_data: Value) -> Self {
        let line = json!({
            "type": "session_summary",
            "timestamp": timestamp,
            "session_id": self.session_id,
            "summary_data": summary_data,
        });
        self.push(line)
    }

    /// Append a line verbatim (for malformed-input tests)
    pub fn raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn to_jsonl(&self) -> String {
        let mut content = self.lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        content
    }

    /// Write `session_<id>.jsonl` into `dir`
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        fs::write(&path, self.to_jsonl())?;
        Ok(path)
    }

    /// Write a `session_<id>_raw.jsonl` companion with the same content
    pub fn write_raw_companion(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.raw_file_name());
        fs::write(&path, self.to_jsonl())?;
        Ok(path)
    }

    fn push(mut self, line: Value) -> Self {
        self.lines.push(line.to_string());
        self
    }
}

/// Summary data with only token totals set
pub fn token_summary(input: u64, output: u64) -> SummaryData {
    let mut data = SummaryData::default();
    data.usage_totals.total_input_tokens = input.into();
    data.usage_totals.total_output_tokens = output.into();
    data
}
