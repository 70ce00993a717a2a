use agmerge_types::{Record, RecordKind, SummaryData, format_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter;

use crate::aggregate::aggregate_summaries;
use crate::classify::SessionData;

/// What happens to records that are neither lifecycle markers nor messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherEventsPolicy {
    /// Leave them out of the merged session
    #[default]
    Drop,
    /// Emit them untouched after the end marker, fragment by fragment
    Append,
}

impl fmt::Display for OtherEventsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtherEventsPolicy::Drop => write!(f, "drop"),
            OtherEventsPolicy::Append => write!(f, "append"),
        }
    }
}

/// The single session produced from all fragments
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSession {
    pub session_id: String,
    pub start: Record,
    /// Every fragment's messages, re-stamped and sorted by timestamp
    pub messages: Vec<Record>,
    pub summary: Record,
    pub end: Record,
    /// Carried unclassified records (empty under `OtherEventsPolicy::Drop`)
    pub other_events: Vec<Record>,
    pub totals: SummaryData,
}

impl MergedSession {
    /// Records in output order: start, messages, summary, end, carried events
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        iter::once(&self.start)
            .chain(self.messages.iter())
            .chain(iter::once(&self.summary))
            .chain(iter::once(&self.end))
            .chain(self.other_events.iter())
    }
}

/// Stable sort by parsed timestamp; records with equal (or missing) timestamps
/// keep their relative order.
pub fn sort_messages(messages: &mut [Record]) {
    messages.sort_by_cached_key(Record::instant);
}

/// Fold classified fragments (in discovery order) into one session.
///
/// Fragment attribution of messages is discarded: every message is copied
/// with `session_id` set to `session_id`. Synthesized start, summary and end
/// records carry `merged_at`; only messages keep their original timestamps.
pub fn merge_session_data(
    fragments: &[SessionData],
    session_id: &str,
    merged_at: DateTime<Utc>,
    policy: OtherEventsPolicy,
) -> MergedSession {
    let mut messages: Vec<Record> = fragments
        .iter()
        .flat_map(|fragment| fragment.messages.iter())
        .map(|message| message.with_session_id(session_id))
        .collect();
    sort_messages(&mut messages);

    let totals = aggregate_summaries(
        fragments
            .iter()
            .filter_map(|fragment| fragment.session_summary.as_ref()),
    );

    let timestamp = format_timestamp(merged_at);
    let start = Record::marker(RecordKind::SessionStart, &timestamp, session_id);
    let mut summary = Record::marker(RecordKind::SessionSummary, &timestamp, session_id);
    summary.insert("summary_data", totals.to_value());
    let end = Record::marker(RecordKind::SessionEnd, &timestamp, session_id);

    let other_events = match policy {
        OtherEventsPolicy::Drop => Vec::new(),
        OtherEventsPolicy::Append => fragments
            .iter()
            .flat_map(|fragment| fragment.other_events.iter().cloned())
            .collect(),
    };

    MergedSession {
        session_id: session_id.to_string(),
        start,
        messages,
        summary,
        end,
        other_events,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::extract_session_data;
    use chrono::TimeZone;
    use serde_json::json;

    fn fragment(lines: &[&str]) -> SessionData {
        extract_session_data(lines.iter().map(|line| Record::parse_line(line).unwrap()))
    }

    fn merged_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn texts(records: &[Record]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r.get("text").and_then(|t| t.as_str()).unwrap_or("-"))
            .collect()
    }

    #[test]
    fn test_messages_are_interleaved_by_timestamp() {
        let first = fragment(&[
            r#"{"type":"session_start","timestamp":"2025-01-01T10:00:00Z","session_id":"f1"}"#,
            r#"{"type":"user","timestamp":"2025-01-01T10:00:01Z","session_id":"f1","text":"a"}"#,
            r#"{"type":"assistant","timestamp":"2025-01-01T10:00:05Z","session_id":"f1","text":"c"}"#,
        ]);
        let second = fragment(&[
            r#"{"type":"user","timestamp":"2025-01-01T10:00:03Z","session_id":"f2","text":"b"}"#,
            r#"{"type":"assistant","timestamp":"2025-01-01T12:00:00+01:00","session_id":"f2","text":"d"}"#,
        ]);

        let merged =
            merge_session_data(&[first, second], "merged", merged_at(), OtherEventsPolicy::Drop);

        assert_eq!(texts(&merged.messages), vec!["a", "b", "c", "d"]);
        assert!(
            merged
                .messages
                .iter()
                .all(|m| m.session_id() == Some("merged"))
        );
    }

    #[test]
    fn test_equal_and_missing_timestamps_keep_input_order() {
        let first = fragment(&[
            r#"{"type":"user","timestamp":"2025-01-01T10:00:00Z","text":"a"}"#,
            r#"{"type":"assistant","timestamp":"2025-01-01T10:00:00Z","text":"b"}"#,
            r#"{"type":"assistant_thinking","text":"early1"}"#,
        ]);
        let second = fragment(&[
            r#"{"type":"user","timestamp":"2025-01-01T10:00:00Z","text":"c"}"#,
            r#"{"type":"assistant","timestamp":"garbage","text":"early2"}"#,
        ]);

        let merged =
            merge_session_data(&[first, second], "m", merged_at(), OtherEventsPolicy::Drop);

        assert_eq!(
            texts(&merged.messages),
            vec!["early1", "early2", "a", "b", "c"]
        );
    }

    #[test]
    fn test_synthesized_records() {
        let first = fragment(&[
            r#"{"type":"session_summary","summary_data":{"usage_totals":{"total_input_tokens":100}}}"#,
        ]);
        let second = fragment(&[
            r#"{"type":"session_summary","summary_data":{"usage_totals":{"total_input_tokens":250}}}"#,
        ]);

        let merged = merge_session_data(&[first, second], "m", merged_at(), OtherEventsPolicy::Drop);

        assert_eq!(merged.start.kind(), RecordKind::SessionStart);
        assert_eq!(merged.summary.kind(), RecordKind::SessionSummary);
        assert_eq!(merged.end.kind(), RecordKind::SessionEnd);
        for record in [&merged.start, &merged.summary, &merged.end] {
            assert_eq!(record.session_id(), Some("m"));
            assert_eq!(record.timestamp(), Some("2025-06-01T12:00:00.000000+00:00"));
        }

        assert_eq!(merged.totals.usage_totals.total_input_tokens, 350);
        assert_eq!(
            merged.summary.get("summary_data").unwrap()["usage_totals"]["total_input_tokens"],
            json!(350)
        );
    }

    #[test]
    fn test_fragments_without_summary_or_markers() {
        let bare = fragment(&[r#"{"type":"user","timestamp":"2025-01-01T10:00:00Z"}"#]);

        let merged = merge_session_data(
            &[bare.clone(), bare],
            "m",
            merged_at(),
            OtherEventsPolicy::Drop,
        );

        assert_eq!(merged.messages.len(), 2);
        assert_eq!(merged.totals, SummaryData::default());
    }

    #[test]
    fn test_record_order_and_other_events_policy() {
        let first = fragment(&[
            r#"{"type":"tool_call","name":"x"}"#,
            r#"{"type":"user","timestamp":"2025-01-01T10:00:00Z"}"#,
        ]);
        let second = fragment(&[r#"{"type":"file_snapshot","name":"y"}"#]);
        let fragments = [first, second];

        let dropped = merge_session_data(&fragments, "m", merged_at(), OtherEventsPolicy::Drop);
        let kinds: Vec<RecordKind> = dropped.records().map(Record::kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecordKind::SessionStart,
                RecordKind::User,
                RecordKind::SessionSummary,
                RecordKind::SessionEnd,
            ]
        );

        let appended = merge_session_data(&fragments, "m", merged_at(), OtherEventsPolicy::Append);
        let types: Vec<Option<&str>> = appended.records().map(Record::type_name).collect();
        assert_eq!(
            types,
            vec![
                Some("session_start"),
                Some("user"),
                Some("session_summary"),
                Some("session_end"),
                Some("tool_call"),
                Some("file_snapshot"),
            ]
        );
        assert!(appended.other_events.iter().all(|r| r.session_id().is_none()));
    }

    #[test]
    fn test_merge_is_deterministic_apart_from_identity() {
        let fragments = [
            fragment(&[r#"{"type":"user","timestamp":"2025-01-01T10:00:02Z","text":"b"}"#]),
            fragment(&[r#"{"type":"user","timestamp":"2025-01-01T10:00:01Z","text":"a"}"#]),
        ];

        let one = merge_session_data(&fragments, "one", merged_at(), OtherEventsPolicy::Drop);
        let two = merge_session_data(&fragments, "two", merged_at(), OtherEventsPolicy::Drop);

        assert_eq!(texts(&one.messages), texts(&two.messages));
        assert_eq!(one.totals, two.totals);
        assert_ne!(one.session_id, two.session_id);
    }
}
