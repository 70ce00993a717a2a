use agmerge_types::{Record, RecordKind};

/// Records of one fragment, partitioned by role
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionData {
    pub session_start: Option<Record>,
    pub session_end: Option<Record>,
    pub session_summary: Option<Record>,
    /// `user`, `assistant` and `assistant_thinking` records in file order
    pub messages: Vec<Record>,
    /// Everything else, in file order
    pub other_events: Vec<Record>,
}

/// Classify a fragment's records in a single pass.
///
/// Lifecycle slots keep the last occurrence when a type repeats.
pub fn extract_session_data<I>(records: I) -> SessionData
where
    I: IntoIterator<Item = Record>,
{
    let mut data = SessionData::default();

    for record in records {
        match record.kind() {
            RecordKind::SessionStart => data.session_start = Some(record),
            RecordKind::SessionEnd => data.session_end = Some(record),
            RecordKind::SessionSummary => data.session_summary = Some(record),
            kind if kind.is_message() => data.messages.push(record),
            _ => data.other_events.push(record),
        }
    }

    data
}
