use std::fmt;

/// Record discriminator, read from the top-level `type` field.
///
/// Anything that is not one of the known lifecycle or message types
/// (including a missing or non-string `type`) is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    SessionStart,
    SessionEnd,
    SessionSummary,
    User,
    Assistant,
    AssistantThinking,
    Other,
}

impl RecordKind {
    pub fn from_type(value: Option<&str>) -> Self {
        match value {
            Some("session_start") => RecordKind::SessionStart,
            Some("session_end") => RecordKind::SessionEnd,
            Some("session_summary") => RecordKind::SessionSummary,
            Some("user") => RecordKind::User,
            Some("assistant") => RecordKind::Assistant,
            Some("assistant_thinking") => RecordKind::AssistantThinking,
            _ => RecordKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::SessionStart => "session_start",
            RecordKind::SessionEnd => "session_end",
            RecordKind::SessionSummary => "session_summary",
            RecordKind::User => "user",
            RecordKind::Assistant => "assistant",
            RecordKind::AssistantThinking => "assistant_thinking",
            RecordKind::Other => "other",
        }
    }

    /// Conversation messages are the only records carried across fragments
    pub fn is_message(&self) -> bool {
        matches!(
            self,
            RecordKind::User | RecordKind::Assistant | RecordKind::AssistantThinking
        )
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
