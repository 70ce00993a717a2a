use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::kind::RecordKind;
use crate::timestamp::parse_timestamp;
use crate::{Error, Result};

pub const SESSION_ID_FIELD: &str = "session_id";

// NOTE: Records are kept as untyped JSON objects.
// Only `type`, `timestamp` and `session_id` are interpreted; every other field
// passes through untouched, in its original order, when the record is written back.

/// One line of a session log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Decode one JSONL line. Anything other than a JSON object is rejected.
    pub fn parse_line(line: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(line)? {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(Error::NotAnObject(json_kind(&other))),
        }
    }

    /// Build a lifecycle marker (`session_start` / `session_end`)
    pub fn marker(kind: RecordKind, timestamp: &str, session_id: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("type".to_string(), Value::from(kind.as_str()));
        fields.insert("timestamp".to_string(), Value::from(timestamp));
        fields.insert(SESSION_ID_FIELD.to_string(), Value::from(session_id));
        Self(fields)
    }

    pub fn kind(&self) -> RecordKind {
        RecordKind::from_type(self.type_name())
    }

    pub fn type_name(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.0.get("timestamp").and_then(Value::as_str)
    }

    /// Sort key: missing or unparseable timestamps map to the earliest instant
    pub fn instant(&self) -> DateTime<Utc> {
        parse_timestamp(self.timestamp().unwrap_or_default())
    }

    pub fn session_id(&self) -> Option<&str> {
        self.0.get(SESSION_ID_FIELD).and_then(Value::as_str)
    }

    /// Copy of this record re-attributed to another session.
    /// An existing `session_id` keeps its position; otherwise the field is appended.
    pub fn with_session_id(&self, session_id: &str) -> Self {
        let mut fields = self.0.clone();
        fields.insert(SESSION_ID_FIELD.to_string(), Value::from(session_id));
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Compact single-line JSON, without the trailing newline
    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
