use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::ops::{Add, AddAssign};

/// One numeric `summary_data` field.
///
/// Values are summed exactly as written. A sum stays integral until a
/// fractional contribution (or an `i64` overflow) turns it into a float.
#[derive(Debug, Clone, Copy)]
pub enum Counter {
    Int(i64),
    Float(f64),
}

impl Default for Counter {
    fn default() -> Self {
        Counter::Int(0)
    }
}

impl Counter {
    /// Lenient read: anything that is not a JSON number counts as zero
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => Self::from_number(n),
            _ => Self::default(),
        }
    }

    fn from_number(n: &Number) -> Self {
        if let Some(i) = n.as_i64() {
            Counter::Int(i)
        } else {
            Counter::Float(n.as_f64().unwrap_or(0.0))
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Counter::Int(i) => i as f64,
            Counter::Float(f) => f,
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(self, Counter::Int(_))
    }
}

impl Add for Counter {
    type Output = Counter;

    fn add(self, other: Counter) -> Counter {
        match (self, other) {
            (Counter::Int(a), Counter::Int(b)) => a
                .checked_add(b)
                .map(Counter::Int)
                .unwrap_or(Counter::Float(a as f64 + b as f64)),
            (a, b) => Counter::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl AddAssign for Counter {
    fn add_assign(&mut self, other: Counter) {
        *self = *self + other;
    }
}

impl From<i64> for Counter {
    fn from(value: i64) -> Self {
        Counter::Int(value)
    }
}

impl From<u64> for Counter {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(Counter::Int)
            .unwrap_or(Counter::Float(value as f64))
    }
}

impl From<f64> for Counter {
    fn from(value: f64) -> Self {
        Counter::Float(value)
    }
}

impl PartialEq for Counter {
    fn eq(&self, other: &Counter) -> bool {
        match (self, other) {
            (Counter::Int(a), Counter::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

macro_rules! counter_eq_int {
    ($($ty:ty)*) => {
        $(
            impl PartialEq<$ty> for Counter {
                fn eq(&self, other: &$ty) -> bool {
                    match *self {
                        Counter::Int(i) => i128::from(i) == i128::from(*other),
                        Counter::Float(f) => f == *other as f64,
                    }
                }
            }
        )*
    };
}

counter_eq_int!(i32 i64 u64);

impl PartialEq<f64> for Counter {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == *other
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Counter::Int(i) => write!(f, "{}", i),
            Counter::Float(v) => write!(f, "{}", v),
        }
    }
}

// Whole sums stay integers in the output (`300`, not `300.0`)
impl Serialize for Counter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
        match *self {
            Counter::Int(i) => serializer.serialize_i64(i),
            Counter::Float(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT => {
                serializer.serialize_i64(f as i64)
            }
            Counter::Float(f) => serializer.serialize_f64(f),
        }
    }
}

impl<'de> Deserialize<'de> for Counter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Counter::from_json(Some(&value)))
    }
}

/// Token usage counters nested under `summary_data.usage_totals`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageTotals {
    pub total_input_tokens: Counter,
    pub total_output_tokens: Counter,
}

/// Statistics carried by a `session_summary` record (`summary_data`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryData {
    pub total_duration_seconds: Counter,
    pub total_messages: Counter,
    pub assistant_messages: Counter,
    pub user_prompts: Counter,
    pub usage_totals: UsageTotals,
}

impl SummaryData {
    /// Read `summary_data` leniently: missing or non-numeric fields count as zero.
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };

        let usage = fields.get("usage_totals").and_then(Value::as_object);

        Self {
            total_duration_seconds: field(fields, "total_duration_seconds"),
            total_messages: field(fields, "total_messages"),
            assistant_messages: field(fields, "assistant_messages"),
            user_prompts: field(fields, "user_prompts"),
            usage_totals: UsageTotals {
                total_input_tokens: usage
                    .map_or_else(Counter::default, |u| field(u, "total_input_tokens")),
                total_output_tokens: usage
                    .map_or_else(Counter::default, |u| field(u, "total_output_tokens")),
            },
        }
    }

    /// Add another summary into this one, field by field
    pub fn accumulate(&mut self, other: &SummaryData) {
        self.total_duration_seconds += other.total_duration_seconds;
        self.total_messages += other.total_messages;
        self.assistant_messages += other.assistant_messages;
        self.user_prompts += other.user_prompts;
        self.usage_totals.total_input_tokens += other.usage_totals.total_input_tokens;
        self.usage_totals.total_output_tokens += other.usage_totals.total_output_tokens;
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

fn field(fields: &Map<String, Value>, key: &str) -> Counter {
    Counter::from_json(fields.get(key))
}
