//! Server response types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Result of classifying a submission response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// No error markers; the server accepted the data
    Accepted,
    /// The server re-rendered the form with errors
    Rejected,
}

/// `{pk, name}` returned when an object is created through add-another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedObject {
    #[serde(deserialize_with = "string_or_number")]
    pub pk: String,
    pub name: String,
}

/// `{result, message}` returned by delete and custom action endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub result: bool,
    #[serde(default)]
    pub message: String,
}

/// What a submit attempt ended in
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Form came back with errors; the dialog now holds content `generation`
    /// and a fresh form is armed
    Rerendered { generation: u64 },
    /// Dialog hidden, completion run. `payload` is `None` when the body was
    /// not a JSON document.
    Accepted { payload: Option<Value> },
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Primary keys arrive as JSON numbers from most servers; select option
/// values are strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for pk, got {other}"
        ))),
    }
}
