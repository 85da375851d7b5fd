//! The `{success, data, error}` wrapper every backend response uses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const ENVELOPE_KEYS: [&str; 3] = ["success", "data", "error"];

/// Response envelope. Every field may be absent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// The `error` member of a failed envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Envelope<Value> {
    /// Interpret an arbitrary JSON document as an envelope.
    ///
    /// Hands the document back unchanged when it is not an object carrying at
    /// least one of the envelope keys; such bodies are bare payloads.
    pub fn from_value(value: Value) -> Result<Self, Value> {
        let mut map = match value {
            Value::Object(map) if ENVELOPE_KEYS.iter().any(|key| map.contains_key(*key)) => map,
            other => return Err(other),
        };
        let success = map.get("success").and_then(Value::as_bool);
        let error = map
            .remove("error")
            .and_then(|raw| serde_json::from_value::<ErrorBody>(raw).ok());
        let data = match map.remove("data") {
            None | Some(Value::Null) => None,
            Some(other) => Some(other),
        };
        Ok(Self {
            success,
            data,
            error,
        })
    }
}

impl<T> Envelope<T> {
    /// True only when `success` is present and false.
    pub fn is_failure(&self) -> bool {
        self.success == Some(false)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.code.as_deref())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.message.as_deref())
    }
}
