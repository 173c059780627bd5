//! Isolation of a JSON object from free-text model replies.

use serde_json::Value;

use super::merge::is_empty;

/// A model reply after sanitation.
#[derive(Debug, Clone, PartialEq)]
pub enum SanitizedReply {
    /// The reply contained a parseable JSON object span.
    Json(Value),
    /// Nothing parseable was found; the trimmed reply text.
    Text(String),
}

impl SanitizedReply {
    /// Returns true when the reply carries nothing worth keeping.
    ///
    /// Text that decodes to `null`, `""` or `[]` counts as empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Json(value) => is_empty(value),
            Self::Text(text) => self.decode().map_or(text.is_empty(), |value| is_empty(&value)),
        }
    }

    /// Returns the parsed value, if any.
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Decodes the reply as JSON.
    ///
    /// Text replies are parsed whole, so a bare array or scalar reply still
    /// decodes; prose does not.
    #[must_use]
    pub fn decode(&self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value.clone()),
            Self::Text(text) => serde_json::from_str(text).ok(),
        }
    }

    /// Converts into a JSON value, keeping undecodable text as a string.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(_) => Value::String(text),
            },
        }
    }
}

/// Strips code fences and parses the span between the first `{` and the
/// last `}`.
///
/// Never fails: when no span parses the trimmed, fence-free text is returned
/// as [`SanitizedReply::Text`].
#[must_use]
pub fn clean_json_response(reply: &str) -> SanitizedReply {
    let unfenced = reply.replace("```json", "").replace("```", "");
    let text = unfenced.trim();

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&text[start..=end]) {
                return SanitizedReply::Json(value);
            }
        }
    }
    SanitizedReply::Text(text.to_string())
}
