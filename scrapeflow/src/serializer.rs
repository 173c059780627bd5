//! JSON text output with stable key order and fixed indentation.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

/// Serializes extraction results.
///
/// Keys keep insertion order, so serializing a parsed copy of the output
/// reproduces the output exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultSerializer {
    indent: usize,
}

impl Default for ResultSerializer {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl ResultSerializer {
    /// Creates a serializer with the given indent width.
    #[must_use]
    pub fn with_indent(indent: usize) -> Self {
        Self { indent }
    }

    /// Serializes `value` as indented JSON text.
    #[must_use]
    pub fn serialize(&self, value: &Value) -> String {
        let indent = " ".repeat(self.indent);
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
        if value.serialize(&mut ser).is_err() {
            return value.to_string();
        }
        String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
    }

    /// Re-serializes JSON text; anything that is not JSON becomes a JSON string.
    #[must_use]
    pub fn serialize_text(&self, text: &str) -> String {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => self.serialize(&value),
            Err(_) => self.serialize(&Value::String(text.to_string())),
        }
    }

    /// The canonical output when nothing was extracted.
    #[must_use]
    pub fn empty_object(&self) -> String {
        "{}".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_serialize_indents_two_spaces() {
        let text = ResultSerializer::default().serialize(&json!({"a": 1, "b": [true]}));
        assert_eq!(text, "{\n  \"a\": 1,\n  \"b\": [\n    true\n  ]\n}");
    }

    #[test]
    fn test_serialize_keeps_insertion_order() {
        let value: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let text = ResultSerializer::default().serialize(&value);

        let zeta = text.find("zeta").unwrap();
        let alpha = text.find("alpha").unwrap();
        let mid = text.find("mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_empty_object_is_canonical() {
        let serializer = ResultSerializer::default();
        assert_eq!(serializer.serialize(&json!({})), serializer.empty_object());
    }

    #[test]
    fn test_round_trip_is_stable() {
        let serializer = ResultSerializer::default();
        let values = [
            json!(null),
            json!("text with \"quotes\" and ünïcode"),
            json!(1.5),
            json!([1, [2, [3]], {}]),
            json!({"b": {"y": [], "x": null}, "a": -7, "c": 1e100}),
        ];
        for value in values {
            let once = serializer.serialize(&value);
            let reparsed: Value = serde_json::from_str(&once).unwrap();
            assert_eq!(serializer.serialize(&reparsed), once);
            assert_eq!(serializer.serialize_text(&once), once);
        }
    }

    #[test]
    fn test_serialize_text_wraps_prose() {
        let serializer = ResultSerializer::default();
        assert_eq!(serializer.serialize_text("no data here"), "\"no data here\"");
        assert_eq!(serializer.serialize_text("{\"a\":1}"), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_custom_indent() {
        let text = ResultSerializer::with_indent(4).serialize(&json!({"a": 1}));
        assert_eq!(text, "{\n    \"a\": 1\n}");
    }
}
