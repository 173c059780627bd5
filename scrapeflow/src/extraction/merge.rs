//! Completeness-preferring merge of JSON values.
//!
//! Merging is key-by-key for objects and never lets an empty value replace a
//! non-empty one. It is not commutative: strings and mismatched types depend
//! on the order values arrive in.

use serde_json::{Map, Value};

/// Returns true for `null`, `""`, `{}` and `[]`.
#[must_use]
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Merges `incoming` into `existing` and returns the result.
#[must_use]
pub fn smart_merge(existing: Value, incoming: Value) -> Value {
    match (is_empty(&existing), is_empty(&incoming)) {
        (false, true) => return existing,
        (true, false) => return incoming,
        _ => {}
    }

    match (existing, incoming) {
        (Value::Object(base), Value::Object(update)) => Value::Object(merge_objects(base, update)),
        (Value::Array(mut base), Value::Array(update)) => {
            for item in update {
                if !base.contains(&item) {
                    base.push(item);
                }
            }
            Value::Array(base)
        }
        (Value::String(base), Value::String(update)) => {
            if update.chars().count() > base.chars().count() {
                Value::String(update)
            } else {
                Value::String(base)
            }
        }
        (_, incoming) => incoming,
    }
}

/// Merges the keys of `incoming` into `base`.
///
/// Keys new to `base` are appended in the order they appear in `incoming`;
/// keys already present keep their position.
#[must_use]
pub fn merge_objects(mut base: Map<String, Value>, incoming: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in incoming {
        match base.get_mut(&key) {
            Some(slot) => {
                let existing = std::mem::take(slot);
                *slot = smart_merge(existing, value);
            }
            None => {
                base.insert(key, value);
            }
        }
    }
    base
}

/// Folds a sequence of objects left to right with [`merge_objects`].
#[must_use]
pub fn smart_merge_all<I>(objects: I) -> Map<String, Value>
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    objects.into_iter().fold(Map::new(), merge_objects)
}
