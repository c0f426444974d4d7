//! The client-submitted JSON document.

use serde_json::{Map, Value};

/// A decoded request body: a JSON object with arbitrary values.
pub type Payload = Map<String, Value>;

/// Looks up `key` and returns it only if it holds a JSON string.
///
/// Any other value type is treated the same as a missing key.
pub(crate) fn string_field<'a>(payload: &'a Payload, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}
