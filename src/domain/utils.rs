//! Shared helpers for reading loosely-typed JSON-RPC inputs

use serde_json::Value;

/// Returns the value only when it counts as supplied: absent, `null`, `false`,
/// `0` and the empty string all read as "not given".
pub fn truthy(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Renders a value as plain text: strings without quotes, anything else as JSON.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
