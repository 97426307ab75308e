//! Literal parsing for `%set` values.

use serde_json::Value;

/// Parse a command argument into a value.
///
/// JSON literals (numbers, strings, lists, mappings, `true`, `false`,
/// `null`) and the Python spellings `True`, `False`, `None` are
/// recognised; anything else is kept as the raw string.
pub fn parse_literal(raw: &str) -> Value {
    let trimmed = raw.trim();
    match trimmed {
        "True" => return Value::Bool(true),
        "False" => return Value::Bool(false),
        "None" => return Value::Null,
        _ => {}
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

/// Truthiness of a value: null, false, zero, and empty strings, lists,
/// and mappings are false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
