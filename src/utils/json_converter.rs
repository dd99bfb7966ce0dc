use serde_json::Value;

/// Flattens a JSON value into one line for tables and labels. Strings lose
/// their quotes, `null` becomes empty, objects render as `key=value` pairs.
pub fn display_json(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(items) => items.iter().map(display_json).collect::<Vec<_>>().join(", "),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, display_json(v)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
