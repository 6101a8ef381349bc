use serde_json::Value;

/// Render a response payload for the console. Objects become one
/// `key = value` line per field (serde_json keeps object keys sorted);
/// anything else is printed as pretty JSON.
pub fn render(payload: &Value) -> String {
    match payload {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format!("{key} = {}", render_value(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
