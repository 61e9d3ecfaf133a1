//! Helpers for reading opaque JSON block state

use serde_json::Value;

/// String form of a state value: strings as-is, scalars via `to_string`,
/// null as empty, arrays and objects as compact JSON
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Selected value of a choice field. Select widgets report their selection
/// as an array; a bare scalar is taken as the selection itself.
pub fn selected_choice(state: &Value) -> Option<String> {
    let selected = match state {
        Value::Array(items) => display_string(items.first()?),
        other => display_string(other),
    };
    (!selected.is_empty()).then_some(selected)
}
