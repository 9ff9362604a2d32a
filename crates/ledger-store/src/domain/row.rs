//! Row Representation
//!
//! A row is a JSON object keyed by column name, exactly what a PostgREST
//! endpoint returns.

use serde_json::{Map, Value};

/// One table row
pub type Row = Map<String, Value>;

/// Render a key-like value (string or number) as the string form used in
/// lookups. Other JSON types are not valid identifiers.
pub fn value_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The row's `id` column as a lookup key
pub fn row_id(row: &Row) -> Option<String> {
    row.get("id").and_then(value_key)
}
