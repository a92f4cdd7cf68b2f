//! Canonical rendering and numeric coercion of document values.
//!
//! The index keys written by the flattener and the equality checks done by
//! the matcher both go through [`render_value`], so a value that was indexed
//! as `a.b=4` is always matched by the query `a.b:4`.

use serde_json::{Number, Value};

/// Render a value as the text used in `path=value` keys and equality matches.
///
/// Strings render verbatim, booleans as `true`/`false`, null as `null`.
/// Integers render in decimal; floats use the shortest representation that
/// round-trips, with integral floats losing their fractional part (`3.0` is `3`).
/// Arrays and objects render as compact JSON; the matcher never compares
/// them for equality and the flattener never emits them.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Number(n) => render_number(n),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn render_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else if let Some(f) = n.as_f64() {
        format!("{}", f)
    } else {
        n.to_string()
    }
}

/// Coerce a value to `f64` for range comparisons.
///
/// Numbers of any width convert directly; strings convert when they parse as
/// a float. Everything else has no numeric reading.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}
