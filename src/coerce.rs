//! Loose numeric coercion for backend payloads.
//!
//! Flow backends are treated as untrusted and loosely typed: numbers may arrive
//! as JSON numbers, numeric strings, booleans or `null`. Nothing here fails;
//! anything that does not yield a finite number falls back to a caller default.

use serde_json::{Map, Value};

/// Coerce a JSON value to a finite `f64`, or `default`.
///
/// | Input | Result |
/// |-------|--------|
/// | number | the number |
/// | string | trimmed and parsed; empty string is `0` |
/// | `true` / `false` | `1` / `0` |
/// | `null` | `0` |
/// | array, object, unparsable or non-finite | `default` |
pub fn to_number(value: &Value, default: f64) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(_) | Value::Object(_) => None,
    };

    number.filter(|n| n.is_finite()).unwrap_or(default)
}

/// Like [`to_number`], treating an absent value as `default`.
pub fn to_number_or(value: Option<&Value>, default: f64) -> f64 {
    value.map_or(default, |v| to_number(v, default))
}

/// Return the first field in `names` that is present and not `null`.
///
/// The order of `names` is the priority order. A present but malformed value
/// still wins over later fields; coercion happens afterwards.
pub fn probe<'a>(fields: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| fields.get(*name))
        .find(|value| !value.is_null())
}
