//! Payload flattening for audit rows.
//!
//! Audit rows hold arbitrary request payloads in a single text column, so
//! nested structures are serialized to JSON with calendar dates rewritten
//! to their canonical ISO-8601 form first.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

/// Accepted calendar-date shapes, canonical form first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Rewrite every calendar-date-like string in `value` to `YYYY-MM-DD`.
///
/// Recurses through maps and sequences of arbitrary depth; everything
/// else passes through unchanged. Idempotent: canonical dates map to
/// themselves.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, normalize(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::String(s) => match parse_date_like(&s) {
            Some(date) => Value::String(date.format("%Y-%m-%d").to_string()),
            None => Value::String(s),
        },
        other => other,
    }
}

/// Serialize `payload` into the flat string stored in an audit row.
///
/// Never fails: a payload that cannot be serialized yields a placeholder
/// carrying the reason instead, so the request being described is not
/// disturbed.
pub fn to_log_string<T: Serialize>(payload: &T) -> String {
    match serde_json::to_value(payload) {
        Ok(value) => {
            let normalized = normalize(value);
            serde_json::to_string(&normalized).unwrap_or_else(|e| format!("<unserializable: {e}>"))
        }
        Err(e) => format!("<unserializable: {e}>"),
    }
}

fn parse_date_like(s: &str) -> Option<NaiveDate> {
    if !(8..=10).contains(&s.len()) {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}
