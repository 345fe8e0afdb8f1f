//! FILENAME: engine/src/filter.rs
//! PURPOSE: Client-side filter engine over an already-fetched page.
//! CONTEXT: Evaluates each record against the search term and the active
//! filter set. Criteria are purely conjunctive; evaluation short-circuits
//! on the first failing criterion. An empty filter value makes that filter
//! inert. The semantics intentionally mirror what a user would expect from
//! the equivalent server-side query.

use crate::config::{FilterConfig, FilterType, Record, ValueMap};
use crate::value::{
    coerce_number, is_empty_value, normalize_boolean, parse_record_date, value_to_string,
};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde_json::Value;

// ============================================================================
// SEARCH
// ============================================================================

/// Case-insensitive substring search over the configured keys, or over
/// every key when none are configured. An empty term always passes.
pub fn matches_search(record: &Record, term: &str, search_keys: &[String]) -> bool {
    if term.is_empty() {
        return true;
    }
    let query = term.to_lowercase();
    let candidate = |value: &Value| -> bool {
        if value.is_null() {
            return false;
        }
        value_to_string(value).to_lowercase().contains(&query)
    };
    if search_keys.is_empty() {
        record.values().any(candidate)
    } else {
        search_keys
            .iter()
            .any(|key| record.get(key).map(candidate).unwrap_or(false))
    }
}

// ============================================================================
// FILTERS
// ============================================================================

/// Evaluates every configured filter conjunctively against one record.
pub fn record_matches(record: &Record, filters: &[FilterConfig], values: &ValueMap) -> bool {
    filters
        .iter()
        .all(|filter| matches_filter(record, filter, values))
}

fn matches_filter(record: &Record, filter: &FilterConfig, values: &ValueMap) -> bool {
    if filter.filter_type == FilterType::DateRange {
        return matches_date_range(record, filter, values);
    }

    let filter_value = match values.get(&filter.key) {
        Some(value) if !is_empty_value(value) => value,
        // Nothing entered: the filter is inert.
        _ => return true,
    };
    let record_value = record.get(&filter.key).unwrap_or(&Value::Null);

    match filter.filter_type {
        FilterType::Boolean => {
            match (normalize_boolean(record_value), normalize_boolean(filter_value)) {
                (Some(record_bool), Some(filter_bool)) => record_bool == filter_bool,
                // Either side unknown: fall back to raw string equality.
                _ => value_to_string(record_value) == value_to_string(filter_value),
            }
        }
        FilterType::Number => match (coerce_number(record_value), coerce_number(filter_value)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        FilterType::Text => value_to_string(record_value)
            .to_lowercase()
            .contains(&value_to_string(filter_value).to_lowercase()),
        // Select and Lookup are exact string matches.
        _ => value_to_string(record_value) == value_to_string(filter_value),
    }
}

/// Date-range filters read two companion values keyed `<key>From` and
/// `<key>To`. Bounds are inclusive: local midnight through 23:59:59.999.
/// The filter is inert only when both companion values are empty; once
/// either is entered, a record whose value fails to parse as a date is
/// excluded, even while the entered bound itself is still unparsable
/// (an unparsable bound constrains nothing else).
fn matches_date_range(record: &Record, filter: &FilterConfig, values: &ValueMap) -> bool {
    let from_raw = values
        .get(&format!("{}From", filter.key))
        .filter(|v| !is_empty_value(v));
    let to_raw = values
        .get(&format!("{}To", filter.key))
        .filter(|v| !is_empty_value(v));
    if from_raw.is_none() && to_raw.is_none() {
        return true;
    }

    let record_date = match record
        .get(&filter.key)
        .and_then(|value| parse_record_date(value))
    {
        Some(date) => date,
        None => return false,
    };
    if let Some(from) = from_raw.and_then(|v| parse_bound(v, false)) {
        if record_date < from {
            return false;
        }
    }
    if let Some(to) = to_raw.and_then(|v| parse_bound(v, true)) {
        if record_date > to {
            return false;
        }
    }
    true
}

fn parse_bound(value: &Value, is_end: bool) -> Option<DateTime<Local>> {
    let text = match value {
        Value::String(s) if !s.trim().is_empty() => s.trim(),
        _ => return None,
    };
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    let naive = if is_end {
        date.and_hms_milli_opt(23, 59, 59, 999)?
    } else {
        date.and_hms_opt(0, 0, 0)?
    };
    Local.from_local_datetime(&naive).earliest()
}

// ============================================================================
// COMBINED PASS
// ============================================================================

/// Applies search and filters to the fetched page, preserving fetch order.
pub fn filter_records(
    records: &[Record],
    term: &str,
    search_keys: &[String],
    filters: &[FilterConfig],
    values: &ValueMap,
) -> Vec<Record> {
    records
        .iter()
        .filter(|record| matches_search(record, term, search_keys))
        .filter(|record| record_matches(record, filters, values))
        .cloned()
        .collect()
}
