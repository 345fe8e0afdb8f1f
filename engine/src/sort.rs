//! FILENAME: engine/src/sort.rs
//! PURPOSE: Stable ordering of the filtered record set.
//! CONTEXT: One configured sort key and direction. Comparison tries
//! numbers, then dates, then case-sensitive strings. Null or absent values
//! always sort to the end regardless of direction, and equal keys keep
//! their fetch order (stable sort).

use crate::config::{Record, SortOrder};
use crate::value::{coerce_number, parse_record_date, value_to_string};
use serde_json::Value;
use std::cmp::Ordering;

/// Sorts records in place by `sort_key`. Stable with respect to equal keys.
pub fn sort_records(records: &mut [Record], sort_key: &str, order: SortOrder) {
    if sort_key.is_empty() {
        return;
    }
    records.sort_by(|a, b| compare_records(a, b, sort_key, order));
}

fn compare_records(a: &Record, b: &Record, key: &str, order: SortOrder) -> Ordering {
    let a_value = present(a.get(key));
    let b_value = present(b.get(key));
    match (a_value, b_value) {
        (None, None) => Ordering::Equal,
        // A value present always precedes one absent, in both directions.
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a_value), Some(b_value)) => {
            let base = compare_values(a_value, b_value);
            match order {
                SortOrder::Asc => base,
                SortOrder::Desc => base.reverse(),
            }
        }
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let (Some(a_num), Some(b_num)) = (coerce_number(a), coerce_number(b)) {
        return a_num.partial_cmp(&b_num).unwrap_or(Ordering::Equal);
    }
    if let (Some(a_date), Some(b_date)) = (parse_record_date(a), parse_record_date(b)) {
        return a_date.cmp(&b_date);
    }
    value_to_string(a).cmp(&value_to_string(b))
}
