//! FILENAME: export/src/summary.rs
//! PURPOSE: Aggregations over the exported record set.
//! CONTEXT: Feeds the printable document templates: income/expense totals
//! bucketed by calendar period, and count/sum rollups grouped by one
//! dimension key. Records with an unusable date or amount are skipped
//! per-aggregate rather than failing the export.

use chrono::{DateTime, Local};
use engine::value::{coerce_number, display_value, parse_record_date, value_to_string};
use engine::Record;
use serde_json::Value;
use std::collections::BTreeMap;

/// Calendar bucket for time-series rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Month,
    Year,
}

impl Period {
    fn bucket(&self, date: &DateTime<Local>) -> String {
        match self {
            Period::Day => date.format("%Y-%m-%d").to_string(),
            Period::Month => date.format("%Y-%m").to_string(),
            Period::Year => date.format("%Y").to_string(),
        }
    }
}

/// Income/expense totals for one calendar bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTotals {
    pub key: String,
    pub income: f64,
    pub expense: f64,
    /// Records that contributed a usable amount to this bucket.
    pub count: usize,
}

impl PeriodTotals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Buckets records by the calendar period of `date_key` and totals the
/// `amount_key` per `type_key` ("income" vs "expense"). A row whose date
/// or amount fails to parse is excluded from this aggregate entirely,
/// totals and count alike; it still appears in the plain row table.
pub fn period_totals(
    records: &[Record],
    date_key: &str,
    type_key: &str,
    amount_key: &str,
    period: Period,
) -> Vec<PeriodTotals> {
    let mut buckets: BTreeMap<String, PeriodTotals> = BTreeMap::new();
    for record in records {
        let date = match record.get(date_key).and_then(parse_record_date) {
            Some(date) => date,
            None => {
                log::debug!("skipping record without a usable {}", date_key);
                continue;
            }
        };
        let amount = match record.get(amount_key).and_then(coerce_number) {
            Some(amount) => amount,
            None => {
                log::debug!("skipping record without a usable {}", amount_key);
                continue;
            }
        };

        let key = period.bucket(&date);
        let entry = buckets.entry(key.clone()).or_insert(PeriodTotals {
            key,
            income: 0.0,
            expense: 0.0,
            count: 0,
        });
        entry.count += 1;
        match record.get(type_key).map(value_to_string).as_deref() {
            Some("income") => entry.income += amount,
            Some("expense") => entry.expense += amount,
            _ => {}
        }
    }
    buckets.into_values().collect()
}

/// Buckets records by calendar period and counts them, with no amount
/// semantics. Used for collections that have a date but no money.
pub fn period_counts(records: &[Record], date_key: &str, period: Period) -> Vec<(String, usize)> {
    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.get(date_key).and_then(parse_record_date) {
            *buckets.entry(period.bucket(&date)).or_insert(0) += 1;
        }
    }
    buckets.into_iter().collect()
}

/// Count and optional amount total for one value of a dimension key.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionTotals {
    pub key: String,
    pub count: usize,
    pub total: f64,
}

/// Groups records by the display value of `dim_key`, counting rows and
/// (when `amount_key` is given) summing usable amounts. Buckets come back
/// ordered by key.
pub fn dimension_totals(
    records: &[Record],
    dim_key: &str,
    amount_key: Option<&str>,
) -> Vec<DimensionTotals> {
    let mut buckets: BTreeMap<String, DimensionTotals> = BTreeMap::new();
    for record in records {
        let key = display_value(record.get(dim_key).unwrap_or(&Value::Null));
        let entry = buckets.entry(key.clone()).or_insert(DimensionTotals {
            key,
            count: 0,
            total: 0.0,
        });
        entry.count += 1;
        if let Some(amount_key) = amount_key {
            if let Some(amount) = record.get(amount_key).and_then(coerce_number) {
                entry.total += amount;
            }
        }
    }
    buckets.into_values().collect()
}
