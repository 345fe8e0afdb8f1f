//! FILENAME: export/src/templates/generic.rs

use crate::document::{document_shell, kpi_row, section, table, DocumentTemplate};
use crate::summary::{dimension_totals, period_totals, Period};
use crate::templates::{format_amount, period_table};
use engine::{EntitySchema, Record};

/// Fallback layout for collections without a dedicated template: the
/// column/row table plus income/expense period summaries and the common
/// dimension rollups, each emitted only when the record set actually
/// carries the keys it needs.
pub struct GenericTemplate;

const DATE_KEYS: &[&str] = &["occurredAt", "date", "createdAt"];

fn probe_date_key(records: &[Record]) -> Option<&'static str> {
    DATE_KEYS
        .iter()
        .find(|key| records.iter().any(|r| r.contains_key(**key)))
        .copied()
}

fn has_key(records: &[Record], key: &str) -> bool {
    records.iter().any(|r| r.contains_key(key))
}

impl DocumentTemplate for GenericTemplate {
    fn build_document(&self, schema: &EntitySchema, records: &[Record]) -> String {
        let mut body = kpi_row(&[("Records".to_string(), records.len().to_string())]);

        if let Some(date_key) = probe_date_key(records) {
            if has_key(records, "amount") {
                for (title, period) in [
                    ("Daily summary", Period::Day),
                    ("Monthly summary", Period::Month),
                    ("Yearly summary", Period::Year),
                ] {
                    let totals = period_totals(records, date_key, "type", "amount", period);
                    body.push_str(&section(title, &period_table(&totals)));
                }
            }
        }

        for (title, key) in [("By payment channel", "paymentChannel"), ("By branch", "branchId")] {
            if !has_key(records, key) {
                continue;
            }
            let rows: Vec<Vec<String>> = dimension_totals(records, key, Some("amount"))
                .iter()
                .map(|d| vec![d.key.clone(), d.count.to_string(), format_amount(d.total)])
                .collect();
            body.push_str(&section(title, &table(&["Value", "Count", "Amount"], &rows)));
        }

        body.push_str(&section("Records", &self.build_table(schema, records)));
        document_shell(&schema.title, &body)
    }
}
