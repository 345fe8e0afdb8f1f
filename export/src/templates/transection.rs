//! FILENAME: export/src/templates/transection.rs

use crate::document::{document_shell, kpi_row, section, table, DocumentTemplate};
use crate::summary::{dimension_totals, period_totals, Period};
use crate::templates::{format_amount, period_table};
use engine::{EntitySchema, Record};

/// Financial layout for the transaction ledger: income/expense totals by
/// day, month and year, plus status and currency breakdowns.
pub struct TransectionTemplate;

const DATE_KEY: &str = "occurredAt";
const TYPE_KEY: &str = "type";
const AMOUNT_KEY: &str = "amount";

impl DocumentTemplate for TransectionTemplate {
    fn build_document(&self, schema: &EntitySchema, records: &[Record]) -> String {
        let yearly = period_totals(records, DATE_KEY, TYPE_KEY, AMOUNT_KEY, Period::Year);
        let income: f64 = yearly.iter().map(|t| t.income).sum();
        let expense: f64 = yearly.iter().map(|t| t.expense).sum();

        let mut body = kpi_row(&[
            ("Records".to_string(), records.len().to_string()),
            ("Total income".to_string(), format_amount(income)),
            ("Total expense".to_string(), format_amount(expense)),
            ("Net".to_string(), format_amount(income - expense)),
        ]);

        let daily = period_totals(records, DATE_KEY, TYPE_KEY, AMOUNT_KEY, Period::Day);
        let monthly = period_totals(records, DATE_KEY, TYPE_KEY, AMOUNT_KEY, Period::Month);
        body.push_str(&section("Daily summary", &period_table(&daily)));
        body.push_str(&section("Monthly summary", &period_table(&monthly)));
        body.push_str(&section("Yearly summary", &period_table(&yearly)));

        for (title, key) in [("By status", "status"), ("By type", TYPE_KEY)] {
            let rows: Vec<Vec<String>> = dimension_totals(records, key, Some(AMOUNT_KEY))
                .iter()
                .map(|d| vec![d.key.clone(), d.count.to_string(), format_amount(d.total)])
                .collect();
            body.push_str(&section(title, &table(&["Value", "Count", "Amount"], &rows)));
        }

        body.push_str(&section("Records", &self.build_table(schema, records)));
        document_shell(&schema.title, &body)
    }
}
