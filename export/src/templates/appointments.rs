//! FILENAME: export/src/templates/appointments.rs

use crate::document::{document_shell, kpi_row, section, table, DocumentTemplate};
use crate::summary::{dimension_totals, period_counts, Period};
use engine::value::value_to_string;
use engine::{EntitySchema, Record};

/// Schedule layout: status and branch breakdowns plus a per-day load
/// table, with a cancellation rate up top.
pub struct AppointmentsTemplate;

impl DocumentTemplate for AppointmentsTemplate {
    fn build_document(&self, schema: &EntitySchema, records: &[Record]) -> String {
        let total = records.len();
        let cancelled = records
            .iter()
            .filter(|r| {
                r.get("status")
                    .map(|v| value_to_string(v) == "cancelled")
                    .unwrap_or(false)
            })
            .count();
        let rate = if total > 0 {
            format!("{:.0}%", cancelled as f64 * 100.0 / total as f64)
        } else {
            "0%".to_string()
        };

        let mut body = kpi_row(&[
            ("Appointments".to_string(), total.to_string()),
            ("Cancelled".to_string(), cancelled.to_string()),
            ("Cancellation rate".to_string(), rate),
        ]);

        for (title, key) in [("By status", "status"), ("By branch", "branchId")] {
            let rows: Vec<Vec<String>> = dimension_totals(records, key, None)
                .iter()
                .map(|d| vec![d.key.clone(), d.count.to_string()])
                .collect();
            body.push_str(&section(title, &table(&["Value", "Count"], &rows)));
        }

        let days: Vec<Vec<String>> = period_counts(records, "startAt", Period::Day)
            .into_iter()
            .map(|(day, count)| vec![day, count.to_string()])
            .collect();
        body.push_str(&section("Per day", &table(&["Day", "Appointments"], &days)));

        body.push_str(&section("Records", &self.build_table(schema, records)));
        document_shell(&schema.title, &body)
    }
}
