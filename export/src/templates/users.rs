//! FILENAME: export/src/templates/users.rs

use crate::document::{document_shell, kpi_row, section, table, DocumentTemplate};
use crate::summary::dimension_totals;
use engine::value::normalize_boolean;
use engine::{EntitySchema, Record};
use serde_json::Value;

/// Account roster: role breakdown plus an active-account count.
pub struct UsersTemplate;

impl DocumentTemplate for UsersTemplate {
    fn build_document(&self, schema: &EntitySchema, records: &[Record]) -> String {
        let active = records
            .iter()
            .filter(|r| {
                normalize_boolean(r.get("isActive").unwrap_or(&Value::Null)) == Some(true)
            })
            .count();

        let mut body = kpi_row(&[
            ("Users".to_string(), records.len().to_string()),
            ("Active".to_string(), active.to_string()),
        ]);

        let rows: Vec<Vec<String>> = dimension_totals(records, "role", None)
            .iter()
            .map(|d| vec![d.key.clone(), d.count.to_string()])
            .collect();
        body.push_str(&section("By role", &table(&["Role", "Count"], &rows)));

        body.push_str(&section("Records", &self.build_table(schema, records)));
        document_shell(&schema.title, &body)
    }
}
