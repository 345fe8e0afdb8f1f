//! FILENAME: export/src/templates/branches.rs

use crate::document::{document_shell, kpi_row, section, DocumentTemplate};
use engine::value::normalize_boolean;
use engine::{EntitySchema, Record};
use serde_json::Value;

/// Contact-sheet layout for branch locations.
pub struct BranchesTemplate;

impl DocumentTemplate for BranchesTemplate {
    fn build_document(&self, schema: &EntitySchema, records: &[Record]) -> String {
        let active = records
            .iter()
            .filter(|r| {
                normalize_boolean(r.get("isActive").unwrap_or(&Value::Null)) == Some(true)
            })
            .count();

        let mut body = kpi_row(&[
            ("Branches".to_string(), records.len().to_string()),
            ("Active".to_string(), active.to_string()),
            ("Inactive".to_string(), (records.len() - active).to_string()),
        ]);
        body.push_str(&section("Directory", &self.build_table(schema, records)));
        document_shell(&schema.title, &body)
    }
}
