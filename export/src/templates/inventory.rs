//! FILENAME: export/src/templates/inventory.rs

use crate::document::{document_shell, kpi_row, section, table, DocumentTemplate};
use crate::summary::dimension_totals;
use crate::templates::format_amount;
use engine::value::coerce_number;
use engine::{EntitySchema, Record};

/// Stock layout: quantity and value totals plus a per-branch breakdown.
pub struct InventoryTemplate;

impl DocumentTemplate for InventoryTemplate {
    fn build_document(&self, schema: &EntitySchema, records: &[Record]) -> String {
        let mut quantity = 0.0;
        let mut value = 0.0;
        for record in records {
            let qty = record.get("quantity").and_then(coerce_number);
            if let Some(qty) = qty {
                quantity += qty;
            }
            if let (Some(qty), Some(cost)) = (qty, record.get("cost").and_then(coerce_number)) {
                value += qty * cost;
            }
        }

        let mut body = kpi_row(&[
            ("Items".to_string(), records.len().to_string()),
            ("Total quantity".to_string(), format_amount(quantity)),
            ("Stock value".to_string(), format_amount(value)),
        ]);

        let rows: Vec<Vec<String>> = dimension_totals(records, "branchId", Some("quantity"))
            .iter()
            .map(|d| vec![d.key.clone(), d.count.to_string(), format_amount(d.total)])
            .collect();
        body.push_str(&section(
            "By branch",
            &table(&["Branch", "Items", "Quantity"], &rows),
        ));

        body.push_str(&section("Records", &self.build_table(schema, records)));
        document_shell(&schema.title, &body)
    }
}
