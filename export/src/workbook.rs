//! FILENAME: export/src/workbook.rs
//! PURPOSE: Writes the filtered, sorted record set to an XLSX workbook.
//! CONTEXT: One worksheet, one header row from the configured columns,
//! one row per record. Numeric and boolean values keep their native cell
//! type so spreadsheet formulas work on the result; everything else goes
//! through the generic display formatter.

use crate::error::ExportError;
use engine::value::display_value;
use engine::{EntitySchema, Record};
use rust_xlsxwriter::{Format, Workbook};
use serde_json::Value;
use std::path::Path;

/// Suggested download name for a collection export.
pub fn workbook_file_name(endpoint: &str) -> String {
    format!("{}-export.xlsx", endpoint)
}

pub fn save_workbook(
    schema: &EntitySchema,
    records: &[Record],
    path: &Path,
) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    // Sheet names are capped at 31 characters.
    let name: String = schema.title.chars().take(31).collect();
    worksheet.set_name(&name)?;

    let header_format = Format::new().set_bold();
    let mut widths: Vec<usize> = schema.columns.iter().map(|c| c.label.len()).collect();

    for (col, column) in schema.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, &column.label, &header_format)?;
    }

    for (row, record) in records.iter().enumerate() {
        let row = (row + 1) as u32;
        for (col, column) in schema.columns.iter().enumerate() {
            let value = record.get(&column.key).unwrap_or(&Value::Null);
            if let Some(render) = column.render {
                let text = render(record);
                widths[col] = widths[col].max(text.len());
                worksheet.write_string(row, col as u16, &text)?;
                continue;
            }
            match value {
                Value::Number(n) => {
                    worksheet.write_number(row, col as u16, n.as_f64().unwrap_or(0.0))?;
                }
                Value::Bool(b) => {
                    worksheet.write_boolean(row, col as u16, *b)?;
                }
                other => {
                    let text = display_value(other);
                    widths[col] = widths[col].max(text.len());
                    worksheet.write_string(row, col as u16, &text)?;
                }
            }
        }
    }

    for (col, width) in widths.iter().enumerate() {
        let clamped = (*width).clamp(10, 60) as f64;
        worksheet.set_column_width(col as u16, clamped)?;
    }

    log::info!(
        "wrote {} records to {}",
        records.len(),
        path.display()
    );
    workbook.save(path)?;
    Ok(())
}
