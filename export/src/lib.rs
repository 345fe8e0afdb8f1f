//! FILENAME: export/src/lib.rs
//! PURPOSE: Main library entry point for the export pipeline.
//! CONTEXT: Turns the engine's filtered, sorted record set into an XLSX
//! workbook or a self-contained printable HTML document. Documents are
//! chosen per collection through a template registry with a generic
//! fallback.

pub mod document;
pub mod error;
pub mod summary;
pub mod templates;
pub mod workbook;

pub use document::{DocumentTemplate, TemplateRegistry};
pub use error::ExportError;
pub use summary::{
    dimension_totals, period_counts, period_totals, DimensionTotals, Period, PeriodTotals,
};
pub use workbook::{save_workbook, workbook_file_name};
