//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the record-management engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.
//! The engine is pure and synchronous: it derives the visible list view,
//! form/dialog state and outgoing payloads from an entity schema and an
//! already-fetched page of records. Transport and rendering live elsewhere.

pub mod config;
pub mod filter;
pub mod options;
pub mod reveal;
pub mod sort;
pub mod state;
pub mod value;

// Re-export commonly used types at the crate root
pub use config::{
    Choice, ColumnConfig, EntitySchema, FieldConfig, FieldType, FilterConfig, FilterType,
    OptionSource, Record, ShowOn, SortOrder, ValueMap,
};
pub use filter::{filter_records, matches_search, record_matches};
pub use reveal::{count_label, Reveal};
pub use sort::sort_records;
pub use state::EngineState;
pub use value::{
    coerce_number, display_value, from_edit_datetime, normalize_boolean, parse_record_date,
    to_edit_datetime, value_to_string,
};
