//! FILENAME: engine/src/config.rs
//! PURPOSE: Declarative schema types that drive the engine.
//! CONTEXT: One `EntitySchema` describes everything the engine needs to
//! manage a collection of homogeneous records: list columns, editable form
//! fields, client-side filters, search keys and sort defaults. The same
//! engine is reused across unrelated entities purely by swapping schemas.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One record of the managed entity. The schema is open: unknown keys are
/// preserved and round-tripped untouched. Identity lives under `"id"`.
pub type Record = serde_json::Map<String, Value>;

/// Mapping used for form drafts and filter values. Same shape as a record.
pub type ValueMap = serde_json::Map<String, Value>;

// ============================================================================
// SELECTABLE CHOICES
// ============================================================================

/// A selectable option for select/lookup fields and filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub value: Value,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Choice {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Where a field's or filter's choices come from: a fixed list, or a
/// resolver computed from the live value map (dependent options).
///
/// Resolvers are plain function pointers so a schema stays cheap to clone
/// and testable without any rendering context.
#[derive(Debug, Clone)]
pub enum OptionSource {
    Static(Vec<Choice>),
    Computed(fn(&ValueMap) -> Vec<Choice>),
}

impl Default for OptionSource {
    fn default() -> Self {
        OptionSource::Static(Vec::new())
    }
}

// ============================================================================
// FORM FIELDS
// ============================================================================

/// The editable representation of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    Number,
    Select,
    DateTime,
    Boolean,
    TextArea,
    Password,
    /// Pick a related record by id; choices usually depend on other values.
    Lookup,
}

/// Which form mode a field appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShowOn {
    Create,
    Edit,
    Both,
}

impl Default for ShowOn {
    fn default() -> Self {
        ShowOn::Both
    }
}

/// Configuration for one editable attribute of the entity.
///
/// `key` must address a top-level attribute of the record, or be resolvable
/// to one via the `<relation>Id` convention for lookup fields.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub key: String,
    pub label: String,
    pub field_type: FieldType,
    pub options: OptionSource,
    pub required: bool,
    /// Numeric input step hint, e.g. "0.01" for money.
    pub step: Option<String>,
    pub show_on: ShowOn,
    /// When true, clearing the field sends an explicit `null` instead of
    /// omitting the key from the outgoing payload.
    pub send_null_when_empty: bool,
}

impl FieldConfig {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        FieldConfig {
            key: key.into(),
            label: label.into(),
            field_type,
            options: OptionSource::default(),
            required: false,
            step: None,
            show_on: ShowOn::Both,
            send_null_when_empty: false,
        }
    }

    pub fn with_options(mut self, options: Vec<Choice>) -> Self {
        self.options = OptionSource::Static(options);
        self
    }

    pub fn with_computed_options(mut self, resolver: fn(&ValueMap) -> Vec<Choice>) -> Self {
        self.options = OptionSource::Computed(resolver);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    pub fn show_on(mut self, show_on: ShowOn) -> Self {
        self.show_on = show_on;
        self
    }

    pub fn send_null_when_empty(mut self) -> Self {
        self.send_null_when_empty = true;
        self
    }
}

// ============================================================================
// LIST COLUMNS
// ============================================================================

/// Configuration for one list column. Display only: columns never
/// participate in filtering or search.
#[derive(Debug, Clone)]
pub struct ColumnConfig {
    pub key: String,
    pub label: String,
    /// Custom cell renderer. Falls back to the generic value formatter.
    pub render: Option<fn(&Record) -> String>,
}

impl ColumnConfig {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        ColumnConfig {
            key: key.into(),
            label: label.into(),
            render: None,
        }
    }

    pub fn with_render(mut self, render: fn(&Record) -> String) -> Self {
        self.render = Some(render);
        self
    }
}

// ============================================================================
// FILTERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    Text,
    Number,
    Boolean,
    /// Exact string match against the record value.
    Select,
    /// Two companion values keyed `<key>From` / `<key>To`.
    DateRange,
    /// Exact match whose choices usually depend on another filter.
    Lookup,
}

/// Configuration for one client-side filter.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub key: String,
    pub label: String,
    pub filter_type: FilterType,
    pub options: OptionSource,
    /// Disables the filter until a prerequisite value is set.
    pub disabled: Option<fn(&ValueMap) -> bool>,
    /// Side effect returning a partial patch merged into the filter values,
    /// used to reset a dependent filter when its parent changes.
    pub on_change: Option<fn(&Value, &ValueMap) -> Option<ValueMap>>,
}

impl FilterConfig {
    pub fn new(key: impl Into<String>, label: impl Into<String>, filter_type: FilterType) -> Self {
        FilterConfig {
            key: key.into(),
            label: label.into(),
            filter_type,
            options: OptionSource::default(),
            disabled: None,
            on_change: None,
        }
    }

    pub fn with_options(mut self, options: Vec<Choice>) -> Self {
        self.options = OptionSource::Static(options);
        self
    }

    pub fn with_computed_options(mut self, resolver: fn(&ValueMap) -> Vec<Choice>) -> Self {
        self.options = OptionSource::Computed(resolver);
        self
    }

    pub fn with_disabled(mut self, disabled: fn(&ValueMap) -> bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn with_on_change(mut self, on_change: fn(&Value, &ValueMap) -> Option<ValueMap>) -> Self {
        self.on_change = Some(on_change);
        self
    }
}

// ============================================================================
// ENTITY SCHEMA
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// The full configuration for one mounted engine instance.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    pub title: String,
    /// Remote collection name; also keys the export template registry.
    pub endpoint: String,
    pub columns: Vec<ColumnConfig>,
    pub form_fields: Vec<FieldConfig>,
    pub filters: Vec<FilterConfig>,
    pub default_filters: ValueMap,
    pub sort_key: String,
    pub sort_order: SortOrder,
    pub default_form_values: ValueMap,
    /// Keys the search term matches against. Empty means every key.
    pub search_keys: Vec<String>,
    /// Bounded fetch page size; a full page is reported as "N+".
    pub page_size: usize,
    /// Client-side reveal increment for the list view.
    pub reveal_step: usize,
}

impl EntitySchema {
    pub fn new(title: impl Into<String>, endpoint: impl Into<String>) -> Self {
        EntitySchema {
            title: title.into(),
            endpoint: endpoint.into(),
            columns: Vec::new(),
            form_fields: Vec::new(),
            filters: Vec::new(),
            default_filters: ValueMap::new(),
            sort_key: "id".to_string(),
            sort_order: SortOrder::Desc,
            default_form_values: ValueMap::new(),
            search_keys: Vec::new(),
            page_size: 100,
            reveal_step: 20,
        }
    }

    pub fn with_columns(mut self, columns: Vec<ColumnConfig>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_form_fields(mut self, form_fields: Vec<FieldConfig>) -> Self {
        self.form_fields = form_fields;
        self
    }

    pub fn with_filters(mut self, filters: Vec<FilterConfig>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_default_filters(mut self, default_filters: ValueMap) -> Self {
        self.default_filters = default_filters;
        self
    }

    pub fn with_sort(mut self, key: impl Into<String>, order: SortOrder) -> Self {
        self.sort_key = key.into();
        self.sort_order = order;
        self
    }

    pub fn with_default_form_values(mut self, defaults: ValueMap) -> Self {
        self.default_form_values = defaults;
        self
    }

    pub fn with_search_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_reveal_step(mut self, reveal_step: usize) -> Self {
        self.reveal_step = reveal_step;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_defaults() {
        let schema = EntitySchema::new("Branches", "branches");
        assert_eq!(schema.sort_key, "id");
        assert_eq!(schema.sort_order, SortOrder::Desc);
        assert_eq!(schema.page_size, 100);
        assert_eq!(schema.reveal_step, 20);
        assert!(schema.search_keys.is_empty());
    }

    #[test]
    fn test_field_builder() {
        let field = FieldConfig::new("amount", "Amount", FieldType::Number)
            .required()
            .with_step("0.01");
        assert!(field.required);
        assert_eq!(field.step.as_deref(), Some("0.01"));
        assert_eq!(field.show_on, ShowOn::Both);
    }
}
