//! FILENAME: engine/src/state.rs
//! PURPOSE: Per-instance engine state and the form/delete dialog machines.
//! CONTEXT: Owns the fetched page, search/filter/reveal state and the form
//! draft buffer. Derives the visible slice and builds outgoing payloads.
//! Transport is someone else's job: every operation here is synchronous
//! and pure over in-memory data.

use crate::config::{EntitySchema, FieldConfig, FieldType, Record, ShowOn, ValueMap};
use crate::filter::filter_records;
use crate::reveal::Reveal;
use crate::sort::sort_records;
use crate::value::{
    coerce_number, from_edit_datetime, is_empty_value, normalize_boolean, to_edit_datetime,
    value_to_string,
};
use serde_json::Value;

/// All state for one mounted engine instance.
///
/// Dialog machines: form is Closed -> Create/Edit(record) -> Closed;
/// delete is Closed -> Confirming(record) -> Closed. Both are transient
/// UI state with no persistence.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub schema: EntitySchema,
    /// Fetched page, replaced wholesale on every fetch.
    pub records: Vec<Record>,
    pub search_term: String,
    pub filter_values: ValueMap,
    pub reveal: Reveal,
    /// Some(record) means the form edits that record; None means create.
    pub editing: Option<Record>,
    pub form_values: ValueMap,
    pub form_open: bool,
    pub delete_target: Option<Record>,
    pub delete_open: bool,
    /// Global busy flag; mutating actions are disabled while set.
    pub loading: bool,
    pub last_error: Option<String>,
    pub last_success: Option<String>,
}

impl EngineState {
    pub fn new(schema: EntitySchema) -> Self {
        let reveal = Reveal::new(schema.reveal_step);
        let filter_values = schema.default_filters.clone();
        EngineState {
            schema,
            records: Vec::new(),
            search_term: String::new(),
            filter_values,
            reveal,
            editing: None,
            form_values: ValueMap::new(),
            form_open: false,
            delete_target: None,
            delete_open: false,
            loading: false,
            last_error: None,
            last_success: None,
        }
    }

    // ========================================================================
    // LIST DERIVATION
    // ========================================================================

    /// Search + filters applied over the fetched page, in fetch order.
    pub fn filtered(&self) -> Vec<Record> {
        filter_records(
            &self.records,
            &self.search_term,
            &self.schema.search_keys,
            &self.schema.filters,
            &self.filter_values,
        )
    }

    /// Filtered set ordered by the configured sort key. This is the set
    /// the export pipeline operates on.
    pub fn sorted_filtered(&self) -> Vec<Record> {
        let mut rows = self.filtered();
        sort_records(&mut rows, &self.schema.sort_key, self.schema.sort_order);
        rows
    }

    /// The revealed prefix of the sorted, filtered set.
    pub fn visible_rows(&self) -> Vec<Record> {
        let mut rows = self.sorted_filtered();
        rows.truncate(self.reveal.count());
        rows
    }

    /// Replaces the fetched page wholesale and resyncs the reveal.
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.resync_reveal();
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.resync_reveal();
    }

    /// Sets one filter value and applies the matching filter's `on_change`
    /// patch. Date-range companion keys (`<key>From` / `<key>To`) resolve
    /// to their base filter.
    pub fn set_filter(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        self.filter_values.insert(key.clone(), value.clone());
        let config = self.schema.filters.iter().find(|filter| {
            filter.key == key
                || format!("{}From", filter.key) == key
                || format!("{}To", filter.key) == key
        });
        if let Some(config) = config.cloned() {
            config.apply_on_change(&value, &mut self.filter_values);
        }
        self.resync_reveal();
    }

    pub fn show_more(&mut self) {
        self.reveal.show_more();
    }

    fn resync_reveal(&mut self) {
        let matched = self.filtered().len();
        self.reveal.sync(matched);
    }

    // ========================================================================
    // FORM DIALOG
    // ========================================================================

    /// Fields visible in the current mode: create hides edit-only fields
    /// and vice versa.
    pub fn visible_fields(&self) -> Vec<&FieldConfig> {
        let editing = self.editing.is_some();
        self.schema
            .form_fields
            .iter()
            .filter(|field| match field.show_on {
                ShowOn::Both => true,
                ShowOn::Create => !editing,
                ShowOn::Edit => editing,
            })
            .collect()
    }

    /// Opens the form in create mode, seeded from the configured defaults.
    pub fn open_create(&mut self) {
        self.editing = None;
        self.form_values = self.schema.default_form_values.clone();
        self.form_open = true;
    }

    /// Opens the form in edit mode, converting each field to its edit
    /// representation. Lookup fields resolve a related id through the
    /// direct key, a capitalized alias, then an embedded object's id.
    pub fn open_edit(&mut self, record: Record) {
        let mut next = record.clone();
        for field in &self.schema.form_fields {
            match field.field_type {
                FieldType::DateTime => {
                    let edit = to_edit_datetime(record.get(&field.key).unwrap_or(&Value::Null));
                    next.insert(field.key.clone(), Value::String(edit));
                }
                FieldType::Lookup => {
                    let resolved = resolve_lookup_value(&record, &field.key);
                    next.insert(field.key.clone(), resolved);
                }
                _ => {}
            }
        }
        self.editing = Some(record);
        self.form_values = next;
        self.form_open = true;
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
        self.editing = None;
    }

    /// Identity of the record being edited, if any. Create mode has none.
    pub fn editing_id(&self) -> Option<i64> {
        self.editing
            .as_ref()
            .and_then(|record| record.get("id"))
            .and_then(Value::as_i64)
    }

    // ========================================================================
    // DELETE DIALOG
    // ========================================================================

    pub fn request_delete(&mut self, record: Record) {
        self.delete_target = Some(record);
        self.delete_open = true;
    }

    pub fn cancel_delete(&mut self) {
        self.delete_open = false;
        self.delete_target = None;
    }

    // ========================================================================
    // OUTGOING PAYLOAD
    // ========================================================================

    /// Builds the outgoing payload from the fields visible in the current
    /// mode, applying edit -> wire coercion per field type. Empty values
    /// are omitted unless the field sends an explicit null; a value that
    /// fails numeric coercion is silently dropped (lenient policy, see
    /// the value module).
    pub fn build_payload(&self) -> Record {
        let mut payload = Record::new();
        for field in self.visible_fields() {
            let mut value = self
                .form_values
                .get(&field.key)
                .cloned()
                .unwrap_or(Value::Null);

            match field.field_type {
                FieldType::DateTime => {
                    value = from_edit_datetime(&value_to_string(&value));
                }
                FieldType::Lookup => {
                    if !is_empty_value(&value) {
                        if let Some(number) = coerce_number(&value) {
                            value = number_value(number);
                        }
                    }
                }
                FieldType::Number => {
                    if !is_empty_value(&value) {
                        match coerce_number(&value) {
                            Some(number) => value = number_value(number),
                            None => continue,
                        }
                    }
                }
                FieldType::Boolean => {
                    if is_empty_value(&value) {
                        continue;
                    }
                    match normalize_boolean(&value) {
                        Some(flag) => value = Value::Bool(flag),
                        None => continue,
                    }
                }
                _ => {}
            }

            if is_empty_value(&value) {
                if field.send_null_when_empty {
                    payload.insert(field.key.clone(), Value::Null);
                }
                continue;
            }
            payload.insert(field.key.clone(), value);
        }
        payload
    }
}

/// Integral floats become JSON integers so payloads read like the wire
/// values they came from.
fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < 9.0e15 {
        Value::from(number as i64)
    } else {
        serde_json::Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Lookup seeding chain: direct key, capitalized alias, then (for
/// `<relation>Id` keys) an embedded related object's id. Unresolved
/// lookups seed as the empty string.
fn resolve_lookup_value(record: &Record, key: &str) -> Value {
    if let Some(direct) = record.get(key) {
        if !is_empty_value(direct) {
            return direct.clone();
        }
    }
    if let Some(alt) = record.get(&capitalize(key)) {
        if !is_empty_value(alt) {
            return alt.clone();
        }
    }
    if let Some(base) = key.strip_suffix("Id") {
        let embedded = record
            .get(base)
            .or_else(|| record.get(&capitalize(base)))
            .and_then(Value::as_object);
        if let Some(embedded) = embedded {
            if let Some(id) = embedded.get("id") {
                return id.clone();
            }
        }
    }
    Value::String(String::new())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilterConfig, FilterType, SortOrder};
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn appointment_schema() -> EntitySchema {
        EntitySchema::new("Appointments", "appointments")
            .with_form_fields(vec![
                FieldConfig::new("branchId", "Branch", FieldType::Number).required(),
                FieldConfig::new("memberId", "Member", FieldType::Lookup).required(),
                FieldConfig::new("startAt", "Starts", FieldType::DateTime).required(),
                FieldConfig::new("status", "Status", FieldType::Select),
                FieldConfig::new("notes", "Notes", FieldType::TextArea),
            ])
            .with_sort("id", SortOrder::Desc)
    }

    #[test]
    fn test_open_edit_converts_datetimes_to_edit_shape() {
        let mut state = EngineState::new(appointment_schema());
        let wire = from_edit_datetime("2024-06-01T09:00");
        let mut row = record(json!({"id": 5, "status": "scheduled"}));
        row.insert("startAt".to_string(), wire);

        state.open_edit(row);
        assert!(state.form_open);
        assert_eq!(state.form_values["startAt"], json!("2024-06-01T09:00"));
        assert_eq!(state.editing_id(), Some(5));
    }

    #[test]
    fn test_open_edit_resolves_lookup_from_embedded_object() {
        let mut state = EngineState::new(appointment_schema());
        let row = record(json!({
            "id": 8,
            "member": {"id": 42, "name": "Alice"},
            "startAt": "2024-06-01T09:00:00"
        }));
        state.open_edit(row);
        assert_eq!(state.form_values["memberId"], json!(42));
    }

    #[test]
    fn test_open_edit_prefers_capitalized_alias() {
        let mut state = EngineState::new(appointment_schema());
        let row = record(json!({"id": 9, "MemberId": 13}));
        state.open_edit(row);
        assert_eq!(state.form_values["memberId"], json!(13));
    }

    #[test]
    fn test_unresolved_lookup_seeds_empty() {
        let mut state = EngineState::new(appointment_schema());
        state.open_edit(record(json!({"id": 10})));
        assert_eq!(state.form_values["memberId"], json!(""));
    }

    #[test]
    fn test_payload_omits_empty_unless_null_requested() {
        let schema = EntitySchema::new("Users", "users").with_form_fields(vec![
            FieldConfig::new("name", "Name", FieldType::Text),
            FieldConfig::new("phone", "Phone", FieldType::Text).send_null_when_empty(),
        ]);
        let mut state = EngineState::new(schema);
        state.open_create();
        state.form_values.insert("name".to_string(), json!(""));
        state.form_values.insert("phone".to_string(), json!(""));

        let payload = state.build_payload();
        assert!(!payload.contains_key("name"));
        assert_eq!(payload.get("phone"), Some(&Value::Null));
    }

    #[test]
    fn test_payload_silently_drops_unparsable_numbers() {
        let schema = EntitySchema::new("Inventory", "inventory").with_form_fields(vec![
            FieldConfig::new("quantity", "Quantity", FieldType::Number)
        ]);
        let mut state = EngineState::new(schema);
        state.open_create();
        state.form_values.insert("quantity".to_string(), json!("not a number"));
        assert!(state.build_payload().is_empty());
    }

    #[test]
    fn test_payload_skips_untouched_booleans() {
        let schema = EntitySchema::new("Branches", "branches").with_form_fields(vec![
            FieldConfig::new("isActive", "Active", FieldType::Boolean)
        ]);
        let mut state = EngineState::new(schema);
        state.open_create();
        assert!(state.build_payload().is_empty());

        state.form_values.insert("isActive".to_string(), json!(true));
        assert_eq!(state.build_payload().get("isActive"), Some(&json!(true)));
    }

    #[test]
    fn test_edit_round_trip_is_idempotent() {
        let mut state = EngineState::new(appointment_schema());
        let wire_start = from_edit_datetime("2024-06-01T09:00");
        let row = record(json!({
            "id": 3,
            "branchId": 2,
            "memberId": 42,
            "status": "scheduled",
            "notes": "walk-in",
            "startAt": wire_start.clone()
        }));
        state.open_edit(row.clone());
        let payload = state.build_payload();

        assert_eq!(payload["branchId"], row["branchId"]);
        assert_eq!(payload["memberId"], row["memberId"]);
        assert_eq!(payload["status"], row["status"]);
        assert_eq!(payload["notes"], row["notes"]);
        assert_eq!(payload["startAt"], wire_start);
    }

    #[test]
    fn test_visible_fields_respect_mode() {
        let schema = EntitySchema::new("Users", "users").with_form_fields(vec![
            FieldConfig::new("email", "Email", FieldType::Text).show_on(ShowOn::Create),
            FieldConfig::new("password", "Password", FieldType::Password),
            FieldConfig::new("lastLogin", "Last login", FieldType::DateTime).show_on(ShowOn::Edit),
        ]);
        let mut state = EngineState::new(schema);

        state.open_create();
        let create_keys: Vec<&str> =
            state.visible_fields().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(create_keys, vec!["email", "password"]);

        state.open_edit(record(json!({"id": 1})));
        let edit_keys: Vec<&str> =
            state.visible_fields().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(edit_keys, vec!["password", "lastLogin"]);
    }

    #[test]
    fn test_delete_dialog_machine() {
        let mut state = EngineState::new(appointment_schema());
        let row = record(json!({"id": 4}));
        state.request_delete(row);
        assert!(state.delete_open);
        assert!(state.delete_target.is_some());
        state.cancel_delete();
        assert!(!state.delete_open);
        assert!(state.delete_target.is_none());
    }

    #[test]
    fn test_filter_change_runs_on_change_patch() {
        let schema = EntitySchema::new("Inventory", "inventory").with_filters(vec![
            FilterConfig::new("region", "Region", FilterType::Select).with_on_change(
                |_value, _values| {
                    let mut patch = ValueMap::new();
                    patch.insert("branchId".to_string(), json!(""));
                    Some(patch)
                },
            ),
            FilterConfig::new("branchId", "Branch", FilterType::Number),
        ]);
        let mut state = EngineState::new(schema);
        state.filter_values.insert("branchId".to_string(), json!(3));
        state.set_filter("region", json!("north"));
        assert_eq!(state.filter_values.get("branchId"), Some(&json!("")));
    }

    #[test]
    fn test_reveal_resets_when_filter_changes_size() {
        let schema = EntitySchema::new("Users", "users")
            .with_reveal_step(2)
            .with_filters(vec![FilterConfig::new("role", "Role", FilterType::Select)]);
        let mut state = EngineState::new(schema);
        let rows: Vec<Record> = (0..6)
            .map(|i| {
                record(json!({
                    "id": i,
                    "role": if i % 2 == 0 { "admin" } else { "member" }
                }))
            })
            .collect();
        state.set_records(rows);
        assert_eq!(state.visible_rows().len(), 2);
        state.show_more();
        assert_eq!(state.visible_rows().len(), 4);

        state.set_filter("role", json!("admin"));
        // Size changed: back to the first increment, never past the match count.
        assert_eq!(state.visible_rows().len(), 2);
    }
}
