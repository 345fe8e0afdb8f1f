//! FILENAME: engine/src/options.rs
//! PURPOSE: Resolves selectable choices for fields and filters.
//! CONTEXT: Choices are either a static list or a function of the live
//! value map (form values for fields, filter values for filters). Resolvers
//! must run on every pass that could have changed their inputs; nothing
//! here is cached.

use crate::config::{Choice, FieldConfig, FilterConfig, OptionSource, ValueMap};
use crate::value::value_to_string;
use serde_json::Value;

impl OptionSource {
    /// Resolves the current choice list against the live values.
    pub fn resolve(&self, values: &ValueMap) -> Vec<Choice> {
        match self {
            OptionSource::Static(choices) => choices.clone(),
            OptionSource::Computed(resolver) => resolver(values),
        }
    }
}

impl FieldConfig {
    pub fn resolve_options(&self, form_values: &ValueMap) -> Vec<Choice> {
        self.options.resolve(form_values)
    }

    /// Whether the currently entered value is offered by the resolved
    /// choices. With an empty choice list nothing is selectable.
    pub fn has_valid_choice(&self, form_values: &ValueMap) -> bool {
        let current = match form_values.get(&self.key) {
            Some(value) if !crate::value::is_empty_value(value) => value,
            _ => return false,
        };
        let wanted = value_to_string(current);
        self.resolve_options(form_values)
            .iter()
            .any(|choice| value_to_string(&choice.value) == wanted)
    }
}

impl FilterConfig {
    pub fn resolve_options(&self, filter_values: &ValueMap) -> Vec<Choice> {
        self.options.resolve(filter_values)
    }

    pub fn is_disabled(&self, filter_values: &ValueMap) -> bool {
        match self.disabled {
            Some(predicate) => predicate(filter_values),
            None => false,
        }
    }

    /// Applies this filter's `on_change` side effect, merging the returned
    /// partial patch over `next`.
    pub fn apply_on_change(&self, value: &Value, next: &mut ValueMap) {
        if let Some(on_change) = self.on_change {
            if let Some(patch) = on_change(value, next) {
                for (key, patched) in patch {
                    next.insert(key, patched);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldType, FilterType};
    use serde_json::json;

    fn category_options(values: &ValueMap) -> Vec<Choice> {
        match values.get("type").map(value_to_string).as_deref() {
            Some("income") => vec![
                Choice::new("sales", "Sales"),
                Choice::new("services", "Services"),
            ],
            Some("expense") => vec![
                Choice::new("rent", "Rent"),
                Choice::new("supplies", "Supplies"),
            ],
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_static_options_returned_unchanged() {
        let field = FieldConfig::new("role", "Role", FieldType::Select)
            .with_options(vec![Choice::new("admin", "Admin")]);
        let resolved = field.resolve_options(&ValueMap::new());
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].label, "Admin");
    }

    #[test]
    fn test_dependent_options_follow_parent_value() {
        let field = FieldConfig::new("category", "Category", FieldType::Select)
            .with_computed_options(category_options);

        let mut values = ValueMap::new();
        assert!(field.resolve_options(&values).is_empty());

        values.insert("type".to_string(), json!("income"));
        let income: Vec<String> = field
            .resolve_options(&values)
            .into_iter()
            .map(|c| value_to_string(&c.value))
            .collect();

        values.insert("type".to_string(), json!("expense"));
        let expense: Vec<String> = field
            .resolve_options(&values)
            .into_iter()
            .map(|c| value_to_string(&c.value))
            .collect();

        assert_eq!(income, vec!["sales", "services"]);
        assert_eq!(expense, vec!["rent", "supplies"]);
        assert!(income.iter().all(|v| !expense.contains(v)));
    }

    #[test]
    fn test_no_valid_choice_when_parent_unset() {
        let field = FieldConfig::new("category", "Category", FieldType::Select)
            .with_computed_options(category_options);
        let mut values = ValueMap::new();
        values.insert("category".to_string(), json!("sales"));
        // Parent "type" unset: the resolver offers nothing to select.
        assert!(!field.has_valid_choice(&values));

        values.insert("type".to_string(), json!("income"));
        assert!(field.has_valid_choice(&values));
    }

    #[test]
    fn test_filter_disabled_until_prerequisite_set() {
        let filter = FilterConfig::new("branchId", "Branch", FilterType::Lookup)
            .with_disabled(|values| values.get("region").is_none());
        let mut values = ValueMap::new();
        assert!(filter.is_disabled(&values));
        values.insert("region".to_string(), json!("north"));
        assert!(!filter.is_disabled(&values));
    }

    #[test]
    fn test_on_change_patch_resets_dependent_filter() {
        let filter = FilterConfig::new("region", "Region", FilterType::Select).with_on_change(
            |_value, _values| {
                let mut patch = ValueMap::new();
                patch.insert("branchId".to_string(), json!(""));
                Some(patch)
            },
        );
        let mut values = ValueMap::new();
        values.insert("branchId".to_string(), json!(7));
        filter.apply_on_change(&json!("south"), &mut values);
        assert_eq!(values.get("branchId"), Some(&json!("")));
    }
}
