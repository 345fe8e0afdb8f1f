//! FILENAME: export/src/document.rs
//! PURPOSE: Self-contained printable HTML documents and their registry.
//! CONTEXT: A document is a single HTML string with inline print CSS,
//! meant to be handed straight to a browser print dialog. Templates are
//! selected by collection endpoint; unknown endpoints get the generic
//! table document.

use crate::templates;
use chrono::Local;
use engine::value::display_value;
use engine::{EntitySchema, Record};
use serde_json::Value;
use std::collections::HashMap;

// ============================================================================
// HTML BUILDING BLOCKS
// ============================================================================

pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Wraps body markup in a complete printable page with inline A4 CSS.
pub fn document_shell(title: &str, body: &str) -> String {
    let generated = Local::now().format("%Y-%m-%d %H:%M").to_string();
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html><head><meta charset=\"utf-8\">\n",
            "<title>{title}</title>\n",
            "<style>\n",
            "@page {{ size: A4; margin: 18mm; }}\n",
            "body {{ font-family: sans-serif; font-size: 11px; color: #222; }}\n",
            "h1 {{ font-size: 18px; margin-bottom: 2px; }}\n",
            "h2 {{ font-size: 13px; margin: 16px 0 6px; ",
            "border-bottom: 1px solid #999; padding-bottom: 2px; }}\n",
            ".meta {{ color: #666; margin-bottom: 12px; }}\n",
            "table {{ border-collapse: collapse; width: 100%; }}\n",
            "th, td {{ border: 1px solid #bbb; padding: 3px 6px; text-align: left; }}\n",
            "th {{ background: #eee; }}\n",
            ".kpis {{ display: flex; gap: 8px; margin: 8px 0; }}\n",
            ".kpi {{ border: 1px solid #bbb; padding: 6px 10px; }}\n",
            ".kpi .label {{ color: #666; font-size: 10px; }}\n",
            ".kpi .value {{ font-size: 14px; font-weight: bold; }}\n",
            "@media print {{ .kpis {{ break-inside: avoid; }} }}\n",
            "</style></head><body>\n",
            "<h1>{title}</h1>\n",
            "<div class=\"meta\">Generated {generated}</div>\n",
            "{body}\n",
            "</body></html>\n",
        ),
        title = html_escape(title),
        generated = generated,
        body = body,
    )
}

pub fn section(title: &str, inner: &str) -> String {
    format!("<h2>{}</h2>\n{}", html_escape(title), inner)
}

/// Renders a table; every cell is escaped here, never by callers.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut html = String::from("<table><thead><tr>");
    for header in headers {
        html.push_str(&format!("<th>{}</th>", html_escape(header)));
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", html_escape(cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

/// A row of label/value callout boxes.
pub fn kpi_row(items: &[(String, String)]) -> String {
    let mut html = String::from("<div class=\"kpis\">");
    for (label, value) in items {
        html.push_str(&format!(
            "<div class=\"kpi\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            html_escape(label),
            html_escape(value)
        ));
    }
    html.push_str("</div>");
    html
}

/// The records table every document includes: one row per record, one
/// column per configured list column, custom renderers honored.
pub fn records_table(schema: &EntitySchema, records: &[Record]) -> String {
    let headers: Vec<&str> = schema.columns.iter().map(|c| c.label.as_str()).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            schema
                .columns
                .iter()
                .map(|column| match column.render {
                    Some(render) => render(record),
                    None => display_value(record.get(&column.key).unwrap_or(&Value::Null)),
                })
                .collect()
        })
        .collect();
    table(&headers, &rows)
}

// ============================================================================
// TEMPLATES
// ============================================================================

/// One printable document layout for a collection.
pub trait DocumentTemplate {
    /// The shared tabular section: every layout includes the plain
    /// column/row table, whatever else it derives.
    fn build_table(&self, schema: &EntitySchema, records: &[Record]) -> String {
        records_table(schema, records)
    }

    fn build_document(&self, schema: &EntitySchema, records: &[Record]) -> String;
}

/// Maps collection endpoints to document templates, with a generic
/// fallback for endpoints nobody registered.
pub struct TemplateRegistry {
    templates: HashMap<String, Box<dyn DocumentTemplate>>,
    fallback: Box<dyn DocumentTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        TemplateRegistry {
            templates: HashMap::new(),
            fallback: Box::new(templates::GenericTemplate),
        }
    }

    /// Registry preloaded with the built-in per-collection layouts.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("appointments", Box::new(templates::AppointmentsTemplate));
        registry.register("branches", Box::new(templates::BranchesTemplate));
        registry.register("inventory", Box::new(templates::InventoryTemplate));
        registry.register("transection", Box::new(templates::TransectionTemplate));
        registry.register("users", Box::new(templates::UsersTemplate));
        registry
    }

    pub fn register(&mut self, endpoint: impl Into<String>, template: Box<dyn DocumentTemplate>) {
        self.templates.insert(endpoint.into(), template);
    }

    /// Builds the document for a schema's endpoint, falling back to the
    /// generic layout when no template is registered.
    pub fn build_document(&self, schema: &EntitySchema, records: &[Record]) -> String {
        let template = self
            .templates
            .get(&schema.endpoint)
            .unwrap_or(&self.fallback);
        log::debug!(
            "building document for {} over {} records",
            schema.endpoint,
            records.len()
        );
        template.build_document(schema, records)
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaping_covers_markup_characters() {
        assert_eq!(
            html_escape("<b>\"Fish & Chips\"</b>"),
            "&lt;b&gt;&quot;Fish &amp; Chips&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_table_escapes_cells() {
        let html = table(&["Name"], &[vec!["<script>".to_string()]]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_shell_is_a_complete_page() {
        let html = document_shell("Users", "<p>hi</p>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Users</title>"));
        assert!(html.contains("@page { size: A4"));
        assert!(html.ends_with("</body></html>\n"));
    }
}
