//! Filename generation and the host-side file/clipboard collaborators.

use chrono::Utc;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::import_export::{envelope_to_json, export_envelope};
use crate::table::Table;

/// Host-provided file save: a browser download, a disk write in tests.
pub trait FileSaver {
    fn save(&mut self, content: &str, filename: &str);
}

/// Host-provided best-effort clipboard. Returns false when access is denied
/// by the environment; that is not an error.
pub trait Clipboard {
    fn copy_text(&mut self, content: &str) -> bool;
}

/// Sanitize a human name to `[a-z0-9_]` lowercase, then append the current
/// date and extension: `monthly_budget-2026-08-06.json`.
pub fn generate_filename(base_name: &str, extension: &str) -> String {
    let sanitized: String = base_name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let date = Utc::now().format("%Y-%m-%d");
    format!("{sanitized}-{date}.{extension}")
}

/// Download one table as a versioned envelope named after it.
pub fn export_table(saver: &mut dyn FileSaver, table: &Table) -> bool {
    let envelope = export_envelope(vec![table.clone()]);
    let filename = generate_filename(&table.name, "json");
    saver.save(&envelope_to_json(&envelope), &filename);
    true
}

/// Download every table in one envelope; false when there is nothing to
/// export.
pub fn export_all_tables(saver: &mut dyn FileSaver, tables: &[Table]) -> bool {
    if tables.is_empty() {
        return false;
    }
    let envelope = export_envelope(tables.to_vec());
    let filename = generate_filename("all-tables", "json");
    saver.save(&envelope_to_json(&envelope), &filename);
    true
}

/// Copy one table's envelope JSON to the clipboard.
pub fn copy_table_json(clipboard: &mut dyn Clipboard, table: &Table) -> bool {
    let envelope = export_envelope(vec![table.clone()]);
    clipboard.copy_text(&envelope_to_json(&envelope))
}

/// Parse file text as JSON. The asynchronous read itself happens on the
/// host side of the boundary; this is the decoding tail.
pub fn read_json_text(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|err| Error::FileReadFailure(err.to_string()))
}
