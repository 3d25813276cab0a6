//! JSON envelope export/import with defensive sanitization, plus HTML export.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::ident::{new_table_id, now_iso};
use crate::table::{Table, TableCell};

/// Envelope version written on export.
pub const EXPORT_VERSION: &str = "1.0";

/// Portable wrapper around one or more exported tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub version: String,
    pub timestamp: String,
    pub tables: Vec<Table>,
}

/// Wrap tables for export, stamped with the current time.
pub fn export_envelope(tables: Vec<Table>) -> ExportData {
    ExportData {
        version: EXPORT_VERSION.to_string(),
        timestamp: now_iso(),
        tables,
    }
}

/// Pretty-printed envelope JSON, the format written to files and the
/// clipboard.
pub fn envelope_to_json(envelope: &ExportData) -> String {
    serde_json::to_string_pretty(envelope).unwrap_or_else(|_| "{}".to_string())
}

/// Minimal legacy-shape check: `data` is a non-empty array whose first
/// element is itself an array. Per-cell fields are not inspected here.
pub fn validate_table_data(raw: &Value) -> bool {
    raw.get("data")
        .and_then(Value::as_array)
        .map_or(false, |rows| !rows.is_empty() && rows[0].is_array())
}

/// Parse raw import JSON into sanitized tables.
///
/// Accepts the multi-table envelope (a `tables` array) or the legacy
/// single-table shape (bare `data` grid with optional `rows`/`cols`). Any
/// other shape is an [`Error::InvalidFormat`]. Every table comes back with
/// a fresh id, a non-empty name, dimensions recomputed from its grid, and
/// cells rebuilt through [`sanitize_cell`], so the result satisfies the
/// model invariants no matter what the source JSON was missing.
pub fn parse_import(raw: &Value) -> Result<Vec<Table>> {
    let entries: Vec<Value> = if let Some(tables) = raw.get("tables").and_then(Value::as_array) {
        tables.clone()
    } else if validate_table_data(raw) {
        vec![synthesize_legacy_table(raw)]
    } else {
        return Err(Error::InvalidFormat(
            "expected a table envelope or legacy table data".to_string(),
        ));
    };

    let tables = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| sanitize_table(entry, index))
        .collect::<Result<Vec<_>>>()?;
    debug!("import parsed {} table(s)", tables.len());
    Ok(tables)
}

/// Rebuild a cell from untrusted JSON. Missing or mistyped fields fall back
/// to the blank unmerged 1x1 default; `originalValue` passes through
/// unchanged, including when absent.
pub fn sanitize_cell(raw: &Value) -> TableCell {
    TableCell {
        value: raw
            .get("value")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        colspan: span_field(raw, "colspan"),
        rowspan: span_field(raw, "rowspan"),
        merged: raw.get("merged").and_then(Value::as_bool).unwrap_or(false),
        original_value: raw
            .get("originalValue")
            .and_then(Value::as_str)
            .map(str::to_owned),
    }
}

/// Render a table as a plain HTML fragment. Merged placeholder cells are
/// skipped; span attributes appear only when greater than one; cell text is
/// escaped.
pub fn to_html(table: &Table) -> String {
    let mut out = String::new();
    out.push_str("<table>\n");
    for row in &table.data {
        out.push_str("  <tr>\n");
        for cell in row {
            if cell.merged {
                continue;
            }
            let mut attrs = String::new();
            if cell.colspan > 1 {
                attrs.push_str(&format!(" colspan=\"{}\"", cell.colspan));
            }
            if cell.rowspan > 1 {
                attrs.push_str(&format!(" rowspan=\"{}\"", cell.rowspan));
            }
            out.push_str(&format!(
                "    <td{}>{}</td>\n",
                attrs,
                html_escape::encode_text(&cell.value)
            ));
        }
        out.push_str("  </tr>\n");
    }
    out.push_str("</table>");
    out
}

// The legacy shape carries no name; the synthesized entry gets the fixed
// "Imported Table" label, so positional numbering never applies to it.
fn synthesize_legacy_table(raw: &Value) -> Value {
    serde_json::json!({
        "name": "Imported Table",
        "data": raw.get("data").cloned().unwrap_or(Value::Null),
    })
}

fn sanitize_table(entry: &Value, index: usize) -> Result<Table> {
    let raw_rows = entry.get("data").and_then(Value::as_array).ok_or_else(|| {
        Error::InvalidFormat(format!("table {} has no cell data", index + 1))
    })?;

    let mut data = Vec::with_capacity(raw_rows.len());
    for raw_row in raw_rows {
        let cells = raw_row.as_array().ok_or_else(|| {
            Error::InvalidFormat(format!("table {} has a malformed row", index + 1))
        })?;
        data.push(cells.iter().map(sanitize_cell).collect::<Vec<_>>());
    }
    let (rows, cols) = normalize_grid(&mut data);

    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Imported Table {}", index + 1));
    let created_at = entry
        .get("createdAt")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(now_iso);

    Ok(Table {
        id: new_table_id(),
        name,
        rows,
        cols,
        data,
        created_at,
        updated_at: now_iso(),
    })
}

// Imported `rows`/`cols` declarations are ignored: the grid itself is the
// source of truth. Ragged rows are padded with blank cells to the longest
// row's width so every row ends up the same length.
fn normalize_grid(data: &mut [Vec<TableCell>]) -> (usize, usize) {
    let cols = data.iter().map(Vec::len).max().unwrap_or(0);
    for row in data.iter_mut() {
        if row.len() < cols {
            warn!("padding ragged imported row from {} to {} cells", row.len(), cols);
            row.resize_with(cols, TableCell::default);
        }
    }
    (data.len(), cols)
}

fn span_field(raw: &Value, key: &str) -> u32 {
    raw.get(key)
        .and_then(Value::as_u64)
        .map(|n| n.clamp(1, u64::from(u32::MAX)) as u32)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn validate_accepts_only_a_nested_grid() {
        assert!(validate_table_data(&json!({"data": [["x"]]})));
        assert!(validate_table_data(&json!({"data": [[{"value": "a"}]]})));
        assert!(!validate_table_data(&json!({"data": []})));
        assert!(!validate_table_data(&json!({"data": ["flat"]})));
        assert!(!validate_table_data(&json!({"foo": 1})));
        assert!(!validate_table_data(&json!(null)));
    }

    #[test]
    fn legacy_import_fills_in_cell_defaults() {
        let raw = json!({"data": [[{"value": "a"}], [{"value": "b"}]]});
        let tables = parse_import(&raw).unwrap();
        assert_eq!(tables.len(), 1);

        let table = &tables[0];
        assert_eq!(table.name, "Imported Table");
        assert_eq!(table.rows, 2);
        assert_eq!(table.cols, 1);
        for row in &table.data {
            for cell in row {
                assert_eq!(cell.colspan, 1);
                assert_eq!(cell.rowspan, 1);
                assert!(!cell.merged);
            }
        }
        assert_eq!(table.cell(0, 0).value, "a");
        assert_eq!(table.cell(1, 0).value, "b");
    }

    #[test]
    fn envelope_import_assigns_fresh_ids_and_numbered_names() {
        let raw = json!({
            "version": "1.0",
            "timestamp": "2026-01-01T00:00:00.000Z",
            "tables": [
                {"id": "stale", "name": "Kept", "data": [[{"value": "x"}]]},
                {"id": "stale", "data": [[{"value": "y"}]], "createdAt": "2020-05-01T00:00:00.000Z"},
            ]
        });
        let tables = parse_import(&raw).unwrap();
        assert_eq!(tables.len(), 2);

        assert_eq!(tables[0].name, "Kept");
        assert_eq!(tables[1].name, "Imported Table 2");
        assert_ne!(tables[0].id, "stale");
        assert_ne!(tables[1].id, "stale");
        assert_ne!(tables[0].id, tables[1].id);
        assert_eq!(tables[1].created_at, "2020-05-01T00:00:00.000Z");
    }

    #[test]
    fn unknown_shapes_fail_with_invalid_format() {
        for raw in [json!({"foo": 1}), json!([1, 2, 3]), json!("text"), json!({})] {
            assert!(parse_import(&raw).unwrap_err().is_invalid_format());
        }
    }

    #[test]
    fn envelope_entry_without_data_fails_entirely() {
        let raw = json!({"tables": [{"name": "No Grid"}]});
        assert!(parse_import(&raw).unwrap_err().is_invalid_format());
    }

    #[test]
    fn ragged_rows_are_padded_to_a_uniform_width() {
        let raw = json!({"data": [
            [{"value": "a"}, {"value": "b"}, {"value": "c"}],
            [{"value": "d"}],
        ]});
        let table = parse_import(&raw).unwrap().remove(0);
        assert_eq!((table.rows, table.cols), (2, 3));
        assert_eq!(table.cell(1, 1).value, "");
        assert_eq!(table.cell(1, 2), &TableCell::default());
    }

    #[test]
    fn sanitize_clamps_spans_and_passes_original_value_through() {
        let cell = sanitize_cell(&json!({"value": "v", "colspan": 0, "rowspan": 3, "originalValue": "o"}));
        assert_eq!(cell.colspan, 1);
        assert_eq!(cell.rowspan, 3);
        assert_eq!(cell.original_value.as_deref(), Some("o"));

        let blank = sanitize_cell(&json!("not an object"));
        assert_eq!(blank, TableCell::default());
    }

    #[test]
    fn exported_envelope_round_trips_through_import() {
        let mut table = Table::create_empty("Budget", 2, 2);
        table.set_cell_value(0, 0, "total");
        let envelope = export_envelope(vec![table.clone()]);
        assert_eq!(envelope.version, EXPORT_VERSION);

        let raw: Value = serde_json::from_str(&envelope_to_json(&envelope)).unwrap();
        let reimported = parse_import(&raw).unwrap().remove(0);
        assert_ne!(reimported.id, table.id);
        assert_eq!(reimported.name, "Budget");
        assert_eq!(reimported.data, table.data);
    }

    #[test]
    fn html_export_skips_merged_cells_and_escapes_text() {
        let mut table = Table::create_empty("T", 2, 2);
        table.set_cell_value(0, 0, "a & b");
        table.data[0][0].colspan = 2;
        table.data[0][1].merged = true;
        table.set_cell_value(1, 0, "<script>");

        let html = to_html(&table);
        assert!(html.contains("<td colspan=\"2\">a &amp; b</td>"));
        assert!(html.contains("&lt;script&gt;"));
        // one td in the first row, two in the second
        assert_eq!(html.matches("<td").count(), 3);
        assert!(!html.contains("rowspan"));
    }
}
