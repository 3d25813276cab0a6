//! Table-editing core for a browser host: grid model, selection algebra,
//! merge/split engine, and import/export with defensive sanitization.

pub mod editor;
pub mod error;
pub mod files;
pub mod grid;
pub mod ident;
pub mod import_export;
pub mod manager;
pub mod ops;
pub mod selection;
pub mod status;
pub mod table;

use serde::Serialize;

pub use editor::{EditorRegistry, EditorState};
pub use error::{Error, Result};
pub use grid::{GridPosition, MAX_GRID_SIZE};
pub use import_export::{ExportData, EXPORT_VERSION};
pub use manager::TableManager;
pub use selection::{MergeRange, SelectionState};
pub use status::{StatusKind, StatusMessage};
pub use table::{Table, TableCell};

use files::{Clipboard, FileSaver};

/// What changed in the workspace. The host drains these after each call and
/// re-renders what they name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum WorkspaceEvent {
    TableCreated(String),
    TableDeleted(String),
    TableRenamed(String),
    TableUpdated(String),
    CurrentChanged(Option<String>),
    TablesImported(usize),
    TablesCleared,
    SelectionChanged,
}

/// Facade owning the table collection, the drag selection, and the event
/// queue. Mutations happen through explicit methods; nothing notifies the
/// host implicitly.
#[derive(Debug, Default)]
pub struct TableWorkspace {
    pub manager: TableManager,
    pub selection: SelectionState,
    events: Vec<WorkspaceEvent>,
    last_status: Option<StatusMessage>,
}

impl TableWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    // Table lifecycle

    pub fn create_table(&mut self, name: &str, rows: usize, cols: usize) -> String {
        let id = self.manager.create_table(name, rows, cols);
        self.events.push(WorkspaceEvent::TableCreated(id.clone()));
        self.events
            .push(WorkspaceEvent::CurrentChanged(Some(id.clone())));
        id
    }

    pub fn delete_table(&mut self, id: &str) -> bool {
        if !self.manager.delete_table(id) {
            return false;
        }
        self.events.push(WorkspaceEvent::TableDeleted(id.to_string()));
        self.events.push(WorkspaceEvent::CurrentChanged(
            self.manager.current_table_id().map(str::to_owned),
        ));
        true
    }

    pub fn rename_table(&mut self, id: &str, new_name: &str) -> bool {
        if !self.manager.rename_table(id, new_name) {
            return false;
        }
        self.events.push(WorkspaceEvent::TableRenamed(id.to_string()));
        true
    }

    pub fn duplicate_table(&mut self, id: &str) -> Option<String> {
        let copy_id = self.manager.duplicate_table(id)?;
        self.events
            .push(WorkspaceEvent::TableCreated(copy_id.clone()));
        self.events
            .push(WorkspaceEvent::CurrentChanged(Some(copy_id.clone())));
        Some(copy_id)
    }

    pub fn switch_table(&mut self, id: &str) -> bool {
        if !self.manager.switch_table(id) {
            return false;
        }
        self.events
            .push(WorkspaceEvent::CurrentChanged(Some(id.to_string())));
        true
    }

    pub fn clear_all(&mut self) {
        self.manager.clear_all();
        self.selection.clear();
        self.events.push(WorkspaceEvent::TablesCleared);
        self.events.push(WorkspaceEvent::CurrentChanged(None));
    }

    /// Edit one cell of the current table. Out-of-range coordinates and a
    /// missing current table are rejected.
    pub fn set_cell_value(&mut self, row: usize, col: usize, value: &str) -> bool {
        let Some(table) = self.manager.current_table_mut() else {
            return false;
        };
        if row >= table.rows || col >= table.cols {
            return false;
        }
        table.set_cell_value(row, col, value);
        let id = table.id.clone();
        self.events.push(WorkspaceEvent::TableUpdated(id));
        true
    }

    // Selection gestures

    pub fn start_selection(&mut self, row: usize, col: usize) {
        self.selection.start(row, col);
        self.events.push(WorkspaceEvent::SelectionChanged);
    }

    pub fn move_selection(&mut self, row: usize, col: usize) {
        if self.selection.is_selecting() {
            self.selection.move_to(row, col);
            self.events.push(WorkspaceEvent::SelectionChanged);
        }
    }

    pub fn end_selection(&mut self) {
        self.selection.finish();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.events.push(WorkspaceEvent::SelectionChanged);
    }

    // Merge / split

    /// Merge the currently selected range into its anchor cell. Rejected
    /// without a selection, without a current table, or when the selection
    /// reaches outside the table.
    pub fn merge_selection(&mut self) -> bool {
        let Some(range) = self.selection.range() else {
            return false;
        };
        let Some(table) = self.manager.current_table_mut() else {
            return false;
        };
        if range.end_row >= table.rows || range.end_col >= table.cols {
            return false;
        }
        let id = table.id.clone();
        ops::merge_cells(table, range);
        self.events.push(WorkspaceEvent::TableUpdated(id));
        self.set_status(StatusMessage::success("Cells merged"));
        true
    }

    /// Split the currently selected range back into 1x1 cells, restoring
    /// snapshotted values.
    pub fn unmerge_selection(&mut self) -> bool {
        let Some(range) = self.selection.range() else {
            return false;
        };
        let Some(table) = self.manager.current_table_mut() else {
            return false;
        };
        if range.end_row >= table.rows || range.end_col >= table.cols {
            return false;
        }
        let id = table.id.clone();
        ops::unmerge_cells(table, range);
        self.events.push(WorkspaceEvent::TableUpdated(id));
        self.set_status(StatusMessage::success("Cells unmerged"));
        true
    }

    // Export / import

    pub fn export_current(&mut self, saver: &mut dyn FileSaver) -> bool {
        let ok = match self.manager.current_table() {
            Some(table) => files::export_table(saver, table),
            None => false,
        };
        self.set_status(if ok {
            StatusMessage::success("Table exported")
        } else {
            StatusMessage::error("No table to export")
        });
        ok
    }

    pub fn export_all(&mut self, saver: &mut dyn FileSaver) -> bool {
        let ok = files::export_all_tables(saver, self.manager.tables());
        self.set_status(if ok {
            StatusMessage::success("All tables exported")
        } else {
            StatusMessage::error("No tables to export")
        });
        ok
    }

    pub fn copy_current_json(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        let ok = match self.manager.current_table() {
            Some(table) => files::copy_table_json(clipboard, table),
            None => false,
        };
        self.set_status(if ok {
            StatusMessage::success("Table JSON copied")
        } else {
            StatusMessage::error("Could not copy table JSON")
        });
        ok
    }

    /// Parse file text and add every sanitized table to the collection.
    /// Either all tables land or none do.
    pub fn import_json_text(&mut self, text: &str) -> Result<usize> {
        match self.try_import(text) {
            Ok(count) => {
                self.set_status(StatusMessage::success(format!("Imported {count} table(s)")));
                Ok(count)
            }
            Err(err) => {
                self.set_status(StatusMessage::error(format!("Import failed: {err}")));
                Err(err)
            }
        }
    }

    fn try_import(&mut self, text: &str) -> Result<usize> {
        let raw = files::read_json_text(text)?;
        let tables = import_export::parse_import(&raw)?;
        let count = self.manager.add_imported(tables);
        self.events.push(WorkspaceEvent::TablesImported(count));
        Ok(count)
    }

    // Host plumbing

    pub fn last_status(&self) -> Option<&StatusMessage> {
        self.last_status.as_ref()
    }

    /// Hand the queued events to the host, leaving the queue empty.
    pub fn take_events(&mut self) -> Vec<WorkspaceEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_status(&mut self, status: StatusMessage) {
        self.last_status = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mutations_queue_events_for_the_host() {
        let mut ws = TableWorkspace::new();
        let id = ws.create_table("A", 2, 2);

        let events = ws.take_events();
        assert_eq!(
            events,
            vec![
                WorkspaceEvent::TableCreated(id.clone()),
                WorkspaceEvent::CurrentChanged(Some(id)),
            ]
        );
        assert!(ws.take_events().is_empty());
    }

    #[test]
    fn merge_needs_a_selection_and_a_current_table() {
        let mut ws = TableWorkspace::new();
        assert!(!ws.merge_selection());

        ws.create_table("A", 2, 2);
        assert!(!ws.merge_selection());

        ws.start_selection(0, 0);
        ws.move_selection(1, 1);
        ws.end_selection();
        assert!(ws.merge_selection());
        assert_eq!(
            ws.manager.current_table().unwrap().cell(0, 0).colspan,
            2
        );
    }

    #[test]
    fn merge_rejects_a_selection_outside_the_table() {
        let mut ws = TableWorkspace::new();
        ws.create_table("A", 2, 2);
        ws.start_selection(0, 0);
        ws.move_selection(5, 5);
        ws.end_selection();
        assert!(!ws.merge_selection());
    }

    #[test]
    fn set_cell_value_checks_bounds() {
        let mut ws = TableWorkspace::new();
        assert!(!ws.set_cell_value(0, 0, "x"));

        ws.create_table("A", 2, 2);
        assert!(ws.set_cell_value(1, 1, "x"));
        assert!(!ws.set_cell_value(2, 0, "x"));
        assert_eq!(ws.manager.current_table().unwrap().cell(1, 1).value, "x");
    }

    #[test]
    fn failed_import_sets_an_error_status_and_adds_nothing() {
        let mut ws = TableWorkspace::new();
        assert!(ws.import_json_text("{\"foo\": 1}").is_err());
        assert!(ws.manager.is_empty());
        assert_eq!(ws.last_status().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn successful_import_reports_success() {
        let mut ws = TableWorkspace::new();
        let count = ws
            .import_json_text("{\"data\": [[{\"value\": \"a\"}]]}")
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(ws.manager.len(), 1);
        assert_eq!(ws.last_status().unwrap().kind, StatusKind::Success);
        assert!(ws
            .take_events()
            .contains(&WorkspaceEvent::TablesImported(1)));
    }

    #[test]
    fn events_serialize_for_the_wasm_boundary() {
        let json = serde_json::to_value(WorkspaceEvent::TableCreated("t1".to_string())).unwrap();
        assert_eq!(json["type"], "tableCreated");
        assert_eq!(json["value"], "t1");

        let cleared = serde_json::to_value(WorkspaceEvent::TablesCleared).unwrap();
        assert_eq!(cleared["type"], "tablesCleared");
    }
}
