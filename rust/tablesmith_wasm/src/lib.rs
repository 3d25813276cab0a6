use tablesmith_core::{files, grid, import_export, TableWorkspace};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct TableEditor {
    core: TableWorkspace,
}

#[wasm_bindgen]
impl TableEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> TableEditor {
        TableEditor {
            core: TableWorkspace::new(),
        }
    }

    /// Rebuild an editor from a manager snapshot; a corrupt snapshot yields
    /// an empty editor.
    pub fn from_snapshot(json: String) -> TableEditor {
        let mut editor = TableEditor::new();
        if let Ok(manager) = tablesmith_core::TableManager::restore(&json) {
            editor.core.manager = manager;
        }
        editor
    }

    // Table lifecycle
    pub fn create_table(&mut self, name: String, rows: u32, cols: u32) -> String {
        self.core.create_table(&name, rows as usize, cols as usize)
    }
    pub fn delete_table(&mut self, id: String) -> bool {
        self.core.delete_table(&id)
    }
    pub fn rename_table(&mut self, id: String, name: String) -> bool {
        self.core.rename_table(&id, &name)
    }
    pub fn duplicate_table(&mut self, id: String) -> Option<String> {
        self.core.duplicate_table(&id)
    }
    pub fn switch_table(&mut self, id: String) -> bool {
        self.core.switch_table(&id)
    }
    pub fn clear_all(&mut self) {
        self.core.clear_all()
    }
    pub fn table_count(&self) -> u32 {
        self.core.manager.len() as u32
    }
    pub fn current_table_id(&self) -> Option<String> {
        self.core.manager.current_table_id().map(str::to_owned)
    }

    pub fn current_table_json(&self) -> String {
        self.core
            .manager
            .current_table()
            .and_then(|t| serde_json::to_string(t).ok())
            .unwrap_or_else(|| "null".to_string())
    }

    pub fn current_table_html(&self) -> String {
        self.core
            .manager
            .current_table()
            .map(import_export::to_html)
            .unwrap_or_default()
    }

    pub fn set_cell_value(&mut self, row: u32, col: u32, value: String) -> bool {
        self.core.set_cell_value(row as usize, col as usize, &value)
    }

    // Selection gestures
    pub fn start_selection(&mut self, row: u32, col: u32) {
        self.core.start_selection(row as usize, col as usize)
    }
    pub fn move_selection(&mut self, row: u32, col: u32) {
        self.core.move_selection(row as usize, col as usize)
    }
    pub fn end_selection(&mut self) {
        self.core.end_selection()
    }
    pub fn clear_selection(&mut self) {
        self.core.clear_selection()
    }
    pub fn is_cell_selected(&self, row: u32, col: u32) -> bool {
        self.core.selection.contains(row as usize, col as usize)
    }
    pub fn is_multi_cell_selection(&self) -> bool {
        self.core.selection.is_multi_cell()
    }

    pub fn selection_range_json(&self) -> String {
        self.core
            .selection
            .range()
            .and_then(|r| serde_json::to_string(&r).ok())
            .unwrap_or_else(|| "null".to_string())
    }

    // Merge / split
    pub fn merge_selection(&mut self) -> bool {
        self.core.merge_selection()
    }
    pub fn unmerge_selection(&mut self) -> bool {
        self.core.unmerge_selection()
    }

    // Export / import. The JS host owns the download and clipboard calls;
    // it gets the envelope JSON and a suggested filename from here.
    pub fn export_current_json(&self) -> String {
        match self.core.manager.current_table() {
            Some(table) => import_export::envelope_to_json(&import_export::export_envelope(vec![
                table.clone(),
            ])),
            None => "null".to_string(),
        }
    }

    pub fn export_all_json(&self) -> String {
        import_export::envelope_to_json(&import_export::export_envelope(
            self.core.manager.tables().to_vec(),
        ))
    }

    pub fn export_filename(&self, base_name: String) -> String {
        files::generate_filename(&base_name, "json")
    }

    /// Import file text; the number of tables added, or none on failure.
    /// The outcome message is available from `last_status_json`.
    pub fn import_json(&mut self, text: String) -> Option<u32> {
        self.core.import_json_text(&text).ok().map(|n| n as u32)
    }

    // Host plumbing
    pub fn last_status_json(&self) -> String {
        self.core
            .last_status()
            .and_then(|s| serde_json::to_string(s).ok())
            .unwrap_or_else(|| "null".to_string())
    }

    pub fn take_events_json(&mut self) -> String {
        serde_json::to_string(&self.core.take_events()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn snapshot(&self) -> String {
        self.core.manager.snapshot()
    }
}

impl Default for TableEditor {
    fn default() -> Self {
        Self::new()
    }
}

/// Picker-grid helper for the size chooser overlay.
#[wasm_bindgen]
pub fn grid_cell_selected(
    index: u32,
    selected_rows: u32,
    selected_cols: u32,
    max_grid_size: u32,
) -> bool {
    grid::is_grid_cell_selected(
        index as usize,
        selected_rows as usize,
        selected_cols as usize,
        max_grid_size as usize,
    )
}
