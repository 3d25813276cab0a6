//! Table collection lifecycle: create, switch, rename, duplicate, import.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::table::Table;

/// Ordered collection of tables with a single "current" pointer. Tables are
/// owned exclusively by the manager; lookups go through their ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableManager {
    tables: Vec<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_table_id: Option<String>,
}

impl TableManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn current_table_id(&self) -> Option<&str> {
        self.current_table_id.as_deref()
    }

    pub fn current_table(&self) -> Option<&Table> {
        let id = self.current_table_id.as_deref()?;
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn current_table_mut(&mut self) -> Option<&mut Table> {
        let id = self.current_table_id.clone()?;
        self.tables.iter_mut().find(|t| t.id == id)
    }

    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn table_mut(&mut self, id: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id == id)
    }

    /// Create an empty table, make it current, and return its id.
    pub fn create_table(&mut self, name: &str, rows: usize, cols: usize) -> String {
        let table = Table::create_empty(name, rows, cols);
        let id = table.id.clone();
        self.tables.push(table);
        self.current_table_id = Some(id.clone());
        debug!("created table {id} ({rows}x{cols})");
        id
    }

    /// Remove a table. When the current table is deleted, the first
    /// remaining table becomes current (or none is left current).
    pub fn delete_table(&mut self, id: &str) -> bool {
        let Some(index) = self.tables.iter().position(|t| t.id == id) else {
            return false;
        };
        self.tables.remove(index);
        if self.current_table_id.as_deref() == Some(id) {
            self.current_table_id = self.tables.first().map(|t| t.id.clone());
        }
        true
    }

    /// Rename a table. The name is trimmed; an empty result is rejected.
    pub fn rename_table(&mut self, id: &str, new_name: &str) -> bool {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return false;
        }
        let Some(table) = self.table_mut(id) else {
            return false;
        };
        table.name = trimmed.to_string();
        table.touch();
        true
    }

    /// Deep-copy a table, make the copy current, and return its id.
    pub fn duplicate_table(&mut self, id: &str) -> Option<String> {
        let copy = self.table(id)?.duplicate(None);
        let copy_id = copy.id.clone();
        self.tables.push(copy);
        self.current_table_id = Some(copy_id.clone());
        Some(copy_id)
    }

    pub fn switch_table(&mut self, id: &str) -> bool {
        if self.table(id).is_none() {
            return false;
        }
        self.current_table_id = Some(id.to_string());
        true
    }

    /// Replace the stored table carrying the same id and refresh its
    /// `updated_at`.
    pub fn update_table(&mut self, table: Table) -> bool {
        let Some(slot) = self.tables.iter_mut().find(|t| t.id == table.id) else {
            return false;
        };
        *slot = table;
        slot.touch();
        true
    }

    /// Append already-sanitized imported tables. The first import becomes
    /// current when nothing was current before.
    pub fn add_imported(&mut self, tables: Vec<Table>) -> usize {
        let count = tables.len();
        let first_id = tables.first().map(|t| t.id.clone());
        self.tables.extend(tables);
        if self.current_table_id.is_none() {
            self.current_table_id = first_id;
        }
        count
    }

    pub fn clear_all(&mut self) {
        self.tables.clear();
        self.current_table_id = None;
    }

    /// Serialize the whole manager state to a JSON string the host can put
    /// in local storage.
    pub fn snapshot(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Rebuild a manager from a [`snapshot`] string. A dangling current
    /// pointer is redirected to the first table.
    ///
    /// [`snapshot`]: TableManager::snapshot
    pub fn restore(json: &str) -> Result<Self> {
        let mut manager: TableManager =
            serde_json::from_str(json).map_err(|err| Error::InvalidFormat(err.to_string()))?;
        if let Some(id) = manager.current_table_id.clone() {
            if manager.table(&id).is_none() {
                manager.current_table_id = manager.tables.first().map(|t| t.id.clone());
            }
        }
        Ok(manager)
    }
}
