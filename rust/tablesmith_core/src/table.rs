//! Table and cell model.

use serde::{Deserialize, Serialize};

use crate::ident::{new_table_id, now_iso};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_span")]
    pub colspan: u32,
    #[serde(default = "default_span")]
    pub rowspan: u32,
    /// True when this cell has been absorbed into another cell's span.
    /// The renderer should skip drawing it.
    #[serde(default)]
    pub merged: bool,
    /// Value the cell held before it was first merged; restored on unmerge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<String>,
}

fn default_span() -> u32 {
    1
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            value: String::new(),
            colspan: 1,
            rowspan: 1,
            merged: false,
            original_value: None,
        }
    }
}

impl TableCell {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }
}

/// A named 2D grid of cells. `data` is row-major; every row holds exactly
/// `cols` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<TableCell>>,
    pub created_at: String,
    pub updated_at: String,
}

impl Table {
    /// Build a `rows` x `cols` grid of blank, unmerged cells with a fresh id.
    pub fn create_empty(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        let now = now_iso();
        Self {
            id: new_table_id(),
            name: name.into(),
            rows,
            cols,
            data: (0..rows)
                .map(|_| (0..cols).map(|_| TableCell::default()).collect())
                .collect(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Deep copy with a fresh id and timestamps. The copy shares no cell
    /// storage with the original. The name defaults to `"<name> (Copy)"`.
    pub fn duplicate(&self, new_name: Option<&str>) -> Self {
        let now = now_iso();
        Self {
            id: new_table_id(),
            name: new_name
                .map(str::to_owned)
                .unwrap_or_else(|| format!("{} (Copy)", self.name)),
            rows: self.rows,
            cols: self.cols,
            data: self.data.clone(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> &TableCell {
        &self.data[row][col]
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut TableCell {
        &mut self.data[row][col]
    }

    /// Overwrite one cell's text and refresh `updated_at`.
    pub fn set_cell_value(&mut self, row: usize, col: usize, value: impl Into<String>) {
        self.data[row][col].value = value.into();
        self.touch();
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = now_iso();
    }
}
