//! Linear-index addressing for the table size-picker grid.

use serde::{Deserialize, Serialize};

/// Default edge length of the size-picker grid.
pub const MAX_GRID_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

/// Map a linear cell index to (row, col) within a `max_grid_size`-wide grid.
pub fn grid_position(index: usize, max_grid_size: usize) -> GridPosition {
    GridPosition {
        row: index / max_grid_size,
        col: index % max_grid_size,
    }
}

/// Whether the picker cell at `index` falls inside the hovered
/// `selected_rows` x `selected_cols` highlight.
pub fn is_grid_cell_selected(
    index: usize,
    selected_rows: usize,
    selected_cols: usize,
    max_grid_size: usize,
) -> bool {
    let pos = grid_position(index, max_grid_size);
    pos.row < selected_rows && pos.col < selected_cols
}
