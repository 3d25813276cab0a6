//! Cell-range selection state for drag gestures.

use serde::{Deserialize, Serialize};

/// Normalized closed rectangular cell range; all four bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRange {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl MergeRange {
    /// Normalize two corner coordinates into a range, regardless of which
    /// corner is which.
    pub fn from_corners(a: (usize, usize), b: (usize, usize)) -> Self {
        Self {
            start_row: a.0.min(b.0),
            start_col: a.1.min(b.1),
            end_row: a.0.max(b.0),
            end_col: a.1.max(b.1),
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    pub fn rowspan(&self) -> u32 {
        (self.end_row - self.start_row + 1) as u32
    }

    pub fn colspan(&self) -> u32 {
        (self.end_col - self.start_col + 1) as u32
    }
}

/// Transient drag state: the anchor corner stays put while the focus corner
/// follows the pointer. Either both corners are set or neither is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    start: Option<(usize, usize)>,
    end: Option<(usize, usize)>,
    is_selecting: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a drag at (row, col); both corners collapse onto it.
    pub fn start(&mut self, row: usize, col: usize) {
        self.start = Some((row, col));
        self.end = Some((row, col));
        self.is_selecting = true;
    }

    /// Track the pointer. Ignored unless a drag is active.
    pub fn move_to(&mut self, row: usize, col: usize) {
        if self.is_selecting && self.start.is_some() {
            self.end = Some((row, col));
        }
    }

    /// Release the pointer. The selected corners persist until [`clear`]
    /// or the next [`start`].
    ///
    /// [`clear`]: SelectionState::clear
    /// [`start`]: SelectionState::start
    pub fn finish(&mut self) {
        self.is_selecting = false;
    }

    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
        self.is_selecting = false;
    }

    pub fn is_selecting(&self) -> bool {
        self.is_selecting
    }

    pub fn has_selection(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// True when the selection spans more than one cell.
    pub fn is_multi_cell(&self) -> bool {
        match (self.start, self.end) {
            (Some(s), Some(e)) => s != e,
            _ => false,
        }
    }

    /// The normalized rectangle between the two corners, if any.
    pub fn range(&self) -> Option<MergeRange> {
        match (self.start, self.end) {
            (Some(s), Some(e)) => Some(MergeRange::from_corners(s, e)),
            _ => None,
        }
    }

    /// Whether (row, col) lies inside the current selection rectangle.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.range().map_or(false, |r| r.contains(row, col))
    }
}
