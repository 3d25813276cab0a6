//! Merge/split operations over a table's cell grid.

use log::debug;

use crate::selection::MergeRange;
use crate::table::Table;

/// Merge the cells of `range` into the top-left anchor cell.
///
/// Values of unmerged, non-empty cells are collected in row-major order and
/// joined with single spaces to form the anchor's new value. Every covered
/// cell snapshots its pre-merge value into `original_value` the first time
/// it is merged; repeated merges never overwrite an earlier snapshot, which
/// also makes re-merging the same range idempotent.
///
/// `range` bounds are the caller's contract; coordinates outside the grid
/// panic.
pub fn merge_cells(table: &mut Table, range: MergeRange) {
    let mut merged_values: Vec<String> = Vec::new();
    for r in range.start_row..=range.end_row {
        for c in range.start_col..=range.end_col {
            let cell = &mut table.data[r][c];
            if cell.original_value.is_none() {
                cell.original_value = Some(cell.value.clone());
            }
            if !cell.merged && !cell.value.is_empty() {
                merged_values.push(cell.value.clone());
            }
        }
    }

    let anchor = &mut table.data[range.start_row][range.start_col];
    anchor.rowspan = range.rowspan();
    anchor.colspan = range.colspan();
    anchor.value = merged_values.join(" ");
    anchor.merged = false;

    for r in range.start_row..=range.end_row {
        for c in range.start_col..=range.end_col {
            if r == range.start_row && c == range.start_col {
                continue;
            }
            let cell = &mut table.data[r][c];
            cell.merged = true;
            cell.colspan = 1;
            cell.rowspan = 1;
        }
    }

    debug!(
        "merged {}x{} cells at ({}, {}) in table {}",
        range.rowspan(),
        range.colspan(),
        range.start_row,
        range.start_col,
        table.id
    );
    table.touch();
}

/// Inverse of [`merge_cells`]: reset every span in `range` to 1x1, clear the
/// merged flags, and restore each cell's snapshotted value. Snapshots are
/// left in place, so a later re-merge does not capture the restored values
/// again.
pub fn unmerge_cells(table: &mut Table, range: MergeRange) {
    for r in range.start_row..=range.end_row {
        for c in range.start_col..=range.end_col {
            let cell = &mut table.data[r][c];
            cell.merged = false;
            cell.colspan = 1;
            cell.rowspan = 1;
            if let Some(original) = &cell.original_value {
                cell.value = original.clone();
            }
        }
    }
    table.touch();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;
    use pretty_assertions::assert_eq;

    fn numbered_table(rows: usize, cols: usize) -> Table {
        let mut table = Table::create_empty("T", rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                table.data[r][c].value = format!("r{r}c{c}");
            }
        }
        table
    }

    fn range(sr: usize, sc: usize, er: usize, ec: usize) -> MergeRange {
        MergeRange {
            start_row: sr,
            start_col: sc,
            end_row: er,
            end_col: ec,
        }
    }

    #[test]
    fn merge_joins_values_and_marks_covered_cells() {
        let mut table = numbered_table(3, 3);
        merge_cells(&mut table, range(0, 0, 1, 1));

        let anchor = table.cell(0, 0);
        assert_eq!(anchor.value, "r0c0 r0c1 r1c0 r1c1");
        assert_eq!(anchor.rowspan, 2);
        assert_eq!(anchor.colspan, 2);
        assert!(!anchor.merged);

        for (r, c) in [(0, 1), (1, 0), (1, 1)] {
            let cell = table.cell(r, c);
            assert!(cell.merged);
            assert_eq!(cell.colspan, 1);
            assert_eq!(cell.rowspan, 1);
        }

        // cells outside the range are untouched
        assert_eq!(table.cell(2, 2).value, "r2c2");
        assert!(!table.cell(0, 2).merged);
    }

    #[test]
    fn merge_skips_empty_values() {
        let mut table = numbered_table(2, 2);
        table.data[0][1].value.clear();
        merge_cells(&mut table, range(0, 0, 1, 1));
        assert_eq!(table.cell(0, 0).value, "r0c0 r1c0 r1c1");
    }

    #[test]
    fn merging_twice_is_idempotent() {
        let mut table = numbered_table(2, 2);
        merge_cells(&mut table, range(0, 0, 1, 1));
        let once = table.cell(0, 0).value.clone();

        merge_cells(&mut table, range(0, 0, 1, 1));
        assert_eq!(table.cell(0, 0).value, once);
    }

    #[test]
    fn merge_then_unmerge_restores_every_value() {
        let mut table = numbered_table(3, 3);
        let region = range(0, 0, 1, 1);

        merge_cells(&mut table, region);
        unmerge_cells(&mut table, region);

        for r in 0..2 {
            for c in 0..2 {
                let cell = table.cell(r, c);
                assert_eq!(cell.value, format!("r{r}c{c}"));
                assert_eq!(cell.colspan, 1);
                assert_eq!(cell.rowspan, 1);
                assert!(!cell.merged);
            }
        }
    }

    #[test]
    fn single_cell_merge_is_a_legal_noop() {
        let mut table = numbered_table(2, 2);
        merge_cells(&mut table, range(1, 1, 1, 1));

        let cell = table.cell(1, 1);
        assert_eq!(cell.colspan, 1);
        assert_eq!(cell.rowspan, 1);
        assert_eq!(cell.value, "r1c1");
        assert_eq!(cell.original_value.as_deref(), Some("r1c1"));
    }

    #[test]
    fn snapshots_survive_an_expanding_remerge() {
        let mut table = numbered_table(2, 3);
        merge_cells(&mut table, range(0, 0, 0, 1));
        // the wider merge sees the joined anchor value but must keep the
        // per-cell snapshots taken by the first merge
        merge_cells(&mut table, range(0, 0, 0, 2));

        assert_eq!(table.cell(0, 0).value, "r0c0 r0c1 r0c2");
        assert_eq!(table.cell(0, 1).original_value.as_deref(), Some("r0c1"));

        unmerge_cells(&mut table, range(0, 0, 0, 2));
        assert_eq!(table.cell(0, 0).value, "r0c0");
        assert_eq!(table.cell(0, 1).value, "r0c1");
        assert_eq!(table.cell(0, 2).value, "r0c2");
    }

    #[test]
    fn unmerge_keeps_snapshots_so_remerge_does_not_resnapshot() {
        let mut table = numbered_table(2, 2);
        let region = range(0, 0, 1, 1);

        merge_cells(&mut table, region);
        unmerge_cells(&mut table, region);
        table.data[0][0].value = "edited".to_string();
        merge_cells(&mut table, region);
        unmerge_cells(&mut table, region);

        // the first snapshot wins over the later edit
        assert_eq!(table.cell(0, 0).value, "r0c0");
    }
}
