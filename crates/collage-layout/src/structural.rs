//! Structural edits: inserting and removing whole rows and columns.
//!
//! Every entity is renumbered under the new stride. Insertion fails only at
//! the extent limit; removal refuses rather than deleting content on the line.

use crate::engine::{rejected, CollageGrid};
use crate::error::LayoutError;
use crate::grid::{Axis, GridArea, GridDims, MAX_EXTENT};
use tracing::debug;

/// Remap an anchor from `old` to `new` dims, shifting the line at `index`.
///
/// `shift` is +1 for insertion and -1 for removal; anchors on or past the
/// line (for insertion) or strictly past it (for removal) move by `shift`.
fn remap(position: usize, old: GridDims, new: GridDims, axis: Axis, index: usize, shift: isize) -> usize {
    let (mut row, mut col) = (old.row_of(position), old.col_of(position));
    let line = match axis {
        Axis::Row => &mut row,
        Axis::Column => &mut col,
    };
    let moves = if shift > 0 { *line >= index } else { *line > index };
    if moves {
        *line = line.saturating_add_signed(shift);
    }
    new.position(row, col)
}

impl CollageGrid {
    /// Insert an empty row before `index` (clamped to `rows`).
    pub fn insert_row(&mut self, index: usize) -> Result<(), LayoutError> {
        self.insert_line(Axis::Row, index)
    }

    /// Insert an empty column before `index` (clamped to `columns`).
    pub fn insert_column(&mut self, index: usize) -> Result<(), LayoutError> {
        self.insert_line(Axis::Column, index)
    }

    /// Remove row `index`; refuses if any entity touches it.
    pub fn remove_row(&mut self, index: usize) -> Result<(), LayoutError> {
        self.remove_line(Axis::Row, index)
    }

    /// Remove column `index`; refuses if any entity touches it.
    pub fn remove_column(&mut self, index: usize) -> Result<(), LayoutError> {
        self.remove_line(Axis::Column, index)
    }

    fn insert_line(&mut self, axis: Axis, index: usize) -> Result<(), LayoutError> {
        let old = self.dims;
        if old.count(axis) >= MAX_EXTENT {
            return Err(rejected(
                "insert",
                LayoutError::LimitExceeded {
                    axis,
                    limit: MAX_EXTENT,
                },
            ));
        }
        let index = index.min(old.count(axis));
        let new = match axis {
            Axis::Row => GridDims::new(old.rows + 1, old.columns),
            Axis::Column => GridDims::new(old.rows, old.columns + 1),
        };
        self.renumber(old, new, axis, index, 1);
        debug!(%axis, index, dims = %new, "Inserted line");
        Ok(())
    }

    fn remove_line(&mut self, axis: Axis, index: usize) -> Result<(), LayoutError> {
        let old = self.dims;
        let count = old.count(axis);
        if count <= 1 {
            return Err(rejected("remove", LayoutError::LastRemaining(axis)));
        }
        if index >= count {
            let area = match axis {
                Axis::Row => GridArea::new(index, 0, index.saturating_add(1), old.columns),
                Axis::Column => GridArea::new(0, index, old.rows, index.saturating_add(1)),
            };
            return Err(rejected(
                "remove",
                LayoutError::OutOfBounds {
                    area,
                    rows: old.rows,
                    columns: old.columns,
                },
            ));
        }

        let columns = old.columns;
        let blocked = self.items.iter().any(|i| i.area(columns).crosses(axis, index))
            || self
                .placeholders
                .iter()
                .any(|p| p.area(columns).crosses(axis, index));
        if blocked {
            return Err(rejected("remove", LayoutError::NotEmpty { axis, index }));
        }

        let new = match axis {
            Axis::Row => GridDims::new(old.rows - 1, old.columns),
            Axis::Column => GridDims::new(old.rows, old.columns - 1),
        };
        self.renumber(old, new, axis, index, -1);
        debug!(%axis, index, dims = %new, "Removed line");
        Ok(())
    }

    fn renumber(&mut self, old: GridDims, new: GridDims, axis: Axis, index: usize, shift: isize) {
        for item in &mut self.items {
            item.position = remap(item.position, old, new, axis, index, shift);
        }
        for slot in &mut self.placeholders {
            slot.position = remap(slot.position, old, new, axis, index, shift);
        }
        self.dims = new;
    }
}
