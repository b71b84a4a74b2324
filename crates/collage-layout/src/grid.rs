//! Grid descriptor and rectangle arithmetic.
//!
//! All positions are linear row-major indices: `p = row * columns + col`.
//! A rectangle is stored by its anchor (top-left) cell plus spans, and is
//! expanded into a [`GridArea`] whenever bounds or overlap are tested.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest number of rows or columns a grid may have.
pub const MAX_EXTENT: usize = 20;

/// Row/column extent of a collage grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    /// Number of rows (1 to [`MAX_EXTENT`])
    pub rows: usize,
    /// Number of columns (1 to [`MAX_EXTENT`])
    pub columns: usize,
}

impl Default for GridDims {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl GridDims {
    /// Create grid dimensions, clamping each count into `1..=MAX_EXTENT`.
    #[must_use]
    pub const fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows: clamp_extent(rows),
            columns: clamp_extent(columns),
        }
    }

    /// Whether both counts lie in `1..=MAX_EXTENT`.
    ///
    /// Deserialized dims bypass [`Self::new`], so loaders check this before
    /// building anything sized by the grid.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.rows >= 1 && self.rows <= MAX_EXTENT && self.columns >= 1 && self.columns <= MAX_EXTENT
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows.saturating_mul(self.columns)
    }

    /// Row of a linear position.
    #[must_use]
    pub const fn row_of(&self, position: usize) -> usize {
        position / self.columns
    }

    /// Column of a linear position.
    #[must_use]
    pub const fn col_of(&self, position: usize) -> usize {
        position % self.columns
    }

    /// Linear position of a (row, col) pair.
    #[must_use]
    pub const fn position(&self, row: usize, col: usize) -> usize {
        row * self.columns + col
    }

    /// Number of lines along an axis.
    #[must_use]
    pub const fn count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.rows,
            Axis::Column => self.columns,
        }
    }

    /// Rectangle anchored at `position` with the given spans.
    #[must_use]
    pub const fn area(&self, position: usize, row_span: usize, col_span: usize) -> GridArea {
        GridArea::from_anchor(position, row_span, col_span, self.columns)
    }

    /// Whether an area is non-empty and lies entirely inside the grid.
    #[must_use]
    pub const fn contains(&self, area: &GridArea) -> bool {
        !area.is_empty() && area.row_end <= self.rows && area.col_end <= self.columns
    }
}

const fn clamp_extent(count: usize) -> usize {
    if count == 0 {
        1
    } else if count > MAX_EXTENT {
        MAX_EXTENT
    } else {
        count
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// A grid axis, used by structural edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal line of cells
    Row,
    /// Vertical line of cells
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => f.write_str("row"),
            Self::Column => f.write_str("column"),
        }
    }
}

/// A rectangular area spanning rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridArea {
    /// Starting row (0-indexed)
    pub row_start: usize,
    /// Ending row (exclusive)
    pub row_end: usize,
    /// Starting column (0-indexed)
    pub col_start: usize,
    /// Ending column (exclusive)
    pub col_end: usize,
}

impl GridArea {
    /// Create a new grid area.
    #[must_use]
    pub const fn new(row_start: usize, col_start: usize, row_end: usize, col_end: usize) -> Self {
        Self {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    /// Create a single-cell area.
    #[must_use]
    pub const fn cell(row: usize, col: usize) -> Self {
        Self::new(row, col, row + 1, col + 1)
    }

    /// Area anchored at a linear position under the given column stride.
    ///
    /// Ends saturate at `usize::MAX`, which no grid contains, so an
    /// oversized span is reported as out of bounds.
    #[must_use]
    pub const fn from_anchor(
        position: usize,
        row_span: usize,
        col_span: usize,
        columns: usize,
    ) -> Self {
        let row = position / columns;
        let col = position % columns;
        Self::new(row, col, row.saturating_add(row_span), col.saturating_add(col_span))
    }

    /// Get the number of rows this area spans.
    #[must_use]
    pub const fn row_span_count(&self) -> usize {
        self.row_end.saturating_sub(self.row_start)
    }

    /// Get the number of columns this area spans.
    #[must_use]
    pub const fn col_span_count(&self) -> usize {
        self.col_end.saturating_sub(self.col_start)
    }

    /// Whether the area covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.row_span_count() == 0 || self.col_span_count() == 0
    }

    /// Linear position of the top-left cell under a column stride.
    #[must_use]
    pub const fn anchor(&self, columns: usize) -> usize {
        self.row_start * columns + self.col_start
    }

    /// Whether the area covers the given cell.
    #[must_use]
    pub const fn contains_cell(&self, row: usize, col: usize) -> bool {
        row >= self.row_start && row < self.row_end && col >= self.col_start && col < self.col_end
    }

    /// Whether two areas share at least one cell.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.row_start < other.row_end
            && other.row_start < self.row_end
            && self.col_start < other.col_end
            && other.col_start < self.col_end
    }

    /// Whether the area covers any cell of the given row or column.
    #[must_use]
    pub const fn crosses(&self, axis: Axis, index: usize) -> bool {
        match axis {
            Axis::Row => index >= self.row_start && index < self.row_end,
            Axis::Column => index >= self.col_start && index < self.col_end,
        }
    }

    /// Linear indices of every covered cell, ascending.
    #[must_use]
    pub fn cells(&self, columns: usize) -> Vec<usize> {
        let mut cells = Vec::with_capacity(self.row_span_count() * self.col_span_count());
        for row in self.row_start..self.row_end {
            for col in self.col_start..self.col_end {
                cells.push(row * columns + col);
            }
        }
        cells
    }
}

impl fmt::Display for GridArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows {}..{}, cols {}..{}",
            self.row_start, self.row_end, self.col_start, self.col_end
        )
    }
}

/// Linear indices covered by a rectangle, ascending.
///
/// Cells past the right edge are not wrapped onto the next row; callers
/// validate bounds before trusting the result.
#[must_use]
pub fn covered_cells(position: usize, row_span: usize, col_span: usize, columns: usize) -> Vec<usize> {
    GridArea::from_anchor(position, row_span, col_span, columns.max(1)).cells(columns.max(1))
}
