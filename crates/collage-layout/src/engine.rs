//! The collage grid: dimensions plus the flat entity lists.
//!
//! Operations live in their own modules (`placement`, `structural`,
//! `template`, `fill`) as further `impl CollageGrid` blocks.

use crate::entity::{ItemId, Owner, PlacedItem, Placeholder, PlaceholderId};
use crate::error::LayoutError;
use crate::grid::GridDims;
use crate::occupancy::OccupancyIndex;
use tracing::debug;

/// Grid occupancy engine.
///
/// All mutation goes through `&mut self`; each operation computes its full
/// result from the pre-call state and commits only when every check passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollageGrid {
    pub(crate) dims: GridDims,
    pub(crate) items: Vec<PlacedItem>,
    pub(crate) placeholders: Vec<Placeholder>,
    pub(crate) next_id: u64,
}

impl Default for CollageGrid {
    fn default() -> Self {
        Self::new(GridDims::default())
    }
}

impl CollageGrid {
    /// Create an empty grid. Counts outside `1..=MAX_EXTENT` are clamped.
    #[must_use]
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims: GridDims::new(dims.rows, dims.columns),
            items: Vec::new(),
            placeholders: Vec::new(),
            next_id: 1,
        }
    }

    /// Create an empty grid of `rows` x `columns`.
    #[must_use]
    pub fn with_size(rows: usize, columns: usize) -> Self {
        Self::new(GridDims::new(rows, columns))
    }

    #[must_use]
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.dims.rows
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.dims.columns
    }

    /// Placed items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    /// Placeholders in creation order.
    #[must_use]
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&PlacedItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub(crate) fn item_index(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }

    /// Current occupancy index.
    #[must_use]
    pub fn occupancy(&self) -> OccupancyIndex {
        OccupancyIndex::build(self.dims, &self.items, &self.placeholders)
    }

    /// Owner of a cell, if any.
    #[must_use]
    pub fn owner_at(&self, position: usize) -> Option<Owner> {
        self.occupancy().owner_at(position)
    }

    /// Item whose rectangle covers a cell.
    #[must_use]
    pub fn item_at(&self, position: usize) -> Option<&PlacedItem> {
        let (row, col) = self.cell_coords(position)?;
        self.items
            .iter()
            .find(|i| i.area(self.dims.columns).contains_cell(row, col))
    }

    /// Placeholder whose rectangle covers a cell.
    #[must_use]
    pub fn placeholder_at(&self, position: usize) -> Option<&Placeholder> {
        let (row, col) = self.cell_coords(position)?;
        self.placeholders
            .iter()
            .find(|p| p.area(self.dims.columns).contains_cell(row, col))
    }

    /// Uncovered positions, ascending.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<usize> {
        self.occupancy().empty_cells()
    }

    /// Number of items plus placeholders.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.items.len() + self.placeholders.len()
    }

    /// Whether every cell is covered.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.occupancy().occupied_count() == self.dims.cell_count()
    }

    /// Remove every placeholder, leaving items untouched.
    ///
    /// Returns the number of placeholders removed.
    pub fn clear_placeholders(&mut self) -> usize {
        let removed = self.placeholders.len();
        self.placeholders.clear();
        debug!(removed, "Cleared placeholders");
        removed
    }

    /// Empty the grid and resize it, returning the items that were placed.
    ///
    /// The id counter carries on, so old ids are never re-issued.
    pub fn reset(&mut self, dims: GridDims) -> Vec<PlacedItem> {
        let dims = GridDims::new(dims.rows, dims.columns);
        self.dims = dims;
        self.placeholders.clear();
        let removed = std::mem::take(&mut self.items);
        debug!(%dims, removed = removed.len(), "Reset grid");
        removed
    }

    pub(crate) fn fresh_item_id(&mut self) -> ItemId {
        let id = ItemId::new(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn fresh_placeholder_id(&mut self) -> PlaceholderId {
        let id = PlaceholderId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn cell_coords(&self, position: usize) -> Option<(usize, usize)> {
        (position < self.dims.cell_count())
            .then(|| (self.dims.row_of(position), self.dims.col_of(position)))
    }
}

/// Log a rejection and hand it back for propagation.
pub(crate) fn rejected(operation: &'static str, err: LayoutError) -> LayoutError {
    debug!(operation, error = %err, "Rejected grid operation");
    err
}
