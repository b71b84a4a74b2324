//! Occupancy index: which entity owns each grid cell.
//!
//! The index is derived from the flat item and placeholder lists and rebuilt
//! for every operation; it is never stored alongside them.

use crate::entity::{Owner, PlacedItem, Placeholder};
use crate::error::LayoutError;
use crate::grid::{GridArea, GridDims};

/// Cell ownership map in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyIndex {
    dims: GridDims,
    cells: Vec<Option<Owner>>,
}

impl OccupancyIndex {
    /// Create an index with no owners. Counts outside `1..=MAX_EXTENT`
    /// are clamped before the cell table is allocated.
    #[must_use]
    pub fn empty(dims: GridDims) -> Self {
        let dims = GridDims::new(dims.rows, dims.columns);
        Self {
            dims,
            cells: vec![None; dims.cell_count()],
        }
    }

    /// Build the index from the current entities.
    ///
    /// Cells outside the grid are skipped and earlier claims win, so a
    /// corrupted entity list still yields an index. Use [`Self::try_build`]
    /// to detect such corruption.
    #[must_use]
    pub fn build(dims: GridDims, items: &[PlacedItem], placeholders: &[Placeholder]) -> Self {
        let mut index = Self::empty(dims);
        let entities = items
            .iter()
            .map(|i| (i.owner(), i.area(dims.columns)))
            .chain(
                placeholders
                    .iter()
                    .map(|p| (p.owner(), p.area(dims.columns))),
            );
        for (owner, area) in entities {
            for row in area.row_start..area.row_end.min(dims.rows) {
                for col in area.col_start..area.col_end.min(dims.columns) {
                    let slot = &mut index.cells[dims.position(row, col)];
                    if slot.is_none() {
                        *slot = Some(owner);
                    }
                }
            }
        }
        index
    }

    /// Build the index, rejecting out-of-bounds or overlapping entities.
    pub fn try_build(
        dims: GridDims,
        items: &[PlacedItem],
        placeholders: &[Placeholder],
    ) -> Result<Self, LayoutError> {
        let mut index = Self::empty(dims);
        for item in items {
            index.claim(item.owner(), item.area(dims.columns))?;
        }
        for placeholder in placeholders {
            index.claim(placeholder.owner(), placeholder.area(dims.columns))?;
        }
        Ok(index)
    }

    /// Claim every cell of an area for `owner`.
    pub fn claim(&mut self, owner: Owner, area: GridArea) -> Result<(), LayoutError> {
        self.check(&area)?;
        for cell in area.cells(self.dims.columns) {
            self.cells[cell] = Some(owner);
        }
        Ok(())
    }

    /// Free every cell owned by `owner`.
    pub fn release(&mut self, owner: Owner) {
        for cell in &mut self.cells {
            if *cell == Some(owner) {
                *cell = None;
            }
        }
    }

    /// The index with `owner`'s cells treated as free.
    ///
    /// Move and resize test their target against this view so an entity
    /// never collides with the cells it is vacating.
    #[must_use]
    pub fn without(mut self, owner: Owner) -> Self {
        self.release(owner);
        self
    }

    /// Grid dimensions the index was built for.
    #[must_use]
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    /// Owner of a linear position, if any.
    #[must_use]
    pub fn owner_at(&self, position: usize) -> Option<Owner> {
        self.cells.get(position).copied().flatten()
    }

    /// First owned cell inside an in-bounds area, in ascending order.
    #[must_use]
    pub fn first_conflict(&self, area: &GridArea) -> Option<(usize, Owner)> {
        area.cells(self.dims.columns)
            .into_iter()
            .find_map(|cell| self.owner_at(cell).map(|owner| (cell, owner)))
    }

    /// Validate that an area is in bounds and entirely free.
    pub fn check(&self, area: &GridArea) -> Result<(), LayoutError> {
        if !self.dims.contains(area) {
            return Err(LayoutError::OutOfBounds {
                area: *area,
                rows: self.dims.rows,
                columns: self.dims.columns,
            });
        }
        match self.first_conflict(area) {
            Some((cell, owner)) => Err(LayoutError::Occupied { cell, owner }),
            None => Ok(()),
        }
    }

    /// Unowned positions, ascending.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, owner)| owner.is_none())
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Number of owned cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|owner| owner.is_some()).count()
    }
}

/// Positions not covered by any item or placeholder, ascending.
///
/// Auto-fill consumes this list front to back, so the order is part of the
/// contract.
#[must_use]
pub fn empty_cells(dims: GridDims, items: &[PlacedItem], placeholders: &[Placeholder]) -> Vec<usize> {
    OccupancyIndex::build(dims, items, placeholders).empty_cells()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ImageRef, ItemId, PlaceholderId, SlotTag};

    fn item(id: u64, position: usize, row_span: usize, col_span: usize) -> PlacedItem {
        PlacedItem {
            id: ItemId::new(id),
            position,
            row_span,
            col_span,
            image: ImageRef::from("img"),
        }
    }

    fn placeholder(id: u64, position: usize) -> Placeholder {
        Placeholder {
            id: PlaceholderId::new(id),
            position,
            row_span: 1,
            col_span: 1,
            tag: SlotTag {
                template: "t".to_string(),
                slot: 0,
            },
        }
    }

    // =========================================================================
    // Build Tests
    // =========================================================================

    #[test]
    fn test_empty_clamps_raw_dims() {
        let raw = GridDims {
            rows: 100_000,
            columns: 100_000,
        };
        let index = OccupancyIndex::empty(raw);
        assert_eq!(index.dims(), GridDims::new(20, 20));
        assert_eq!(index.empty_cells().len(), 400);
    }

    #[test]
    fn test_build_maps_cells_to_owners() {
        let dims = GridDims::new(2, 3);
        let index = OccupancyIndex::build(dims, &[item(1, 0, 2, 2)], &[placeholder(2, 5)]);

        assert_eq!(index.owner_at(0), Some(Owner::Item(ItemId::new(1))));
        assert_eq!(index.owner_at(4), Some(Owner::Item(ItemId::new(1))));
        assert_eq!(
            index.owner_at(5),
            Some(Owner::Placeholder(PlaceholderId::new(2)))
        );
        assert_eq!(index.owner_at(2), None);
        assert_eq!(index.occupied_count(), 5);
    }

    #[test]
    fn test_try_build_rejects_overlap() {
        let dims = GridDims::new(2, 2);
        let result = OccupancyIndex::try_build(dims, &[item(1, 0, 1, 2), item(2, 1, 1, 1)], &[]);
        assert!(matches!(result, Err(LayoutError::Occupied { cell: 1, .. })));
    }

    #[test]
    fn test_try_build_rejects_out_of_bounds() {
        let dims = GridDims::new(2, 2);
        let result = OccupancyIndex::try_build(dims, &[item(1, 1, 1, 2)], &[]);
        assert!(matches!(result, Err(LayoutError::OutOfBounds { .. })));
    }

    // =========================================================================
    // Self-exclusion Tests
    // =========================================================================

    #[test]
    fn test_without_frees_own_cells() {
        let dims = GridDims::new(1, 3);
        let index = OccupancyIndex::build(dims, &[item(1, 0, 1, 2)], &[]);
        let target = dims.area(1, 1, 2);

        assert!(index.check(&target).is_err());
        assert!(index
            .without(Owner::Item(ItemId::new(1)))
            .check(&target)
            .is_ok());
    }

    #[test]
    fn test_check_reports_first_conflicting_cell() {
        let dims = GridDims::new(2, 2);
        let index = OccupancyIndex::build(dims, &[item(9, 3, 1, 1)], &[]);
        let err = index.check(&dims.area(0, 2, 2)).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Occupied {
                cell: 3,
                owner: Owner::Item(ItemId::new(9)),
            }
        );
    }

    // =========================================================================
    // empty_cells Tests
    // =========================================================================

    #[test]
    fn test_empty_cells_ascending() {
        let dims = GridDims::new(2, 3);
        let cells = empty_cells(dims, &[item(1, 1, 2, 1)], &[placeholder(2, 5)]);
        assert_eq!(cells, vec![0, 2, 3]);
    }

    #[test]
    fn test_empty_cells_full_grid() {
        let dims = GridDims::new(1, 2);
        assert!(empty_cells(dims, &[item(1, 0, 1, 2)], &[]).is_empty());
    }
}
