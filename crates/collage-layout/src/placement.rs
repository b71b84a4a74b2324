//! Placement operations: add, move, resize, swap, delete.

use crate::engine::{rejected, CollageGrid};
use crate::entity::{ImageRef, ItemId, Owner, PlacedItem, PlaceholderId};
use crate::error::LayoutError;
use crate::grid::GridArea;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// Resize handle on an item's border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    /// Top or left: grows backward from the anchor
    Leading,
    /// Bottom or right: grows forward, anchor fixed
    Trailing,
}

impl ResizeHandle {
    /// All handles, cardinal first.
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::S,
        Self::E,
        Self::W,
        Self::NE,
        Self::NW,
        Self::SE,
        Self::SW,
    ];

    const fn vertical(self) -> Option<Edge> {
        match self {
            Self::N | Self::NE | Self::NW => Some(Edge::Leading),
            Self::S | Self::SE | Self::SW => Some(Edge::Trailing),
            Self::E | Self::W => None,
        }
    }

    const fn horizontal(self) -> Option<Edge> {
        match self {
            Self::W | Self::NW | Self::SW => Some(Edge::Leading),
            Self::E | Self::NE | Self::SE => Some(Edge::Trailing),
            Self::N | Self::S => None,
        }
    }

    /// Lowercase compass name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::S => "s",
            Self::E => "e",
            Self::W => "w",
            Self::NE => "ne",
            Self::NW => "nw",
            Self::SE => "se",
            Self::SW => "sw",
        }
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeHandle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown resize handle '{s}' (expected n, s, e, w, ne, nw, se, sw)"))
    }
}

/// Whole-cell pointer displacement. Quantization happens at the input
/// boundary; the engine never sees fractional cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellDelta {
    /// Vertical displacement (positive is down)
    pub rows: isize,
    /// Horizontal displacement (positive is right)
    pub cols: isize,
}

impl CellDelta {
    #[must_use]
    pub const fn new(rows: isize, cols: isize) -> Self {
        Self { rows, cols }
    }
}

/// New (anchor, span) along one axis.
fn adjust(edge: Option<Edge>, anchor: usize, span: usize, delta: isize) -> (usize, usize) {
    match edge {
        None => (anchor, span),
        Some(Edge::Trailing) => (anchor, span.saturating_add_signed(delta).max(1)),
        Some(Edge::Leading) => {
            // The anchor may not cross index 0.
            let delta = delta.max(-(anchor as isize));
            let anchor = anchor.saturating_add_signed(delta.min(0));
            let span = (span as isize - delta).max(1) as usize;
            (anchor, span)
        }
    }
}

impl CollageGrid {
    /// Place a 1x1 item, or fill the placeholder covering `position`.
    pub fn add_item(
        &mut self,
        position: usize,
        image: impl Into<ImageRef>,
    ) -> Result<ItemId, LayoutError> {
        self.add_item_spanning(position, image, 1, 1)
    }

    /// Place an item with an explicit span.
    ///
    /// When `position` falls inside a placeholder, the whole placeholder is
    /// consumed and the item takes the placeholder's own geometry; the
    /// requested span is ignored.
    pub fn add_item_spanning(
        &mut self,
        position: usize,
        image: impl Into<ImageRef>,
        row_span: usize,
        col_span: usize,
    ) -> Result<ItemId, LayoutError> {
        let columns = self.dims.columns;
        let mut occupancy = self.occupancy();
        let (area, consumed) = match self.placeholder_at(position) {
            Some(slot) => {
                occupancy.release(slot.owner());
                (slot.area(columns), Some(slot.id))
            }
            None => (self.dims.area(position, row_span, col_span), None),
        };
        occupancy.check(&area).map_err(|e| rejected("add", e))?;

        if let Some(slot) = consumed {
            self.remove_placeholder(slot);
        }
        let id = self.fresh_item_id();
        self.items.push(PlacedItem {
            id,
            position: area.anchor(columns),
            row_span: area.row_span_count(),
            col_span: area.col_span_count(),
            image: image.into(),
        });
        debug!(item = %id, position = area.anchor(columns), filled_slot = consumed.is_some(), "Added item");
        Ok(id)
    }

    /// Move an item so its top-left cell lands on `target`, keeping its span.
    ///
    /// A placeholder covering `target` is consumed by the move.
    pub fn move_item(&mut self, id: ItemId, target: usize) -> Result<(), LayoutError> {
        let index = self
            .item_index(id)
            .ok_or_else(|| rejected("move", LayoutError::NotFound(id)))?;
        let item = &self.items[index];
        let area = self.dims.area(target, item.row_span, item.col_span);

        let mut occupancy = self.occupancy().without(item.owner());
        let consumed = self.placeholder_at(target).map(|p| p.id);
        if let Some(slot) = consumed {
            occupancy.release(Owner::Placeholder(slot));
        }
        occupancy.check(&area).map_err(|e| rejected("move", e))?;

        if let Some(slot) = consumed {
            self.remove_placeholder(slot);
        }
        let from = std::mem::replace(&mut self.items[index].position, target);
        debug!(item = %id, from, to = target, "Moved item");
        Ok(())
    }

    /// Resize an item by dragging one of its handles.
    ///
    /// Returns the committed area. An invalid candidate leaves the item at
    /// its last valid geometry; callers driving a pointer stream may ignore
    /// the error and keep sending deltas.
    pub fn resize_item(
        &mut self,
        id: ItemId,
        handle: ResizeHandle,
        delta: CellDelta,
    ) -> Result<GridArea, LayoutError> {
        let index = self
            .item_index(id)
            .ok_or_else(|| rejected("resize", LayoutError::NotFound(id)))?;
        let item = &self.items[index];
        let columns = self.dims.columns;
        let current = item.area(columns);

        let (row, row_span) = adjust(handle.vertical(), current.row_start, item.row_span, delta.rows);
        let (col, col_span) = adjust(handle.horizontal(), current.col_start, item.col_span, delta.cols);
        let area = GridArea::new(
            row,
            col,
            row.saturating_add(row_span),
            col.saturating_add(col_span),
        );
        if area == current {
            return Ok(area);
        }

        if let Err(err) = self.occupancy().without(item.owner()).check(&area) {
            trace!(item = %id, %handle, error = %err, "Resize step rejected");
            return Err(err);
        }

        let item = &mut self.items[index];
        item.position = area.anchor(columns);
        item.row_span = row_span;
        item.col_span = col_span;
        trace!(item = %id, %handle, %area, "Resized item");
        Ok(area)
    }

    /// Exchange the geometry of two items.
    ///
    /// Each item takes exactly the cells the other vacates, so no third
    /// entity can be affected and no overlap test is needed.
    pub fn swap_items(&mut self, a: ItemId, b: ItemId) -> Result<(), LayoutError> {
        let ia = self
            .item_index(a)
            .ok_or_else(|| rejected("swap", LayoutError::NotFound(a)))?;
        let ib = self
            .item_index(b)
            .ok_or_else(|| rejected("swap", LayoutError::NotFound(b)))?;
        if ia == ib {
            return Ok(());
        }

        let geometry = |i: &PlacedItem| (i.position, i.row_span, i.col_span);
        let (ga, gb) = (geometry(&self.items[ia]), geometry(&self.items[ib]));
        for (index, (position, row_span, col_span)) in [(ia, gb), (ib, ga)] {
            let item = &mut self.items[index];
            item.position = position;
            item.row_span = row_span;
            item.col_span = col_span;
        }
        debug!(a = %a, b = %b, "Swapped items");
        Ok(())
    }

    /// Remove an item, returning it so the caller can release its image.
    pub fn delete_item(&mut self, id: ItemId) -> Result<PlacedItem, LayoutError> {
        let index = self
            .item_index(id)
            .ok_or_else(|| rejected("delete", LayoutError::NotFound(id)))?;
        let item = self.items.remove(index);
        debug!(item = %id, position = item.position, "Deleted item");
        Ok(item)
    }

    pub(crate) fn remove_placeholder(&mut self, id: PlaceholderId) {
        self.placeholders.retain(|p| p.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SlotTag;
    use crate::entity::Placeholder;

    fn grid_with_slot(rows: usize, columns: usize, position: usize, rs: usize, cs: usize) -> CollageGrid {
        let mut grid = CollageGrid::with_size(rows, columns);
        let id = grid.fresh_placeholder_id();
        grid.placeholders.push(Placeholder {
            id,
            position,
            row_span: rs,
            col_span: cs,
            tag: SlotTag {
                template: "test".to_string(),
                slot: 0,
            },
        });
        grid
    }

    // =========================================================================
    // Add Tests
    // =========================================================================

    #[test]
    fn test_add_rejects_occupied() {
        let mut grid = CollageGrid::with_size(2, 2);
        grid.add_item(0, "img1").unwrap();
        let err = grid.add_item(0, "img2").unwrap_err();
        assert!(matches!(err, LayoutError::Occupied { cell: 0, .. }));
        assert_eq!(grid.items().len(), 1);
    }

    #[test]
    fn test_add_rejects_out_of_bounds_span() {
        let mut grid = CollageGrid::with_size(2, 2);
        let err = grid.add_item_spanning(1, "wide", 1, 2).unwrap_err();
        assert!(matches!(err, LayoutError::OutOfBounds { .. }));
        assert!(grid.add_item(4, "past-end").is_err());
        assert!(grid.add_item_spanning(0, "flat", 0, 1).is_err());
    }

    #[test]
    fn test_add_rejects_overflowing_span() {
        let mut grid = CollageGrid::with_size(2, 2);
        let err = grid.add_item_spanning(2, "x", usize::MAX, 1).unwrap_err();
        assert!(matches!(err, LayoutError::OutOfBounds { .. }));
        let err = grid.add_item_spanning(usize::MAX, "x", 1, usize::MAX).unwrap_err();
        assert!(matches!(err, LayoutError::OutOfBounds { .. }));
        assert!(grid.items().is_empty());
    }

    #[test]
    fn test_add_inside_placeholder_takes_slot_geometry() {
        let mut grid = grid_with_slot(3, 3, 0, 2, 2);
        // Clicking the bottom-right cell of the slot still fills the whole slot.
        let id = grid.add_item(4, "photo").unwrap();

        let item = grid.item(id).unwrap();
        assert_eq!((item.position, item.row_span, item.col_span), (0, 2, 2));
        assert!(grid.placeholders().is_empty());
    }

    #[test]
    fn test_add_overlapping_placeholder_from_outside_is_rejected() {
        let mut grid = grid_with_slot(2, 2, 1, 1, 1);
        let err = grid.add_item_spanning(0, "wide", 1, 2).unwrap_err();
        assert!(matches!(err, LayoutError::Occupied { cell: 1, .. }));
        assert_eq!(grid.placeholders().len(), 1);
    }

    // =========================================================================
    // Move Tests
    // =========================================================================

    #[test]
    fn test_move_into_own_cells() {
        let mut grid = CollageGrid::with_size(1, 3);
        let id = grid.add_item_spanning(0, "a", 1, 2).unwrap();
        // Target overlaps the item's current cell 1; self-exclusion allows it.
        grid.move_item(id, 1).unwrap();
        let item = grid.item(id).unwrap();
        assert_eq!((item.position, item.row_span, item.col_span), (1, 1, 2));
    }

    #[test]
    fn test_move_rejects_other_item() {
        let mut grid = CollageGrid::with_size(1, 3);
        let a = grid.add_item_spanning(0, "a", 1, 2).unwrap();
        grid.add_item(2, "b").unwrap();

        let err = grid.move_item(a, 1).unwrap_err();
        assert!(matches!(err, LayoutError::Occupied { cell: 2, .. }));
        assert_eq!(grid.item(a).unwrap().position, 0);

        let err = grid.move_item(a, 2).unwrap_err();
        assert!(matches!(err, LayoutError::OutOfBounds { .. }));
    }

    #[test]
    fn test_move_consumes_placeholder() {
        let mut grid = grid_with_slot(2, 2, 3, 1, 1);
        let id = grid.add_item(0, "a").unwrap();
        grid.move_item(id, 3).unwrap();
        assert_eq!(grid.item(id).unwrap().position, 3);
        assert!(grid.placeholders().is_empty());
    }

    #[test]
    fn test_move_unknown_item() {
        let mut grid = CollageGrid::with_size(2, 2);
        let err = grid.move_item(ItemId::new(42), 0).unwrap_err();
        assert_eq!(err, LayoutError::NotFound(ItemId::new(42)));
    }

    // =========================================================================
    // Resize Tests
    // =========================================================================

    #[test]
    fn test_resize_trailing_edges() {
        let mut grid = CollageGrid::with_size(3, 3);
        let id = grid.add_item(0, "a").unwrap();

        let area = grid.resize_item(id, ResizeHandle::SE, CellDelta::new(1, 2)).unwrap();
        assert_eq!(area, GridArea::new(0, 0, 2, 3));

        let area = grid.resize_item(id, ResizeHandle::S, CellDelta::new(-5, 9)).unwrap();
        assert_eq!(area, GridArea::new(0, 0, 1, 3));
    }

    #[test]
    fn test_resize_leading_edge_grows_backward() {
        let mut grid = CollageGrid::with_size(3, 3);
        let id = grid.add_item(8, "a").unwrap();

        let area = grid.resize_item(id, ResizeHandle::NW, CellDelta::new(-1, -2)).unwrap();
        assert_eq!(area, GridArea::new(1, 0, 3, 3));
        assert_eq!(grid.item(id).unwrap().position, 3);
    }

    #[test]
    fn test_resize_leading_edge_clamps_at_origin() {
        let mut grid = CollageGrid::with_size(3, 3);
        let id = grid.add_item(4, "a").unwrap();

        let area = grid.resize_item(id, ResizeHandle::N, CellDelta::new(-5, 0)).unwrap();
        assert_eq!(area, GridArea::new(0, 1, 2, 2));
    }

    #[test]
    fn test_resize_leading_edge_positive_delta_shrinks_span() {
        let mut grid = CollageGrid::with_size(3, 3);
        let id = grid.add_item_spanning(0, "a", 3, 1).unwrap();

        let area = grid.resize_item(id, ResizeHandle::N, CellDelta::new(1, 0)).unwrap();
        assert_eq!(area, GridArea::new(0, 0, 2, 1));
        let area = grid.resize_item(id, ResizeHandle::N, CellDelta::new(4, 0)).unwrap();
        assert_eq!(area, GridArea::new(0, 0, 1, 1));
    }

    #[test]
    fn test_resize_cardinal_ignores_orthogonal_delta() {
        let mut grid = CollageGrid::with_size(3, 3);
        let id = grid.add_item(0, "a").unwrap();
        let area = grid.resize_item(id, ResizeHandle::E, CellDelta::new(2, 1)).unwrap();
        assert_eq!(area, GridArea::new(0, 0, 1, 2));
    }

    #[test]
    fn test_resize_out_of_bounds_keeps_geometry() {
        let mut grid = CollageGrid::with_size(1, 3);
        let id = grid.add_item_spanning(1, "a", 1, 2).unwrap();

        let err = grid.resize_item(id, ResizeHandle::E, CellDelta::new(0, 1)).unwrap_err();
        assert!(matches!(err, LayoutError::OutOfBounds { .. }));
        let item = grid.item(id).unwrap();
        assert_eq!((item.position, item.row_span, item.col_span), (1, 1, 2));
    }

    #[test]
    fn test_resize_with_extreme_delta_is_rejected() {
        let mut grid = CollageGrid::with_size(2, 2);
        let id = grid.add_item(3, "a").unwrap();

        for handle in ResizeHandle::ALL {
            let grow = CellDelta::new(isize::MAX, isize::MAX);
            let _ = grid.resize_item(id, handle, grow);
            let _ = grid.resize_item(id, handle, CellDelta::new(isize::MIN, isize::MIN));
        }
        assert!(grid.snapshot().validate().is_ok());
        assert!(grid
            .resize_item(id, ResizeHandle::SE, CellDelta::new(isize::MAX, isize::MAX))
            .is_err());
    }

    #[test]
    fn test_resize_into_neighbour_rejected() {
        let mut grid = CollageGrid::with_size(2, 2);
        let id = grid.add_item(0, "a").unwrap();
        grid.add_item(2, "b").unwrap();

        let err = grid.resize_item(id, ResizeHandle::S, CellDelta::new(1, 0)).unwrap_err();
        assert!(matches!(err, LayoutError::Occupied { cell: 2, .. }));
        assert_eq!(grid.item(id).unwrap().row_span, 1);
    }

    #[test]
    fn test_resize_stream_recovers_after_rejection() {
        let mut grid = CollageGrid::with_size(1, 4);
        let id = grid.add_item(0, "a").unwrap();

        assert!(grid.resize_item(id, ResizeHandle::E, CellDelta::new(0, 1)).is_ok());
        assert!(grid.resize_item(id, ResizeHandle::E, CellDelta::new(0, 5)).is_err());
        let area = grid.resize_item(id, ResizeHandle::E, CellDelta::new(0, 1)).unwrap();
        assert_eq!(area.col_span_count(), 3);
    }

    #[test]
    fn test_resize_handle_parse() {
        assert_eq!("ne".parse::<ResizeHandle>(), Ok(ResizeHandle::NE));
        assert_eq!("SW".parse::<ResizeHandle>(), Ok(ResizeHandle::SW));
        assert!("up".parse::<ResizeHandle>().is_err());
    }

    // =========================================================================
    // Swap / Delete Tests
    // =========================================================================

    #[test]
    fn test_swap_exchanges_geometry() {
        let mut grid = CollageGrid::with_size(2, 3);
        let a = grid.add_item_spanning(0, "a", 2, 2).unwrap();
        let b = grid.add_item(2, "b").unwrap();

        grid.swap_items(a, b).unwrap();
        let (ia, ib) = (grid.item(a).unwrap(), grid.item(b).unwrap());
        assert_eq!((ia.position, ia.row_span, ia.col_span), (2, 1, 1));
        assert_eq!((ib.position, ib.row_span, ib.col_span), (0, 2, 2));
        assert_eq!(ia.image, ImageRef::from("a"));
    }

    #[test]
    fn test_swap_missing_item_is_noop() {
        let mut grid = CollageGrid::with_size(1, 2);
        let a = grid.add_item(0, "a").unwrap();
        let before = grid.clone();
        assert!(grid.swap_items(a, ItemId::new(99)).is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_delete_frees_cells_without_placeholder() {
        let mut grid = CollageGrid::with_size(1, 2);
        let a = grid.add_item(0, "a").unwrap();
        let removed = grid.delete_item(a).unwrap();
        assert_eq!(removed.image, ImageRef::from("a"));
        assert_eq!(grid.empty_cells(), vec![0, 1]);
        assert!(grid.placeholders().is_empty());
        assert!(grid.delete_item(a).is_err());
    }
}
