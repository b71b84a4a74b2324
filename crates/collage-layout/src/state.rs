//! Plain-data snapshot of a grid for external persistence.

use crate::engine::{rejected, CollageGrid};
use crate::entity::{PlacedItem, Placeholder};
use crate::error::LayoutError;
use crate::grid::{GridDims, MAX_EXTENT};
use crate::occupancy::OccupancyIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Serializable grid state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridState {
    /// Grid extent
    pub dims: GridDims,
    /// Placed items in order
    pub items: Vec<PlacedItem>,
    /// Placeholders in order
    #[serde(default)]
    pub placeholders: Vec<Placeholder>,
    /// Next id to issue; greater than every id in use
    pub next_id: u64,
}

impl Default for GridState {
    fn default() -> Self {
        CollageGrid::default().snapshot()
    }
}

impl GridState {
    /// Parse a state from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the state to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// This state with its id counter raised to at least `next_id`.
    ///
    /// Undo and redo restore entities but never rewind the counter, so ids
    /// issued after stepping back are still fresh.
    #[must_use]
    pub fn with_id_floor(mut self, next_id: u64) -> Self {
        self.next_id = self.next_id.max(next_id);
        self
    }

    /// Check every grid invariant.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let invalid = LayoutError::InvalidState;
        if !self.dims.is_valid() {
            return Err(invalid(format!(
                "grid must be between 1x1 and {MAX_EXTENT}x{MAX_EXTENT}, got {}",
                self.dims
            )));
        }

        let mut seen = HashSet::new();
        let ids = self
            .items
            .iter()
            .map(|i| (i.id.as_u64(), i.row_span, i.col_span))
            .chain(
                self.placeholders
                    .iter()
                    .map(|p| (p.id.as_u64(), p.row_span, p.col_span)),
            );
        for (id, row_span, col_span) in ids {
            if row_span == 0 || col_span == 0 {
                return Err(invalid(format!("entity {id} has a zero span")));
            }
            if !seen.insert(id) {
                return Err(invalid(format!("id {id} is used more than once")));
            }
            if id >= self.next_id {
                return Err(invalid(format!(
                    "id {id} is not below next_id {}",
                    self.next_id
                )));
            }
        }

        OccupancyIndex::try_build(self.dims, &self.items, &self.placeholders)
            .map(|_| ())
            .map_err(|err| invalid(err.to_string()))
    }
}

impl CollageGrid {
    /// Capture the current state.
    #[must_use]
    pub fn snapshot(&self) -> GridState {
        GridState {
            dims: self.dims,
            items: self.items.clone(),
            placeholders: self.placeholders.clone(),
            next_id: self.next_id,
        }
    }

    /// Build a grid from a snapshot, validating every invariant.
    pub fn from_state(state: GridState) -> Result<Self, LayoutError> {
        state.validate().map_err(|e| rejected("restore", e))?;
        Ok(Self {
            dims: state.dims,
            items: state.items,
            placeholders: state.placeholders,
            next_id: state.next_id,
        })
    }

    /// Replace the current state with a snapshot. A rejected snapshot
    /// leaves the grid unchanged.
    pub fn restore(&mut self, state: GridState) -> Result<(), LayoutError> {
        *self = Self::from_state(state)?;
        debug!(dims = %self.dims, items = self.items.len(), "Restored grid state");
        Ok(())
    }
}

impl From<&CollageGrid> for GridState {
    fn from(grid: &CollageGrid) -> Self {
        grid.snapshot()
    }
}

impl TryFrom<GridState> for CollageGrid {
    type Error = LayoutError;

    fn try_from(state: GridState) -> Result<Self, Self::Error> {
        Self::from_state(state)
    }
}
