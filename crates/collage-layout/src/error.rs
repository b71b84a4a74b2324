//! Rejections returned by grid operations.
//!
//! Every variant is local and non-fatal: the grid is left exactly as it was
//! before the call, and the host decides how to surface it.

use crate::entity::{ItemId, Owner};
use crate::grid::{Axis, GridArea};
use thiserror::Error;

/// Errors from grid operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Rectangle or index exceeds the grid extent.
    #[error("{area} exceeds the {rows}x{columns} grid")]
    OutOfBounds {
        area: GridArea,
        rows: usize,
        columns: usize,
    },

    /// Target cells overlap an existing item or placeholder.
    #[error("cell {cell} is already occupied by {owner}")]
    Occupied { cell: usize, owner: Owner },

    /// Structural removal blocked by content on the line.
    #[error("{axis} {index} is not empty")]
    NotEmpty { axis: Axis, index: usize },

    /// Insertion would grow an axis past the supported extent.
    #[error("cannot grow past {limit} {axis}s")]
    LimitExceeded { axis: Axis, limit: usize },

    /// Attempt to remove the only row or column.
    #[error("cannot remove the last remaining {0}")]
    LastRemaining(Axis),

    /// Referenced item does not exist.
    #[error("item {0} not found")]
    NotFound(ItemId),

    /// Template slots are malformed.
    #[error("invalid template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },

    /// A restored snapshot violates grid invariants.
    #[error("invalid grid state: {0}")]
    InvalidState(String),
}

/// Fieldless classification of a [`LayoutError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    OutOfBounds,
    Occupied,
    NotEmpty,
    LimitExceeded,
    LastRemaining,
    NotFound,
    InvalidTemplate,
    InvalidState,
}

impl LayoutError {
    /// Classify the rejection.
    #[must_use]
    pub const fn kind(&self) -> RejectionKind {
        match self {
            Self::OutOfBounds { .. } => RejectionKind::OutOfBounds,
            Self::Occupied { .. } => RejectionKind::Occupied,
            Self::NotEmpty { .. } => RejectionKind::NotEmpty,
            Self::LimitExceeded { .. } => RejectionKind::LimitExceeded,
            Self::LastRemaining(_) => RejectionKind::LastRemaining,
            Self::NotFound(_) => RejectionKind::NotFound,
            Self::InvalidTemplate { .. } => RejectionKind::InvalidTemplate,
            Self::InvalidState(_) => RejectionKind::InvalidState,
        }
    }
}
