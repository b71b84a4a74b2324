#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
//! Grid occupancy and layout engine for photo collages.
//!
//! The engine tracks which rectangle of a row-major grid every placed
//! image and every template placeholder covers, and keeps the grid
//! consistent across edits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          CollageGrid                             │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌────────────────┐   ┌──────────────────────┐ │
//! │  │ GridDims   │──▶│ OccupancyIndex │──▶│ placement/structural │ │
//! │  │            │   │                │   │                      │ │
//! │  │ - rows     │   │ - cell → owner │   │ - add/move/resize    │ │
//! │  │ - columns  │   │ - empty_cells  │   │ - insert/remove line │ │
//! │  └────────────┘   └────────────────┘   │ - template/auto-fill │ │
//! │                                        └──────────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation either commits a state that satisfies the non-overlap
//! and bounds invariants or returns a [`LayoutError`] and leaves the grid
//! untouched.

mod engine;
mod entity;
mod error;
mod fill;
mod grid;
mod history;
mod occupancy;
mod placement;
mod pool;
mod state;
mod structural;
mod template;

pub use engine::CollageGrid;
pub use entity::{ImageRef, ItemId, Owner, PlacedItem, Placeholder, PlaceholderId, SlotTag};
pub use error::{LayoutError, RejectionKind};
pub use fill::PlaceAllOutcome;
pub use grid::{covered_cells, Axis, GridArea, GridDims, MAX_EXTENT};
pub use history::{History, DEFAULT_HISTORY_DEPTH};
pub use occupancy::{empty_cells, OccupancyIndex};
pub use placement::{CellDelta, ResizeHandle};
pub use pool::{ImagePool, Tray};
pub use state::GridState;
pub use template::{LayoutTemplate, TemplateOutcome, TemplateSlot};
