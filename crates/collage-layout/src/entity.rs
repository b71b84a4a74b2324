//! Entities that occupy grid cells: placed items and template placeholders.

use crate::grid::GridArea;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a placed item. Never reused within a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique identifier of a template placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceholderId(u64);

impl PlaceholderId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlaceholderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

/// Owner of a grid cell. Items and placeholders share one overlap namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// A placed image
    Item(ItemId),
    /// An empty template slot
    Placeholder(PlaceholderId),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(id) => write!(f, "item {id}"),
            Self::Placeholder(id) => write!(f, "placeholder {id}"),
        }
    }
}

/// Opaque reference to image content owned by the tray/image store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Create an image reference.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Borrow the raw reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An image occupying a rectangle of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    /// Stable identifier
    pub id: ItemId,
    /// Linear index of the top-left cell
    pub position: usize,
    /// Rows covered (at least 1)
    pub row_span: usize,
    /// Columns covered (at least 1)
    pub col_span: usize,
    /// Image content reference
    pub image: ImageRef,
}

impl PlacedItem {
    /// Covered rectangle under a column stride.
    #[must_use]
    pub const fn area(&self, columns: usize) -> GridArea {
        GridArea::from_anchor(self.position, self.row_span, self.col_span, columns)
    }

    /// Cell owner tag for this item.
    #[must_use]
    pub const fn owner(&self) -> Owner {
        Owner::Item(self.id)
    }
}

/// Which template slot a placeholder was created from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotTag {
    /// Template name
    pub template: String,
    /// Slot index within the template
    pub slot: usize,
}

impl fmt::Display for SlotTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.template, self.slot)
    }
}

/// A reserved, content-less slot left by a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Stable identifier
    pub id: PlaceholderId,
    /// Linear index of the top-left cell
    pub position: usize,
    /// Rows covered (at least 1)
    pub row_span: usize,
    /// Columns covered (at least 1)
    pub col_span: usize,
    /// Originating template slot, for display
    pub tag: SlotTag,
}

impl Placeholder {
    /// Covered rectangle under a column stride.
    #[must_use]
    pub const fn area(&self, columns: usize) -> GridArea {
        GridArea::from_anchor(self.position, self.row_span, self.col_span, columns)
    }

    /// Cell owner tag for this placeholder.
    #[must_use]
    pub const fn owner(&self) -> Owner {
        Owner::Placeholder(self.id)
    }
}
