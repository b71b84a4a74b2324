//! Layout templates: fixed multi-cell arrangements applied wholesale.

use crate::engine::{rejected, CollageGrid};
use crate::entity::{Owner, PlacedItem, Placeholder, PlaceholderId, SlotTag};
use crate::error::LayoutError;
use crate::grid::{GridArea, GridDims, MAX_EXTENT};
use crate::occupancy::OccupancyIndex;
use crate::pool::ImagePool;
use serde::{Deserialize, Serialize};
use tracing::debug;

const fn one() -> usize {
    1
}

/// One rectangle of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSlot {
    /// Linear index of the top-left cell
    pub position: usize,
    /// Rows covered
    #[serde(default = "one")]
    pub row_span: usize,
    /// Columns covered
    #[serde(default = "one")]
    pub col_span: usize,
}

impl TemplateSlot {
    /// Create a slot.
    #[must_use]
    pub const fn new(position: usize, row_span: usize, col_span: usize) -> Self {
        Self {
            position,
            row_span,
            col_span,
        }
    }

    /// Single-cell slot.
    #[must_use]
    pub const fn cell(position: usize) -> Self {
        Self::new(position, 1, 1)
    }
}

/// An immutable multi-cell arrangement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTemplate {
    /// Display name, copied into placeholder tags
    pub name: String,
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub columns: usize,
    /// Slots in fill order
    pub slots: Vec<TemplateSlot>,
}

impl LayoutTemplate {
    /// Create a template.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        rows: usize,
        columns: usize,
        slots: impl IntoIterator<Item = TemplateSlot>,
    ) -> Self {
        Self {
            name: name.into(),
            rows,
            columns,
            slots: slots.into_iter().collect(),
        }
    }

    /// Number of slots (the item count this template targets).
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Check dimensions, spans, bounds and slot overlap.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let invalid = |reason: String| LayoutError::InvalidTemplate {
            name: self.name.clone(),
            reason,
        };
        let dims = GridDims {
            rows: self.rows,
            columns: self.columns,
        };
        if !dims.is_valid() {
            return Err(invalid(format!(
                "grid must be between 1x1 and {MAX_EXTENT}x{MAX_EXTENT}, got {dims}"
            )));
        }
        let mut index = OccupancyIndex::empty(dims);
        for (slot_no, slot) in self.slots.iter().enumerate() {
            if slot.row_span == 0 || slot.col_span == 0 {
                return Err(invalid(format!("slot {slot_no} has a zero span")));
            }
            let area = self.slot_area(slot);
            let owner = Owner::Placeholder(PlaceholderId::new(slot_no as u64));
            index
                .claim(owner, area)
                .map_err(|err| match err {
                    LayoutError::Occupied { cell, .. } => {
                        invalid(format!("slot {slot_no} overlaps another slot at cell {cell}"))
                    }
                    _ => invalid(format!("slot {slot_no} ({area}) leaves the grid")),
                })?;
        }
        Ok(())
    }

    fn slot_area(&self, slot: &TemplateSlot) -> GridArea {
        GridArea::from_anchor(slot.position, slot.row_span, slot.col_span, self.columns.max(1))
    }
}

/// Result of applying a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateOutcome {
    /// Items that kept a place, in slot order
    pub mapped: usize,
    /// Placeholders created for unfilled slots
    pub placeholders: usize,
    /// Items displaced because the template has fewer slots
    pub surplus: Vec<PlacedItem>,
}

impl CollageGrid {
    /// Replace the layout with a template.
    ///
    /// Items are mapped onto slots in their current order; unfilled slots
    /// become placeholders and extra items are removed and returned. The
    /// grid afterwards holds exactly `template.slot_count()` entities.
    pub fn apply_template(&mut self, template: &LayoutTemplate) -> Result<TemplateOutcome, LayoutError> {
        template.validate().map_err(|e| rejected("template", e))?;

        let dims = GridDims::new(template.rows, template.columns);
        let mapped = self.items.len().min(template.slots.len());
        let surplus = self.items.split_off(mapped);
        for (item, slot) in self.items.iter_mut().zip(&template.slots) {
            item.position = slot.position;
            item.row_span = slot.row_span;
            item.col_span = slot.col_span;
        }

        self.placeholders.clear();
        for (slot_no, slot) in template.slots.iter().enumerate().skip(mapped) {
            let id = self.fresh_placeholder_id();
            self.placeholders.push(Placeholder {
                id,
                position: slot.position,
                row_span: slot.row_span,
                col_span: slot.col_span,
                tag: SlotTag {
                    template: template.name.clone(),
                    slot: slot_no,
                },
            });
        }
        self.dims = dims;

        let outcome = TemplateOutcome {
            mapped,
            placeholders: self.placeholders.len(),
            surplus,
        };
        debug!(
            template = %template.name,
            %dims,
            mapped = outcome.mapped,
            placeholders = outcome.placeholders,
            surplus = outcome.surplus.len(),
            "Applied template"
        );
        Ok(outcome)
    }

    /// Apply a template and return displaced images to the pool.
    pub fn apply_template_with_pool<P: ImagePool + ?Sized>(
        &mut self,
        template: &LayoutTemplate,
        pool: &mut P,
    ) -> Result<TemplateOutcome, LayoutError> {
        let outcome = self.apply_template(template)?;
        for item in &outcome.surplus {
            pool.release(item.image.clone());
        }
        Ok(outcome)
    }
}
