//! Auto-fill: place images from the pool into open slots.
//!
//! Placeholders are filled first (ascending position), then empty cells
//! (ascending position) as 1x1 items. Capacity shortfalls degrade to a
//! partial fill; nothing here is an error.

use crate::engine::CollageGrid;
use crate::entity::{ImageRef, ItemId};
use crate::pool::ImagePool;
use tracing::{debug, warn};

/// Result of [`CollageGrid::place_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceAllOutcome {
    /// Images placed
    pub placed: usize,
    /// Images still waiting in the pool
    pub remaining: usize,
    /// Ids of the new items, in placement order
    pub items: Vec<ItemId>,
}

impl CollageGrid {
    /// Open targets in fill order: placeholder anchors, then empty cells.
    fn fill_targets(&self) -> (usize, Vec<usize>) {
        let mut slots: Vec<usize> = self.placeholders.iter().map(|p| p.position).collect();
        slots.sort_unstable();
        let slot_count = slots.len();
        slots.extend(self.empty_cells());
        (slot_count, slots)
    }

    /// Fill placeholders, then empty cells, from the front of the pool.
    pub fn place_all<P: ImagePool + ?Sized>(&mut self, pool: &mut P) -> PlaceAllOutcome {
        let (slot_count, targets) = self.fill_targets();
        let available = pool.available();
        let images = pool.take_available(available.min(targets.len()));
        let take = images.len();

        let mut items = Vec::with_capacity(take);
        for (image, position) in images.into_iter().zip(targets) {
            match self.add_item(position, image.clone()) {
                Ok(id) => items.push(id),
                Err(err) => {
                    warn!(position, error = %err, "Auto-fill target unexpectedly unavailable");
                    pool.release(image);
                }
            }
        }

        let outcome = PlaceAllOutcome {
            placed: items.len(),
            remaining: available - items.len(),
            items,
        };
        debug!(
            placed = outcome.placed,
            remaining = outcome.remaining,
            into_slots = outcome.placed.min(slot_count),
            "Placed images from pool"
        );
        outcome
    }

    /// Place one image in the first open target.
    ///
    /// Gives the image back when the grid has no placeholder or empty cell.
    pub fn place_next(&mut self, image: ImageRef) -> Result<ItemId, ImageRef> {
        let (_, targets) = self.fill_targets();
        match targets.first() {
            Some(&position) => self.add_item(position, image.clone()).map_err(|_| image),
            None => Err(image),
        }
    }
}
