//! The image pool ("tray") holding images that are not placed in the grid.
//!
//! The engine only reads the next available images and hands displaced
//! ones back; it never assumes exclusive ownership of the pool.

use crate::entity::ImageRef;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Source and sink of unplaced images.
pub trait ImagePool {
    /// Number of images available for placement.
    fn available(&self) -> usize;

    /// Remove up to `n` images from the front of the pool.
    fn take_available(&mut self, n: usize) -> Vec<ImageRef>;

    /// Return an image to the pool.
    fn release(&mut self, image: ImageRef);
}

/// FIFO tray of unplaced images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tray {
    images: VecDeque<ImageRef>,
}

impl Tray {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an image at the back.
    pub fn push(&mut self, image: impl Into<ImageRef>) {
        self.images.push_back(image.into());
    }

    /// Next image to be placed.
    #[must_use]
    pub fn front(&self) -> Option<&ImageRef> {
        self.images.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Images in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &ImageRef> {
        self.images.iter()
    }
}

impl<I: Into<ImageRef>> FromIterator<I> for Tray {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self {
            images: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl ImagePool for Tray {
    fn available(&self) -> usize {
        self.images.len()
    }

    fn take_available(&mut self, n: usize) -> Vec<ImageRef> {
        let n = n.min(self.images.len());
        self.images.drain(..n).collect()
    }

    fn release(&mut self, image: ImageRef) {
        self.images.push_back(image);
    }
}
