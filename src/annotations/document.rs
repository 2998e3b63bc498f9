//! Ordered shape document with a replayable mosaic history
//!
//! Paint order and undo order are both the append order. Every mosaic bake
//! is also recorded in a history log; the log, not the shape list, is what
//! gets replayed against the base image after an undo.

use image::RgbaImage;

use crate::domain::{Rect, Shape};
use crate::render::mosaic::apply_mosaic;

/// One destructive mosaic application
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BakeRecord {
    /// Index of the mosaic shape in the document
    pub ordinal: usize,
    pub rect: Rect,
    pub block_size: u32,
}

#[derive(Clone, Debug, Default)]
pub struct Document {
    shapes: Vec<Shape>,
    bakes: Vec<BakeRecord>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape; shapes below the minimum size are dropped
    ///
    /// Returns whether the shape was committed.
    pub fn append(&mut self, shape: Shape) -> bool {
        if !shape.is_committable() {
            log::debug!("Dropping {} below minimum size", shape.kind());
            return false;
        }
        if let Shape::Mosaic(m) = &shape {
            self.bakes.push(BakeRecord {
                ordinal: self.shapes.len(),
                rect: m.bounds(),
                block_size: m.block_size,
            });
        }
        log::debug!("Committed {} #{}", shape.kind(), self.shapes.len());
        self.shapes.push(shape);
        true
    }

    /// Remove the most recently appended shape
    pub fn remove_last(&mut self) -> Option<Shape> {
        let shape = self.shapes.pop()?;
        if self
            .bakes
            .last()
            .is_some_and(|bake| bake.ordinal == self.shapes.len())
        {
            self.bakes.pop();
        }
        Some(shape)
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.bakes.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    pub fn as_slice(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    /// Mutable access for move/resize; baked mosaics cannot be edited
    pub fn editable_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.shapes.get_mut(index).filter(|shape| !shape.is_mosaic())
    }

    /// History of mosaic bakes in application order
    pub fn bakes(&self) -> &[BakeRecord] {
        &self.bakes
    }

    /// Re-derive the baked raster: `base` with every recorded mosaic re-applied in order
    pub fn replay(&self, base: &RgbaImage) -> RgbaImage {
        let mut img = base.clone();
        for bake in &self.bakes {
            apply_mosaic(&mut img, bake.rect, bake.block_size);
        }
        log::debug!("Replayed {} mosaic bake(s) from base image", self.bakes.len());
        img
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
