//! Annotation types for drawing on screenshots
//!
//! Drag-defined shapes keep `start`/`end` in the order the user drew them;
//! use [`Outline::bounds`] / [`MosaicShape::bounds`] for normalized geometry.

use serde::{Deserialize, Serialize};

use super::geometry::{Corner, Point, Rect};
use crate::config::{FontSpec, ShapeColor};

/// Shapes smaller than this in both dimensions are never committed
pub const MIN_SHAPE_SIZE: i32 = 5;

/// Stroked shape defined by two drag points (rectangle, ellipse, arrow)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub start: Point,
    pub end: Point,
    pub color: ShapeColor,
    pub stroke_width: f32,
}

impl Outline {
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    /// Move `corner` of the bounding box to `pointer`, pinning the opposite
    /// edges so neither dimension drops below `min_size`.
    pub fn resize_corner(&mut self, corner: Corner, pointer: Point, min_size: i32) {
        let b = self.bounds();

        let (left, right) = if corner.is_west() {
            (pointer.x.min(b.right - min_size), b.right)
        } else {
            (b.left, pointer.x.max(b.left + min_size))
        };
        let (top, bottom) = if corner.is_north() {
            (pointer.y.min(b.bottom - min_size), b.bottom)
        } else {
            (b.top, pointer.y.max(b.top + min_size))
        };

        // Write back without flipping the stored drag direction
        if self.start.x <= self.end.x {
            self.start.x = left;
            self.end.x = right;
        } else {
            self.start.x = right;
            self.end.x = left;
        }
        if self.start.y <= self.end.y {
            self.start.y = top;
            self.end.y = bottom;
        } else {
            self.start.y = bottom;
            self.end.y = top;
        }
    }
}

/// Text annotation anchored at its baseline start
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    /// Left end of the baseline
    pub anchor: Point,
    pub color: ShapeColor,
    pub font: FontSpec,
    pub bold: bool,
    pub string: String,
}

/// Pixelated region; the effect lives in the baked raster, not in this record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MosaicShape {
    pub start: Point,
    pub end: Point,
    pub block_size: u32,
}

impl MosaicShape {
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }
}

/// One committed annotation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Outline),
    Ellipse(Outline),
    Arrow(Outline),
    Text(TextShape),
    Mosaic(MosaicShape),
}

impl Shape {
    pub fn is_mosaic(&self) -> bool {
        matches!(self, Shape::Mosaic(_))
    }

    /// Only rectangles and ellipses expose corner handles
    pub fn is_resizable(&self) -> bool {
        matches!(self, Shape::Rectangle(_) | Shape::Ellipse(_))
    }

    /// Stroke geometry of rectangles, ellipses and arrows
    pub fn outline(&self) -> Option<&Outline> {
        match self {
            Shape::Rectangle(o) | Shape::Ellipse(o) | Shape::Arrow(o) => Some(o),
            Shape::Text(_) | Shape::Mosaic(_) => None,
        }
    }

    /// Whether the shape is large enough (or non-empty) to be committed
    pub fn is_committable(&self) -> bool {
        let bounds = match self {
            Shape::Rectangle(o) | Shape::Ellipse(o) | Shape::Arrow(o) => o.bounds(),
            Shape::Mosaic(m) => m.bounds(),
            Shape::Text(t) => return !t.string.is_empty(),
        };
        bounds.width() >= MIN_SHAPE_SIZE || bounds.height() >= MIN_SHAPE_SIZE
    }

    /// Translate all of the shape's points
    pub fn translate(&mut self, dx: i32, dy: i32) {
        match self {
            Shape::Rectangle(o) | Shape::Ellipse(o) | Shape::Arrow(o) => {
                o.start = o.start.translate(dx, dy);
                o.end = o.end.translate(dx, dy);
            }
            Shape::Text(t) => t.anchor = t.anchor.translate(dx, dy),
            Shape::Mosaic(m) => {
                m.start = m.start.translate(dx, dy);
                m.end = m.end.translate(dx, dy);
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Rectangle(_) => "rectangle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Arrow(_) => "arrow",
            Shape::Text(_) => "text",
            Shape::Mosaic(_) => "mosaic",
        }
    }
}

/// Editing tool selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    Rectangle,
    Ellipse,
    Arrow,
    Text,
    Mosaic,
}
