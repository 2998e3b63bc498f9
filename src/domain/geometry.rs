//! Geometric types for the editing surface
//!
//! All coordinates are integer pixels local to the editing raster.

use serde::{Deserialize, Serialize};

/// A pointer position or shape anchor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate the point by the given offset
    pub fn translate(self, dx: i32, dy: i32) -> Point {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Squared euclidean distance to another point
    pub fn distance_squared(self, other: Point) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }
}

/// Axis-aligned rectangle, right and bottom edges exclusive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Create a new rectangle from coordinates
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Normalized bounding box of two arbitrary drag points
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    /// Rectangle covering a whole `width` x `height` raster
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: i32::try_from(width).unwrap_or(i32::MAX),
            bottom: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }

    /// Calculate the intersection of two rectangles
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(Rect {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    /// Shrink (positive) or grow (negative) every edge by `amount`
    pub fn inset(&self, amount: i32) -> Rect {
        Rect {
            left: self.left + amount,
            top: self.top + amount,
            right: self.right - amount,
            bottom: self.bottom - amount,
        }
    }

    /// Get the width of the rectangle
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Get the height of the rectangle
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Check if a point lies inside or on the edges of this rectangle
    pub fn contains_point_inclusive(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// The four corners in `Corner` order
    pub fn corners(&self) -> [(Corner, Point); 4] {
        [
            (Corner::NW, Point::new(self.left, self.top)),
            (Corner::NE, Point::new(self.right, self.top)),
            (Corner::SW, Point::new(self.left, self.bottom)),
            (Corner::SE, Point::new(self.right, self.bottom)),
        ]
    }
}

/// Bounding-box corner used as a resize handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    /// North-West corner
    NW,
    /// North-East corner
    NE,
    /// South-West corner
    SW,
    /// South-East corner
    SE,
}

impl Corner {
    pub fn is_west(self) -> bool {
        matches!(self, Corner::NW | Corner::SW)
    }

    pub fn is_north(self) -> bool {
        matches!(self, Corner::NW | Corner::NE)
    }
}
