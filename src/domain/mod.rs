//! Pure domain types with minimal dependencies
//!
//! Types here know nothing about rendering or input handling.

pub mod annotation;
pub mod geometry;

pub use annotation::*;
pub use geometry::*;
