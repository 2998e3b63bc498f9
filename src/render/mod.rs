//! Annotation rendering module
//!
//! This module contains:
//! - Geometry calculations shared between rendering and hit-testing
//! - Raster rendering using tiny-skia
//! - The destructive mosaic filter
//! - Text measurement and glyph drawing

pub mod geometry;
pub mod image;
pub mod mosaic;
pub mod text;
