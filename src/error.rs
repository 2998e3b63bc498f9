//! Error type for the fallible edges of the editor (files, fonts, images)

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid font data: {0}")]
    Font(#[from] ab_glyph::InvalidFont),
    #[error("base image has zero width or height")]
    EmptyImage,
}

pub type Result<T> = std::result::Result<T, EditorError>;
