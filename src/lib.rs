//! Screenshot annotation editor core
//!
//! Shapes are drawn over an immutable captured image. Rectangles, ellipses,
//! arrows and text stay editable; mosaics are baked destructively and undone
//! by replaying the bake log from the original pixels.

pub mod annotations;
pub mod config;
pub mod domain;
pub mod error;
pub mod render;
pub mod session;

pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use session::{EditorEvent, EditorHost, EditorSession, FinishAction};
