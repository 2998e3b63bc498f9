//! Committed shapes and the input logic that edits them
//!
//! This module provides:
//! - The shape document with its mosaic bake log
//! - Hit-testing for handles and shape bodies
//! - Composition-aware text entry
//! - Event handlers driving the interaction state machine

pub mod document;
pub mod handlers;
pub mod text_input;

pub use document::{BakeRecord, Document};
pub use handlers::handle_event;
