//! Editing session management
//!
//! This module contains:
//! - Session state and the three rasters it derives
//! - Event types delivered by the host
//! - The host callback trait

pub mod host;
pub mod messages;
pub mod state;

pub use host::{CollectingHost, EditorHost};
pub use messages::{EditorEvent, FinishAction, Key, StyleMsg};
pub use state::{EditorSession, Interaction, ToolStyle};
