//! Input events consumed by the editor
//!
//! Everything the host windowing layer delivers is expressed as an
//! [`EditorEvent`]; the editor never sees host-specific event objects.

use serde::{Deserialize, Serialize};

use crate::config::{FontSpec, ShapeColor};
use crate::domain::{Point, Tool};

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Backspace,
}

/// Style changes for shapes created afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StyleMsg {
    Color(ShapeColor),
    StrokeWidth(f32),
    Font(FontSpec),
    Bold(bool),
    /// Clamped into the accepted block size range
    MosaicBlockSize(u32),
}

/// How the user left the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FinishAction {
    /// Save to a file
    #[default]
    Save,
    /// Copy to the clipboard
    Copy,
    /// Hide the editor but keep the result
    Hide,
    /// Discard the edit
    Cancel,
}

/// All editor messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorEvent {
    /// Primary button pressed at position
    PointerDown(Point),
    /// Pointer moved to position
    PointerMove(Point),
    /// Primary button released at position
    PointerUp(Point),
    Key(Key),
    /// Input method update: replacement preedit plus newly committed text
    Composition {
        #[serde(default)]
        preedit: String,
        #[serde(default)]
        commit: String,
    },
    /// Select a tool, or none for pointer-only editing
    SelectTool(Option<Tool>),
    Style(StyleMsg),
    /// Remove the last committed shape
    Undo,
    /// Remove every shape and restore the base image
    ClearAll,
    /// Caret blink timer fired
    CaretTick,
    Finish(FinishAction),
}

impl EditorEvent {
    pub fn down(x: i32, y: i32) -> Self {
        Self::PointerDown(Point::new(x, y))
    }
    pub fn moved(x: i32, y: i32) -> Self {
        Self::PointerMove(Point::new(x, y))
    }
    pub fn up(x: i32, y: i32) -> Self {
        Self::PointerUp(Point::new(x, y))
    }
    pub fn commit(text: &str) -> Self {
        Self::Composition {
            preedit: String::new(),
            commit: text.to_string(),
        }
    }
    pub fn preedit(text: &str) -> Self {
        Self::Composition {
            preedit: text.to_string(),
            commit: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_script_json() {
        let json = r#"[
            {"SelectTool": "Rectangle"},
            {"PointerDown": {"x": 10, "y": 10}},
            {"Composition": {"commit": "hi"}},
            {"Key": "Enter"},
            "Undo",
            {"Finish": "Copy"}
        ]"#;
        let events: Vec<EditorEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(
            events,
            vec![
                EditorEvent::SelectTool(Some(Tool::Rectangle)),
                EditorEvent::down(10, 10),
                EditorEvent::commit("hi"),
                EditorEvent::Key(Key::Enter),
                EditorEvent::Undo,
                EditorEvent::Finish(FinishAction::Copy),
            ]
        );
    }
}
