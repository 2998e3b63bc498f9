//! Interaction state machine
//!
//! Routes every `EditorEvent` to the session, deciding between drawing,
//! moving, resizing and text entry from the current `Interaction`.

use crate::config::clamp_block_size;
use crate::domain::{MIN_SHAPE_SIZE, Point, Shape, Tool};
use crate::session::host::EditorHost;
use crate::session::messages::{EditorEvent, Key, StyleMsg};
use crate::session::state::{EditorSession, Interaction};

use super::hit_test::{self, Target};

/// Handle one editor event
///
/// Returns true when the display frame should be redrawn.
pub fn handle_event(
    session: &mut EditorSession,
    event: EditorEvent,
    host: &mut dyn EditorHost,
) -> bool {
    match event {
        EditorEvent::PointerDown(p) => pointer_down(session, p),
        EditorEvent::PointerMove(p) => return pointer_move(session, p),
        EditorEvent::PointerUp(p) => pointer_up(session, p),
        EditorEvent::Key(key) => handle_key(session, key),
        EditorEvent::Composition { preedit, commit } => composition(session, &preedit, &commit),
        EditorEvent::SelectTool(tool) => select_tool(session, tool),
        EditorEvent::Style(msg) => handle_style(session, msg),
        EditorEvent::Undo => {
            cancel_gesture(session);
            session.undo();
        }
        EditorEvent::ClearAll => {
            cancel_gesture(session);
            session.clear_all();
        }
        EditorEvent::CaretTick => {
            if session.interaction != Interaction::TextEditing {
                return false;
            }
            session.caret.tick();
        }
        EditorEvent::Finish(action) => session.finish(action, host),
    }
    true
}

impl EditorSession {
    /// Convenience wrapper around [`handle_event`]
    pub fn handle(&mut self, event: EditorEvent, host: &mut dyn EditorHost) -> bool {
        handle_event(self, event, host)
    }
}

// ============================================================================
// Pointer handlers
// ============================================================================

fn pointer_down(session: &mut EditorSession, p: Point) {
    match session.interaction {
        Interaction::TextEditing => {
            // Clicking elsewhere finishes the current run and starts a new one
            session.commit_pending_text();
            begin_text(session, p);
        }
        Interaction::Idle => {
            let target = hit_test::target_at(session.document.as_slice(), p, session.text_engine());
            session.interaction = match target {
                Some(Target::Handle(index, corner)) => {
                    log::debug!("Resizing shape #{} from {:?}", index, corner);
                    Interaction::ResizingShape { index, corner }
                }
                Some(Target::Shape(index)) => {
                    log::debug!("Moving shape #{}", index);
                    Interaction::MovingShape { index, last: p }
                }
                None => match session.tool {
                    Some(Tool::Text) => {
                        begin_text(session, p);
                        Interaction::TextEditing
                    }
                    Some(tool) => Interaction::Drawing {
                        tool,
                        start: p,
                        current: p,
                    },
                    None => Interaction::Idle,
                },
            };
        }
        // A gesture is already running
        _ => {}
    }
}

fn pointer_move(session: &mut EditorSession, p: Point) -> bool {
    match session.interaction {
        Interaction::Drawing { tool, start, .. } => {
            session.interaction = Interaction::Drawing {
                tool,
                start,
                current: p,
            };
        }
        Interaction::MovingShape { index, last } => {
            let (dx, dy) = (p.x - last.x, p.y - last.y);
            if let Some(shape) = session.document.editable_mut(index) {
                shape.translate(dx, dy);
            }
            session.interaction = Interaction::MovingShape { index, last: p };
            session.rebuild_working();
        }
        Interaction::ResizingShape { index, corner } => {
            if let Some(Shape::Rectangle(o) | Shape::Ellipse(o)) =
                session.document.editable_mut(index)
            {
                o.resize_corner(corner, p, MIN_SHAPE_SIZE);
            }
            session.rebuild_working();
        }
        Interaction::Idle | Interaction::TextEditing => return false,
    }
    true
}

fn pointer_up(session: &mut EditorSession, p: Point) {
    match session.interaction {
        Interaction::Drawing { tool, start, .. } => {
            session.interaction = Interaction::Idle;
            if let Some(shape) = session.draft_shape(tool, start, p) {
                session.commit_shape(shape);
            }
        }
        Interaction::MovingShape { .. } | Interaction::ResizingShape { .. } => {
            session.interaction = Interaction::Idle;
        }
        Interaction::Idle | Interaction::TextEditing => {}
    }
}

// ============================================================================
// Keyboard and text handlers
// ============================================================================

fn handle_key(session: &mut EditorSession, key: Key) {
    match key {
        Key::Escape => {
            if session.interaction == Interaction::TextEditing {
                session.commit_pending_text();
            }
            session.composition.reset();
            session.interaction = Interaction::Idle;
        }
        Key::Enter => {
            if session.interaction == Interaction::TextEditing {
                session.commit_pending_text();
            }
        }
        Key::Backspace => {
            if session.interaction == Interaction::TextEditing {
                session.composition.backspace();
            }
        }
    }
}

fn composition(session: &mut EditorSession, preedit: &str, commit: &str) {
    if session.interaction != Interaction::TextEditing || session.composition.anchor().is_none() {
        log::debug!("Ignoring composition event outside of a text run");
        return;
    }
    if !commit.is_empty() {
        session.composition.append_commit(commit);
    }
    session.composition.set_preedit(preedit);
}

fn begin_text(session: &mut EditorSession, anchor: Point) {
    session.composition.begin(anchor);
    session.caret.reset();
}

// ============================================================================
// Tool and style handlers
// ============================================================================

fn select_tool(session: &mut EditorSession, tool: Option<Tool>) {
    if session.interaction == Interaction::TextEditing {
        session.commit_pending_text();
    }
    session.composition.reset();
    session.tool = tool;
    session.interaction = if tool == Some(Tool::Text) {
        session.caret.reset();
        Interaction::TextEditing
    } else {
        Interaction::Idle
    };
    log::debug!("Selected tool {:?}", tool);
}

fn handle_style(session: &mut EditorSession, msg: StyleMsg) {
    let style = &mut session.style;
    match msg {
        StyleMsg::Color(color) => style.color = color,
        StyleMsg::StrokeWidth(width) => style.stroke_width = width.max(1.0),
        StyleMsg::Font(font) => style.font = font,
        StyleMsg::Bold(bold) => style.bold = bold,
        StyleMsg::MosaicBlockSize(size) => style.mosaic_block_size = clamp_block_size(size),
    }
}

/// Collapse a running pointer gesture; text entry is left alone
fn cancel_gesture(session: &mut EditorSession) {
    if matches!(
        session.interaction,
        Interaction::Drawing { .. }
            | Interaction::MovingShape { .. }
            | Interaction::ResizingShape { .. }
    ) {
        session.interaction = Interaction::Idle;
    }
}
