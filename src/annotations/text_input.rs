//! Composition-aware text entry
//!
//! Input methods deliver text in two parts: a preedit string that is still
//! being composed and is replaced on every event, and commit strings that are
//! final and appended once. Only committed text ever reaches a shape.

use std::time::Duration;

use crate::config::{FontSpec, ShapeColor};
use crate::domain::{Point, Shape, TextShape};

/// Caret blink half-period
pub const CARET_BLINK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextComposition {
    anchor: Option<Point>,
    committed: String,
    preedit: String,
}

impl TextComposition {
    /// Start a new text run at `anchor`, discarding any unfinished buffer
    pub fn begin(&mut self, anchor: Point) {
        self.anchor = Some(anchor);
        self.committed.clear();
        self.preedit.clear();
    }

    /// Append finalized characters; any stale preedit is dropped
    pub fn append_commit(&mut self, text: &str) {
        self.committed.push_str(text);
        self.preedit.clear();
    }

    /// Replace the display-only preedit preview
    pub fn set_preedit(&mut self, text: &str) {
        self.preedit.clear();
        self.preedit.push_str(text);
    }

    /// Remove the last committed character
    ///
    /// Ignored while a composition is in flight, since the input method owns
    /// that state. Returns whether a character was removed.
    pub fn backspace(&mut self) -> bool {
        if !self.preedit.is_empty() {
            return false;
        }
        self.committed.pop().is_some()
    }

    /// Turn the committed text into a shape and reset for the next run
    ///
    /// Returns `None` when nothing was committed.
    pub fn commit_and_close(
        &mut self,
        color: ShapeColor,
        font: &FontSpec,
        bold: bool,
    ) -> Option<Shape> {
        let anchor = self.anchor.take();
        let string = std::mem::take(&mut self.committed);
        self.preedit.clear();

        let anchor = anchor?;
        if string.is_empty() {
            return None;
        }
        Some(Shape::Text(TextShape {
            anchor,
            color,
            font: font.clone(),
            bold,
            string,
        }))
    }

    /// Drop everything, including the anchor
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn preedit(&self) -> &str {
        &self.preedit
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

/// Blinking caret state, toggled by the host's timer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caret {
    visible: bool,
}

impl Default for Caret {
    fn default() -> Self {
        Self { visible: true }
    }
}

impl Caret {
    pub fn tick(&mut self) {
        self.visible = !self.visible;
    }

    /// Show the caret immediately, e.g. after the anchor moves
    pub fn reset(&mut self) {
        self.visible = true;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(c: &mut TextComposition) -> Option<Shape> {
        c.commit_and_close(ShapeColor::default(), &FontSpec::default(), false)
    }

    fn string_of(shape: Option<Shape>) -> String {
        match shape {
            Some(Shape::Text(t)) => t.string,
            other => panic!("expected text shape, got {:?}", other),
        }
    }

    #[test]
    fn test_preedit_never_persisted() {
        let mut c = TextComposition::default();
        c.begin(Point::new(10, 20));
        c.append_commit("A");
        c.set_preedit("中");
        let Some(Shape::Text(t)) = close(&mut c) else {
            panic!("expected text shape");
        };
        assert_eq!(t.string, "A");
        assert_eq!(t.anchor, Point::new(10, 20));
        assert_eq!(c.preedit(), "");
    }

    #[test]
    fn test_reentrant_runs() {
        let mut c = TextComposition::default();
        c.begin(Point::new(0, 10));
        c.append_commit("first");
        let first = string_of(close(&mut c));

        c.begin(Point::new(0, 50));
        c.append_commit("second");
        let second = string_of(close(&mut c));

        assert_eq!(first, "first");
        assert_eq!(second, "second");
        assert_eq!(c.anchor(), None);
    }

    #[test]
    fn test_commit_clears_stale_preedit() {
        let mut c = TextComposition::default();
        c.begin(Point::default());
        c.set_preedit("zhong");
        c.append_commit("中");
        assert_eq!(c.committed(), "中");
        assert_eq!(c.preedit(), "");
    }

    #[test]
    fn test_backspace_removes_code_point() {
        let mut c = TextComposition::default();
        c.begin(Point::default());
        c.append_commit("a中");
        assert!(c.backspace());
        assert_eq!(c.committed(), "a");
        assert!(c.backspace());
        assert!(!c.backspace());
        assert_eq!(c.committed(), "");
    }

    #[test]
    fn test_backspace_ignored_during_composition() {
        let mut c = TextComposition::default();
        c.begin(Point::default());
        c.append_commit("ab");
        c.set_preedit("n");
        assert!(!c.backspace());
        assert_eq!(c.committed(), "ab");
    }

    #[test]
    fn test_empty_buffer_yields_no_shape() {
        let mut c = TextComposition::default();
        c.begin(Point::default());
        c.set_preedit("x");
        assert_eq!(close(&mut c), None);
        assert_eq!(close(&mut TextComposition::default()), None);
    }

    #[test]
    fn test_caret_toggle() {
        let mut caret = Caret::default();
        assert!(caret.visible());
        caret.tick();
        assert!(!caret.visible());
        caret.reset();
        assert!(caret.visible());
    }
}
