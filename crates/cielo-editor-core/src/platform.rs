//! Platform abstraction for editor focus.
//!
//! The editor state lives here; the element that actually holds focus lives
//! in the host (browser DOM, a test double). After every insertion the
//! editor tells the host which surface received it and where the caret
//! ended up, and the host moves focus and selection accordingly.

use crate::editor::EditorMode;
use crate::markup::TreePoint;

/// Caret position reported to the host after an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caret {
    /// Caret inside the structured surface's tree.
    Structured(TreePoint),
    /// Char offset inside the raw surface's text.
    Raw(usize),
}

/// Host-side focus handling.
pub trait EditorPlatform {
    /// Focus the surface for `mode` and place the caret.
    fn focus(&self, mode: EditorMode, caret: &Caret);
}

/// Headless host: nothing to focus.
impl EditorPlatform for () {
    fn focus(&self, _mode: EditorMode, _caret: &Caret) {}
}

impl<P: EditorPlatform + ?Sized> EditorPlatform for std::rc::Rc<P> {
    fn focus(&self, mode: EditorMode, caret: &Caret) {
        (**self).focus(mode, caret)
    }
}
