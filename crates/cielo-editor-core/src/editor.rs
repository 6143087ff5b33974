//! Rich/raw editor state machine.
//!
//! One logical HTML document with two surfaces. The structured surface is
//! active initially. Switching modes is the only point where the surfaces
//! are synchronized while the user types; insertions and form submission
//! keep them consistent the rest of the time.

pub use cielo_common::InsertionMode;

use crate::markup::Markup;
use crate::platform::{Caret, EditorPlatform};
use crate::surface::{RawSurface, StructuredSurface};

/// Which surface is editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum EditorMode {
    #[default]
    Rich,
    Raw,
}

impl EditorMode {
    pub fn toggled(self) -> Self {
        match self {
            EditorMode::Rich => EditorMode::Raw,
            EditorMode::Raw => EditorMode::Rich,
        }
    }
}

/// A WYSIWYG surface and a raw-source surface over one document.
pub struct RichTextEditor<P: EditorPlatform = ()> {
    mode: EditorMode,
    structured: StructuredSurface,
    raw: RawSurface,
    /// The form's plain-value field, written on submission.
    backing: String,
    insertion: InsertionMode,
    platform: P,
}

impl RichTextEditor<()> {
    pub fn new(initial_html: &str) -> Self {
        Self::with_platform(initial_html, InsertionMode::default(), ())
    }
}

impl<P: EditorPlatform> RichTextEditor<P> {
    pub fn with_platform(initial_html: &str, insertion: InsertionMode, platform: P) -> Self {
        let structured = StructuredSurface::new(initial_html);
        let raw = RawSurface::new(&structured.to_html());
        Self {
            mode: EditorMode::Rich,
            structured,
            raw,
            backing: initial_html.to_owned(),
            insertion,
            platform,
        }
    }

    pub fn with_insertion(mut self, insertion: InsertionMode) -> Self {
        self.insertion = insertion;
        self
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn insertion_mode(&self) -> InsertionMode {
        self.insertion
    }

    pub fn structured(&self) -> &StructuredSurface {
        &self.structured
    }

    pub fn structured_mut(&mut self) -> &mut StructuredSurface {
        &mut self.structured
    }

    pub fn raw(&self) -> &RawSurface {
        &self.raw
    }

    pub fn raw_mut(&mut self) -> &mut RawSurface {
        &mut self.raw
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Value currently held by the form's plain-value field.
    pub fn backing_value(&self) -> &str {
        &self.backing
    }

    /// Serialized content of whichever surface is active.
    pub fn active_value(&self) -> String {
        match self.mode {
            EditorMode::Rich => self.structured.to_html(),
            EditorMode::Raw => self.raw.text(),
        }
    }

    /// Switch to the other surface, returning the new mode.
    pub fn toggle_mode(&mut self) -> EditorMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// Switch to `mode`, copying the active surface's content into it.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if mode == self.mode {
            return;
        }
        match mode {
            EditorMode::Raw => self.raw.set_text(&self.structured.to_html()),
            EditorMode::Rich => self.structured.load(&self.raw.text()),
        }
        tracing::debug!(?mode, "editor mode switched");
        self.mode = mode;
    }

    /// Form submission hook: the backing field takes the active surface's value.
    pub fn submit(&mut self) -> &str {
        self.backing = self.active_value();
        &self.backing
    }

    /// Insert markup into the active surface according to the insertion mode.
    ///
    /// Afterwards the inactive surface mirrors the new content and the host is
    /// asked to focus the surface that received the insertion.
    pub fn insert_html(&mut self, html: &str) {
        if html.is_empty() {
            return;
        }

        let caret = match self.mode {
            EditorMode::Rich => {
                let nodes = Markup::parse(html).into_nodes();
                let caret = match self.insertion {
                    InsertionMode::AtCursor => self.structured.insert_at_caret(nodes),
                    InsertionMode::Append => self.structured.append(nodes),
                };
                self.raw.set_text(&self.structured.to_html());
                Caret::Structured(caret)
            }
            EditorMode::Raw => {
                let caret = match self.insertion {
                    InsertionMode::AtCursor => self.raw.insert_at_selection(html),
                    InsertionMode::Append => self.raw.append(html),
                };
                self.structured.load(&self.raw.text());
                Caret::Raw(caret)
            }
        };

        tracing::debug!(mode = ?self.mode, insertion = ?self.insertion, "inserted markup");
        self.platform.focus(self.mode, &caret);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::markup::{Node, TreePoint};
    use crate::types::Selection;

    #[derive(Default)]
    struct RecordingHost {
        focused: RefCell<Vec<(EditorMode, Caret)>>,
    }

    impl EditorPlatform for RecordingHost {
        fn focus(&self, mode: EditorMode, caret: &Caret) {
            self.focused.borrow_mut().push((mode, caret.clone()));
        }
    }

    const IMG: &str = "<p><img src=\"x.jpg\"></p>";

    #[test]
    fn test_starts_rich() {
        let editor = RichTextEditor::new("<p>hola</p>");
        assert_eq!(editor.mode(), EditorMode::Rich);
        assert_eq!(editor.raw().text(), "<p>hola</p>");
        assert_eq!(editor.backing_value(), "<p>hola</p>");
    }

    #[test]
    fn test_toggle_round_trip_without_edits() {
        let mut editor = RichTextEditor::new("<P>Saturno<br/>y <b>Júpiter");
        let before = editor.structured().to_html();

        assert_eq!(editor.toggle_mode(), EditorMode::Raw);
        assert_eq!(editor.raw().text(), before);
        assert_eq!(editor.toggle_mode(), EditorMode::Rich);
        assert_eq!(editor.structured().to_html(), before);
    }

    #[test]
    fn test_raw_edits_reach_structured_on_toggle() {
        let mut editor = RichTextEditor::new("<p>a</p>");
        editor.toggle_mode();
        editor.raw_mut().set_text("<h2>nuevo</h2>");
        editor.toggle_mode();
        assert_eq!(editor.structured().to_html(), "<h2>nuevo</h2>");
    }

    #[test]
    fn test_empty_raw_yields_empty_structured() {
        let mut editor = RichTextEditor::new("<p>a</p>");
        editor.toggle_mode();
        editor.raw_mut().set_text("");
        editor.toggle_mode();
        assert!(editor.structured().markup().is_empty());
    }

    #[test]
    fn test_submit_takes_active_surface() {
        let mut editor = RichTextEditor::new("<p>a</p>");

        // Raw edits that were never toggled back still win while raw is active.
        editor.toggle_mode();
        editor.raw_mut().set_text("<p>escrito en crudo</p>");
        assert_eq!(editor.submit(), "<p>escrito en crudo</p>");

        editor.toggle_mode();
        editor.toggle_mode();
        editor.toggle_mode();
        assert_eq!(editor.mode(), EditorMode::Rich);
        assert_eq!(editor.submit(), "<p>escrito en crudo</p>");
        assert_eq!(editor.backing_value(), "<p>escrito en crudo</p>");
    }

    #[test]
    fn test_insert_at_cursor_rich() {
        let host = RecordingHost::default();
        let mut editor = RichTextEditor::with_platform("<p>ab</p>", InsertionMode::AtCursor, host);
        editor
            .structured_mut()
            .set_caret(Some(TreePoint::new(vec![0, 0], 1)));

        editor.insert_html(IMG);

        assert_eq!(
            editor.structured().to_html(),
            "<p>a</p><p><img src=\"x.jpg\"></p><p>b</p>"
        );
        // The inactive raw surface mirrors the insertion.
        assert_eq!(editor.raw().text(), editor.structured().to_html());

        let focused = editor.platform().focused.borrow();
        assert_eq!(
            focused.as_slice(),
            &[(EditorMode::Rich, Caret::Structured(TreePoint::root(2)))]
        );
    }

    #[test]
    fn test_mid_paragraph_insertion_submits_flat_paragraphs() {
        let mut editor = RichTextEditor::new("<p>Antes después</p>");
        editor
            .structured_mut()
            .set_caret(Some(TreePoint::new(vec![0, 0], 6)));
        editor.insert_html("<p><a href=\"m42.jpg\"><img src=\"m42.jpg\"></a></p>");

        let submitted = editor.submit().to_owned();
        assert_eq!(
            submitted,
            "<p>Antes </p><p><a href=\"m42.jpg\"><img src=\"m42.jpg\"></a></p><p>después</p>"
        );
        let nested = Markup::parse(&submitted)
            .nodes()
            .iter()
            .filter_map(Node::as_element)
            .any(|p| p.children.iter().any(Node::is_block));
        assert!(!nested);
        // What the structured surface shows is what a browser rebuilds from the value.
        assert_eq!(Markup::parse(&submitted).to_html(), submitted);
    }

    #[test]
    fn test_insert_without_caret_goes_to_end() {
        let mut editor = RichTextEditor::new("<p>ab</p>");
        editor.insert_html(IMG);
        assert_eq!(editor.structured().to_html(), format!("<p>ab</p>{IMG}"));
    }

    #[test]
    fn test_append_ignores_caret() {
        let mut editor = RichTextEditor::new("<p>ab</p>").with_insertion(InsertionMode::Append);
        editor
            .structured_mut()
            .set_caret(Some(TreePoint::new(vec![0, 0], 1)));
        editor.insert_html(IMG);
        assert_eq!(editor.structured().to_html(), format!("<p>ab</p>{IMG}"));
    }

    #[test]
    fn test_insert_at_cursor_raw() {
        let host = RecordingHost::default();
        let mut editor = RichTextEditor::with_platform("<p>ab</p>", InsertionMode::AtCursor, host);
        editor.toggle_mode();
        editor.raw_mut().set_selection(Some(Selection::collapsed(9)));

        editor.insert_html(IMG);

        let expected = format!("<p>ab</p>{IMG}");
        assert_eq!(editor.raw().text(), expected);
        assert_eq!(editor.structured().to_html(), expected);

        let focused = editor.platform().focused.borrow();
        let caret = expected.chars().count();
        assert_eq!(focused.as_slice(), &[(EditorMode::Raw, Caret::Raw(caret))]);
    }

    #[test]
    fn test_append_raw_ignores_selection() {
        let mut editor = RichTextEditor::new("<p>ab</p>").with_insertion(InsertionMode::Append);
        editor.toggle_mode();
        editor.raw_mut().set_selection(Some(Selection::new(0, 3)));
        editor.insert_html("<hr>");
        assert_eq!(editor.raw().text(), "<p>ab</p><hr>");
    }

    #[test]
    fn test_empty_insert_is_noop() {
        let host = RecordingHost::default();
        let mut editor = RichTextEditor::with_platform("<p>ab</p>", InsertionMode::AtCursor, host);
        editor.insert_html("");
        assert_eq!(editor.structured().to_html(), "<p>ab</p>");
        assert!(editor.platform().focused.borrow().is_empty());
    }
}
