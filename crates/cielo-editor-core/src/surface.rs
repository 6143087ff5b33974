//! The two live representations of one editor document.
//!
//! Exactly one surface is editable at a time; the other is a mirror the
//! editor refreshes on mode transitions and insertions.

use crate::markup::{Markup, Node, TreePoint};
use crate::text::{EditorRope, TextBuffer};
use crate::types::Selection;

/// The plain-markup textarea view.
#[derive(Clone, Default)]
pub struct RawSurface {
    text: EditorRope,
    selection: Option<Selection>,
}

impl RawSurface {
    pub fn new(text: &str) -> Self {
        Self {
            text: EditorRope::from_str(text),
            selection: None,
        }
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    pub fn buffer(&self) -> &EditorRope {
        &self.text
    }

    /// Replace the whole text. Any selection is dropped.
    pub fn set_text(&mut self, text: &str) {
        self.text = EditorRope::from_str(text);
        self.selection = None;
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Text under the current selection, if any is non-empty.
    pub fn selected_text(&self) -> Option<String> {
        let sel = self.selection.filter(|sel| !sel.is_collapsed())?;
        self.text.slice(sel.to_range()).map(|s| s.to_string())
    }

    /// Record the host's selection, clamped to the current text.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection.map(|sel| sel.clamp(self.text.len_chars()));
    }

    /// Insert at the selection, replacing selected text, or at the end when
    /// there is none. Returns the caret offset after the inserted text.
    pub fn insert_at_selection(&mut self, text: &str) -> usize {
        match self.selection.map(|sel| sel.clamp(self.text.len_chars())) {
            Some(sel) => {
                let range = sel.to_range();
                if range.is_empty() {
                    self.text.insert(range.start, text);
                } else {
                    self.text.replace(range.clone(), text);
                }
                let caret = range.start + text.chars().count();
                self.selection = Some(Selection::collapsed(caret));
                caret
            }
            None => self.append(text),
        }
    }

    /// Append at the very end, ignoring the selection. Returns the caret offset.
    pub fn append(&mut self, text: &str) -> usize {
        self.text.push(text);
        let caret = self.text.len_chars();
        self.selection = Some(Selection::collapsed(caret));
        caret
    }
}

impl std::fmt::Debug for RawSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawSurface")
            .field("text", &self.text.to_string())
            .field("selection", &self.selection)
            .finish()
    }
}

/// The WYSIWYG view: a markup tree plus an optional live caret.
#[derive(Debug, Clone, Default)]
pub struct StructuredSurface {
    markup: Markup,
    caret: Option<TreePoint>,
}

impl StructuredSurface {
    pub fn new(html: &str) -> Self {
        Self {
            markup: Markup::parse(html),
            caret: None,
        }
    }

    /// Replace the content with parsed markup. Empty text yields an empty tree.
    pub fn load(&mut self, html: &str) {
        self.markup = Markup::parse(html);
        self.caret = None;
    }

    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    pub fn to_html(&self) -> String {
        self.markup.to_html()
    }

    pub fn caret(&self) -> Option<&TreePoint> {
        self.caret.as_ref()
    }

    pub fn set_caret(&mut self, caret: Option<TreePoint>) {
        self.caret = caret;
    }

    /// The caret, if it still addresses a real position in the tree.
    pub fn live_caret(&self) -> Option<&TreePoint> {
        self.caret.as_ref().filter(|c| self.markup.resolves(c))
    }

    /// Insert nodes at the live caret, or at the end when there is none.
    /// Returns the caret after the inserted nodes.
    pub fn insert_at_caret(&mut self, nodes: Vec<Node>) -> TreePoint {
        let inserted = match self.live_caret().cloned() {
            Some(point) => self.markup.insert_at(&point, nodes.clone()),
            None => None,
        };
        let caret = match inserted {
            Some(caret) => caret,
            None => self.markup.append(nodes),
        };
        self.caret = Some(caret.clone());
        caret
    }

    /// Append nodes at the end of the document. Returns the caret after them.
    pub fn append(&mut self, nodes: Vec<Node>) -> TreePoint {
        let caret = self.markup.append(nodes);
        self.caret = Some(caret.clone());
        caret
    }

    /// Type text at the live caret (or the end).
    pub fn type_text(&mut self, text: &str) {
        let point = self
            .live_caret()
            .cloned()
            .unwrap_or_else(|| self.markup.end_point());
        if let Some(caret) = self.markup.insert_text(&point, text) {
            self.caret = Some(caret);
        }
    }
}
