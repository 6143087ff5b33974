//! Form → editor lookup.
//!
//! A media panel never walks the page looking for "the editor in my form";
//! the page registers each editor under its form's identity and the panel
//! asks the registry.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::editor::RichTextEditor;
use crate::platform::EditorPlatform;

/// Identity of the form (or container) an editor belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(SmolStr);

impl FormId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FormId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

pub struct EditorRegistry<P: EditorPlatform = ()> {
    editors: HashMap<FormId, RichTextEditor<P>>,
}

impl<P: EditorPlatform> Default for EditorRegistry<P> {
    fn default() -> Self {
        Self {
            editors: HashMap::new(),
        }
    }
}

impl<P: EditorPlatform> EditorRegistry<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an editor to a form, returning the editor it replaced, if any.
    pub fn register(
        &mut self,
        form: FormId,
        editor: RichTextEditor<P>,
    ) -> Option<RichTextEditor<P>> {
        self.editors.insert(form, editor)
    }

    pub fn unregister(&mut self, form: &FormId) -> Option<RichTextEditor<P>> {
        self.editors.remove(form)
    }

    pub fn get(&self, form: &FormId) -> Option<&RichTextEditor<P>> {
        self.editors.get(form)
    }

    pub fn get_mut(&mut self, form: &FormId) -> Option<&mut RichTextEditor<P>> {
        self.editors.get_mut(form)
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Run the insertion contract on the editor bound to `form`.
    ///
    /// Returns false, touching nothing, when no editor is bound.
    pub fn insert_into(&mut self, form: &FormId, html: &str) -> bool {
        match self.editors.get_mut(form) {
            Some(editor) => {
                editor.insert_html(html);
                true
            }
            None => {
                tracing::debug!(%form, "no editor bound to form, skipping insertion");
                false
            }
        }
    }
}
