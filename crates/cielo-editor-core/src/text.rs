//! Text buffer abstraction for the raw surface.
//!
//! The raw surface is a plain markup textarea. `TextBuffer` keeps it
//! independent of the storage backend so the browser layer can swap in its
//! own buffer if it needs to.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;

/// An editable text buffer.
///
/// All offsets are in Unicode scalar values (chars), not bytes or UTF-16.
pub trait TextBuffer {
    /// Total length in chars (Unicode scalar values).
    fn len_chars(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Insert text at char offset.
    fn insert(&mut self, char_offset: usize, text: &str);

    /// Append text at end.
    fn push(&mut self, text: &str) {
        self.insert(self.len_chars(), text);
    }

    /// Delete char range.
    fn delete(&mut self, char_range: Range<usize>);

    /// Replace char range with text.
    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.delete(char_range.clone());
        self.insert(char_range.start, text);
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    /// Convert entire buffer to String.
    fn to_string(&self) -> String;
}

/// Ropey-backed text buffer.
#[derive(Clone, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }

    pub fn rope(&self) -> &ropey::Rope {
        &self.rope
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.rope.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        self.rope.remove(char_range);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EditorRope {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut rope = EditorRope::from_str("<p>hola</p>");
        assert_eq!(rope.len_chars(), 11);

        rope.insert(7, " cielo");
        assert_eq!(rope.to_string(), "<p>hola cielo</p>");

        rope.delete(7..13);
        assert_eq!(rope.to_string(), "<p>hola</p>");
    }

    #[test]
    fn test_slice_bounds() {
        let rope = EditorRope::from_str("nebulosa");
        assert_eq!(rope.slice(0..4).as_deref(), Some("nebu"));
        assert_eq!(rope.slice(0..100), None);
        assert_eq!(rope.slice(5..3), None);
    }

    #[test]
    fn test_offsets_are_chars() {
        let mut rope = EditorRope::from_str("Orión");
        assert_eq!(rope.len_chars(), 5);
        rope.insert(4, "ó");
        assert_eq!(rope.to_string(), "Orióón");
    }

    #[test]
    fn test_replace_and_push() {
        let mut rope = EditorRope::from_str("M31 y M42");
        rope.replace(6..9, "M45");
        assert_eq!(rope.to_string(), "M31 y M45");
        rope.push("!");
        assert_eq!(rope.to_string(), "M31 y M45!");
    }
}
