//! cielo-editor-core: editor state for the site's admin editors, free of any UI framework.
//!
//! This crate provides:
//! - `Markup` - a small HTML tree with innerHTML-shaped serialization
//! - `TextBuffer` trait and the ropey-backed `EditorRope` for the raw surface
//! - `StructuredSurface` / `RawSurface` - the two live views of one document
//! - `RichTextEditor` - the rich/raw mode state machine and insertion contract
//! - `EditorRegistry` - explicit form → editor lookup used by the media panel

pub mod editor;
pub mod markup;
pub mod platform;
pub mod registry;
pub mod surface;
pub mod text;
pub mod types;

pub use editor::{EditorMode, InsertionMode, RichTextEditor};
pub use markup::{Element, Markup, MarkupError, Node, TreePoint};
pub use platform::{Caret, EditorPlatform};
pub use registry::{EditorRegistry, FormId};
pub use smol_str::SmolStr;
pub use surface::{RawSurface, StructuredSurface};
pub use text::{EditorRope, TextBuffer};
pub use types::Selection;
