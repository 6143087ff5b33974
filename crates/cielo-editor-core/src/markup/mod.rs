//! Markup tree backing the structured surface.
//!
//! The structured surface stores the document as a tree of nodes, the way a
//! contenteditable element holds a DOM. Parsing is total: any string produces
//! a tree, and serializing that tree follows innerHTML conventions so that
//! `serialize(parse(serialize(tree)))` is `serialize(tree)` for every tree the
//! parser and the editing operations produce. Neither leaves a block element
//! inside a `p`.

mod parse;
mod serialize;

use miette::{Diagnostic, NamedSource, SourceSpan};
use smol_str::SmolStr;

/// Elements that never have children and serialize without a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is raw text: not parsed for tags, not escaped.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Block elements. Their start tag closes an open `p`, and inserting one
/// inside a `p` splits the paragraph.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hgroup", "hr", "li", "main", "menu", "nav", "ol", "p", "pre", "section", "summary",
    "table", "ul",
];

/// A single node of the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_block(&self) -> bool {
        self.as_element().is_some_and(Element::is_block)
    }
}

/// An element with lowercased name and attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: SmolStr,
    pub attrs: Vec<(SmolStr, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }

    pub fn is_raw_text(&self) -> bool {
        RAW_TEXT_ELEMENTS.contains(&self.name.as_str())
    }

    pub fn is_block(&self) -> bool {
        BLOCK_ELEMENTS.contains(&self.name.as_str())
    }

    /// Same name and attributes, different children.
    fn with_children(&self, children: Vec<Node>) -> Element {
        Element {
            name: self.name.clone(),
            attrs: self.attrs.clone(),
            children,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// A caret position inside a markup tree.
///
/// `path` names a node by child indices from the root. For an element (or
/// the root, when `path` is empty) `offset` is a child index; for a text node
/// it is a char offset into the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TreePoint {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl TreePoint {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }

    /// A point among the root's children.
    pub fn root(offset: usize) -> Self {
        Self {
            path: Vec::new(),
            offset,
        }
    }
}

/// Structural problem found while parsing markup.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupIssue {
    #[error("unterminated tag")]
    UnterminatedTag,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("closing tag </{0}> has no matching open element")]
    UnmatchedClose(SmolStr),
    #[error("<{0}> is never closed")]
    Unclosed(SmolStr),
}

/// Raised only by [`Markup::parse_strict`]; the lenient parser repairs instead.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[error("suspicious markup: {kind}")]
#[diagnostic(code(cielo::markup))]
pub struct MarkupError {
    kind: MarkupIssue,
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    at: SourceSpan,
}

impl MarkupError {
    pub(crate) fn new(kind: MarkupIssue, src: &str, offset: usize, len: usize) -> Self {
        Self {
            kind,
            src: NamedSource::new("document", src.to_owned()),
            at: SourceSpan::new(offset.into(), len),
        }
    }

    pub fn kind(&self) -> &MarkupIssue {
        &self.kind
    }

    pub fn offset(&self) -> usize {
        self.at.offset()
    }
}

/// An ordered list of top-level nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup {
    nodes: Vec<Node>,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse markup, repairing structural problems the way a browser would.
    pub fn parse(src: &str) -> Self {
        let (nodes, _issues) = parse::Parser::new(src).run();
        Self { nodes }
    }

    /// Parse markup, failing on the first structural problem.
    pub fn parse_strict(src: &str) -> Result<Self, MarkupError> {
        let (nodes, issues) = parse::Parser::new(src).run();
        match issues.into_iter().next() {
            Some(issue) => Err(MarkupError::new(issue.kind, src, issue.offset, issue.len)),
            None => Ok(Self { nodes }),
        }
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serialize to an innerHTML-shaped string.
    pub fn to_html(&self) -> String {
        self.to_string()
    }

    /// Concatenated text of every text node, in document order.
    pub fn text_content(&self) -> String {
        fn collect(nodes: &[Node], out: &mut String) {
            for node in nodes {
                match node {
                    Node::Text(t) => out.push_str(t),
                    Node::Element(el) => collect(&el.children, out),
                    Node::Comment(_) => {}
                }
            }
        }
        let mut out = String::new();
        collect(&self.nodes, &mut out);
        out
    }

    /// The point after the last top-level node.
    pub fn end_point(&self) -> TreePoint {
        TreePoint::root(self.nodes.len())
    }

    /// Look up the node a path names. The empty path names no node.
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.nodes.get(first)?;
        for &idx in rest {
            node = match node {
                Node::Element(el) => el.children.get(idx)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Whether a caret at `point` addresses a real position in this tree.
    pub fn resolves(&self, point: &TreePoint) -> bool {
        if point.path.is_empty() {
            return point.offset <= self.nodes.len();
        }
        match self.node_at(&point.path) {
            Some(Node::Text(t)) => point.offset <= t.chars().count(),
            Some(Node::Element(el)) if !el.is_void() => point.offset <= el.children.len(),
            _ => false,
        }
    }

    fn children_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        let mut children = &mut self.nodes;
        for &idx in path {
            match children.get_mut(idx)? {
                Node::Element(el) if !el.is_void() => children = &mut el.children,
                _ => return None,
            }
        }
        Some(children)
    }

    /// Insert nodes at a caret, splitting a text node when the caret is inside one.
    ///
    /// Block nodes never land inside a `p`: the nearest enclosing paragraph is
    /// split at the caret and the nodes go between its two halves. Empty
    /// halves are dropped.
    ///
    /// Returns the caret immediately after the inserted nodes, or `None` when
    /// the point does not resolve (the tree is left untouched in that case).
    pub fn insert_at(&mut self, point: &TreePoint, nodes: Vec<Node>) -> Option<TreePoint> {
        if !self.resolves(point) {
            return None;
        }
        if nodes.iter().any(Node::is_block) {
            if let Some(depth) = self.enclosing_paragraph(point) {
                return self.split_paragraph(point, depth, nodes);
            }
        }

        let inserted = nodes.len();

        if let Some((&last, parent_path)) = point.path.split_last() {
            if let Some(Node::Text(text)) = self.node_at(&point.path) {
                let split = char_to_byte(text, point.offset)?;
                let (before, after) = (text[..split].to_owned(), text[split..].to_owned());

                let mut replacement = Vec::with_capacity(inserted + 2);
                if !before.is_empty() {
                    replacement.push(Node::Text(before));
                }
                let caret = last + replacement.len() + inserted;
                replacement.extend(nodes);
                if !after.is_empty() {
                    replacement.push(Node::Text(after));
                }

                let siblings = self.children_mut(parent_path)?;
                siblings.splice(last..=last, replacement);
                return Some(TreePoint::new(parent_path.to_vec(), caret));
            }
        }

        let children = self.children_mut(&point.path)?;
        if point.offset > children.len() {
            return None;
        }
        children.splice(point.offset..point.offset, nodes);
        Some(TreePoint::new(point.path.clone(), point.offset + inserted))
    }

    /// Path length of the innermost `p` holding the caret.
    fn enclosing_paragraph(&self, point: &TreePoint) -> Option<usize> {
        let deepest = match self.node_at(&point.path) {
            Some(Node::Text(_)) => point.path.len() - 1,
            _ => point.path.len(),
        };
        (1..=deepest).rev().find(|&depth| {
            matches!(self.node_at(&point.path[..depth]), Some(Node::Element(el)) if el.name == "p")
        })
    }

    fn split_paragraph(
        &mut self,
        point: &TreePoint,
        depth: usize,
        nodes: Vec<Node>,
    ) -> Option<TreePoint> {
        let (&index, parent_path) = point.path[..depth].split_last()?;
        let paragraph = self.node_at(&point.path[..depth])?.as_element()?;
        let (before, after) =
            split_children(&paragraph.children, &point.path[depth..], point.offset)?;

        let mut replacement = Vec::with_capacity(nodes.len() + 2);
        if !before.is_empty() {
            replacement.push(paragraph.with_children(before).into());
        }
        let caret = index + replacement.len() + nodes.len();
        let tail = (!after.is_empty()).then(|| Node::from(paragraph.with_children(after)));
        replacement.extend(nodes);
        replacement.extend(tail);

        tracing::trace!(path = ?&point.path[..depth], "splitting paragraph around block insertion");
        self.children_mut(parent_path)?.splice(index..=index, replacement);
        Some(TreePoint::new(parent_path.to_vec(), caret))
    }

    /// Append nodes after the last top-level node, returning the caret after them.
    pub fn append(&mut self, nodes: Vec<Node>) -> TreePoint {
        self.nodes.extend(nodes);
        self.end_point()
    }

    /// Type text at a caret. Inside a text node the text grows in place.
    pub fn insert_text(&mut self, point: &TreePoint, text: &str) -> Option<TreePoint> {
        if let Some((&last, parent_path)) = point.path.split_last() {
            let siblings = self.children_mut(parent_path)?;
            if let Some(Node::Text(existing)) = siblings.get_mut(last) {
                let at = char_to_byte(existing, point.offset)?;
                existing.insert_str(at, text);
                return Some(TreePoint::new(
                    point.path.clone(),
                    point.offset + text.chars().count(),
                ));
            }
        }
        self.insert_at(point, vec![Node::text(text)])
    }
}

/// Split `children` at a caret given relative to their parent, copying the
/// elements the caret sits in onto both sides.
fn split_children(
    children: &[Node],
    path: &[usize],
    offset: usize,
) -> Option<(Vec<Node>, Vec<Node>)> {
    let Some((&index, rest)) = path.split_first() else {
        if offset > children.len() {
            return None;
        }
        return Some((children[..offset].to_vec(), children[offset..].to_vec()));
    };

    let mut before = children.get(..index)?.to_vec();
    let mut after = Vec::new();
    match children.get(index)? {
        Node::Text(text) if rest.is_empty() => {
            let split = char_to_byte(text, offset)?;
            if split > 0 {
                before.push(Node::Text(text[..split].to_owned()));
            }
            if split < text.len() {
                after.push(Node::Text(text[split..].to_owned()));
            }
        }
        Node::Element(el) if !el.is_void() => {
            let (left, right) = split_children(&el.children, rest, offset)?;
            if !left.is_empty() {
                before.push(el.with_children(left).into());
            }
            if !right.is_empty() {
                after.push(el.with_children(right).into());
            }
        }
        _ => return None,
    }
    after.extend_from_slice(&children[index + 1..]);
    Some((before, after))
}

fn char_to_byte(text: &str, char_offset: usize) -> Option<usize> {
    if char_offset == 0 {
        return Some(0);
    }
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(char_offset)
}
