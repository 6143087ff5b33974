//! Lenient markup parser.
//!
//! Works on byte offsets; every position it slices at is an ASCII delimiter,
//! so slices always land on char boundaries.

use std::borrow::Cow;

use smol_str::SmolStr;

use super::{Element, MarkupIssue, Node, RAW_TEXT_ELEMENTS, VOID_ELEMENTS};

/// An open `p` above one of these is out of reach of an implied end tag.
const BUTTON_SCOPE: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "table", "td", "template", "th",
];

/// Same as [`BUTTON_SCOPE`], plus the lists that own an `li`.
const LIST_ITEM_SCOPE: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "ol", "table", "td", "template",
    "th", "ul",
];

pub(super) struct Issue {
    pub kind: MarkupIssue,
    pub offset: usize,
    pub len: usize,
}

struct StartTag {
    element: Element,
    end: usize,
}

pub(super) struct Parser<'a> {
    src: &'a str,
    pos: usize,
    root: Vec<Node>,
    /// Open elements with the byte offset of their start tag.
    stack: Vec<(Element, usize)>,
    issues: Vec<Issue>,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            root: Vec::new(),
            stack: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn run(mut self) -> (Vec<Node>, Vec<Issue>) {
        while self.pos < self.src.len() {
            let rest = &self.src[self.pos..];
            if rest.starts_with("<!--") {
                self.comment();
            } else if rest.starts_with("</") {
                self.end_tag();
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.bogus();
            } else if rest.starts_with('<') && starts_tag_name(&rest[1..]) {
                self.start_tag();
            } else {
                self.text();
            }
        }

        while let Some((element, offset)) = self.stack.pop() {
            self.issues.push(Issue {
                kind: MarkupIssue::Unclosed(element.name.clone()),
                offset,
                len: element.name.len() + 1,
            });
            self.push(Node::Element(element));
        }

        (self.root, self.issues)
    }

    fn push(&mut self, node: Node) {
        let siblings = match self.stack.last_mut() {
            Some((open, _)) => &mut open.children,
            None => &mut self.root,
        };
        if let Node::Text(text) = &node {
            if let Some(Node::Text(prev)) = siblings.last_mut() {
                prev.push_str(text);
                return;
            }
        }
        siblings.push(node);
    }

    fn text(&mut self) {
        // A lone '<' that starts nothing is text; consume at least one char.
        let skip = if self.src[self.pos..].starts_with('<') { 1 } else { 0 };
        let end = self.src[self.pos + skip..]
            .find('<')
            .map(|i| self.pos + skip + i)
            .unwrap_or(self.src.len());
        let text = decode_entities(&self.src[self.pos..end]).into_owned();
        self.push(Node::Text(text));
        self.pos = end;
    }

    fn comment(&mut self) {
        let start = self.pos;
        let body_start = start + 4;
        let body = &self.src[body_start..];

        // `<!-->` and `<!--->` are empty comments.
        if body.starts_with('>') {
            self.pos = body_start + 1;
            self.push(Node::Comment(String::new()));
            return;
        }
        if body.starts_with("->") {
            self.pos = body_start + 2;
            self.push(Node::Comment(String::new()));
            return;
        }

        match body.find("-->") {
            Some(i) => {
                self.push(Node::Comment(body[..i].to_owned()));
                self.pos = body_start + i + 3;
            }
            None => {
                self.issues.push(Issue {
                    kind: MarkupIssue::UnterminatedComment,
                    offset: start,
                    len: 4,
                });
                self.push(Node::Comment(body.to_owned()));
                self.pos = self.src.len();
            }
        }
    }

    /// `<!DOCTYPE ...>` and `<?...>` carry nothing a fragment keeps.
    fn bogus(&mut self) {
        self.pos = self.src[self.pos..]
            .find('>')
            .map(|i| self.pos + i + 1)
            .unwrap_or(self.src.len());
    }

    fn end_tag(&mut self) {
        let start = self.pos;
        let Some(close) = self.src[start..].find('>') else {
            self.issues.push(Issue {
                kind: MarkupIssue::UnterminatedTag,
                offset: start,
                len: self.src.len() - start,
            });
            self.text();
            return;
        };
        let end = start + close + 1;
        let name = tag_name(&self.src[start + 2..end - 1]);
        self.pos = end;

        if name.is_empty() {
            return;
        }

        match self.stack.iter().rposition(|(open, _)| open.name == name) {
            Some(depth) => self.close_to(depth),
            None => {
                tracing::trace!(%name, offset = start, "dropping unmatched close tag");
                self.issues.push(Issue {
                    kind: MarkupIssue::UnmatchedClose(name),
                    offset: start,
                    len: end - start,
                });
            }
        }
    }

    fn start_tag(&mut self) {
        let start = self.pos;
        let Some(tag) = self.scan_start_tag(start) else {
            self.issues.push(Issue {
                kind: MarkupIssue::UnterminatedTag,
                offset: start,
                len: self.src.len() - start,
            });
            self.text();
            return;
        };
        self.pos = tag.end;
        let element = tag.element;

        if element.name == "li" {
            self.close_in_scope("li", LIST_ITEM_SCOPE);
        }
        if element.is_block() {
            self.close_in_scope("p", BUTTON_SCOPE);
        }

        if VOID_ELEMENTS.contains(&element.name.as_str()) {
            self.push(Node::Element(element));
        } else if RAW_TEXT_ELEMENTS.contains(&element.name.as_str()) {
            self.raw_text(element);
        } else {
            self.stack.push((element, start));
        }
    }

    /// Pop open elements down to, and including, the one at `depth`.
    fn close_to(&mut self, depth: usize) {
        while self.stack.len() > depth {
            if let Some((element, _)) = self.stack.pop() {
                self.push(Node::Element(element));
            }
        }
    }

    /// Close the innermost open `name`, unless a `boundaries` element is
    /// opened after it.
    fn close_in_scope(&mut self, name: &str, boundaries: &[&str]) {
        for depth in (0..self.stack.len()).rev() {
            let open = self.stack[depth].0.name.as_str();
            if open == name {
                tracing::trace!(%name, "implied end tag");
                self.close_to(depth);
                return;
            }
            if boundaries.contains(&open) {
                return;
            }
        }
    }

    fn raw_text(&mut self, mut element: Element) {
        let pattern = format!("</{}", element.name);
        let body = &self.src[self.pos..];
        let close = body
            .as_bytes()
            .windows(pattern.len())
            .position(|w| w.eq_ignore_ascii_case(pattern.as_bytes()));

        let content_end = close.map(|i| self.pos + i).unwrap_or(self.src.len());
        let content = &self.src[self.pos..content_end];
        if !content.is_empty() {
            element.children.push(Node::Text(content.to_owned()));
        }
        self.pos = self.src[content_end..]
            .find('>')
            .map(|i| content_end + i + 1)
            .unwrap_or(self.src.len());
        self.push(Node::Element(element));
    }

    fn scan_start_tag(&self, start: usize) -> Option<StartTag> {
        let bytes = self.src.as_bytes();
        let mut i = start + 1;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        let mut element = Element::new(SmolStr::new(self.src[start + 1..i].to_ascii_lowercase()));

        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match *bytes.get(i)? {
                b'>' => return Some(StartTag { element, end: i + 1 }),
                b'/' => {
                    // Self-closing syntax means nothing on non-void elements.
                    i += 1;
                    continue;
                }
                _ => {}
            }

            // Attribute name: the first char is taken as-is, even '='.
            let name_start = i;
            i += self.src[i..].chars().next()?.len_utf8();
            while i < bytes.len() && !matches!(bytes[i], b'=' | b'>' | b'/') && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let name = SmolStr::new(self.src[name_start..i].to_ascii_lowercase());

            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let mut value = String::new();
            if bytes.get(i) == Some(&b'=') {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                match *bytes.get(i)? {
                    quote @ (b'"' | b'\'') => {
                        let close = self.src[i + 1..].find(quote as char)?;
                        value = decode_entities(&self.src[i + 1..i + 1 + close]).into_owned();
                        i += close + 2;
                    }
                    _ => {
                        let value_start = i;
                        while i < bytes.len() && bytes[i] != b'>' && !bytes[i].is_ascii_whitespace() {
                            i += 1;
                        }
                        value = decode_entities(&self.src[value_start..i]).into_owned();
                    }
                }
            }

            if element.attr(&name).is_none() {
                element.attrs.push((name, value));
            }
        }
    }
}

fn starts_tag_name(s: &str) -> bool {
    s.as_bytes().first().is_some_and(|b| b.is_ascii_alphabetic())
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b':' | b'_')
}

fn tag_name(s: &str) -> SmolStr {
    let end = s.bytes().position(|b| !is_name_byte(b)).unwrap_or(s.len());
    SmolStr::new(s[..end].to_ascii_lowercase())
}

/// Decode the character references the site's editors produce.
///
/// Unknown references are kept verbatim; numeric references that do not name
/// a scalar value decode to U+FFFD.
pub(crate) fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest[1..]
            .find(';')
            .filter(|&semi| semi > 0 && semi <= 32)
            .and_then(|semi| decode_reference(&rest[1..1 + semi]).map(|c| (c, semi + 2)));

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return Some(match code {
            0 => '\u{FFFD}',
            c => char::from_u32(c).unwrap_or('\u{FFFD}'),
        });
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{A0}'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&#233;&#xE9;"), "éé");
        assert_eq!(decode_entities("&bogus; &"), "&bogus; &");
        assert_eq!(decode_entities("&#0;"), "\u{FFFD}");
        assert!(matches!(decode_entities("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_attributes() {
        let (nodes, issues) = Parser::new(r#"<img SRC=a.jpg alt='M 42' data-x="1&amp;2" src="dup" hidden>"#).run();
        assert!(issues.is_empty());
        let img = nodes[0].as_element().unwrap();
        let attrs: Vec<(&str, &str)> = img
            .attrs
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            attrs,
            vec![("src", "a.jpg"), ("alt", "M 42"), ("data-x", "1&2"), ("hidden", "")]
        );
    }

    #[test]
    fn test_unmatched_close_closes_intermediate() {
        let (nodes, issues) = Parser::new("<div><p>a</div>b").run();
        assert!(issues.is_empty());
        assert_eq!(nodes.len(), 2);
        let div = nodes[0].as_element().unwrap();
        assert_eq!(div.children[0].as_element().unwrap().name, "p");
        assert_eq!(nodes[1], Node::text("b"));
    }

    #[test]
    fn test_block_start_closes_paragraph() {
        let (nodes, issues) = Parser::new("<p>a<p>b<div>c</div><p><em>d<h2>e</h2>").run();
        assert!(issues.is_empty());
        let names: Vec<&str> = nodes
            .iter()
            .map(|n| n.as_element().unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["p", "p", "div", "p", "h2"]);
        assert_eq!(nodes[1].as_element().unwrap().children, vec![Node::text("b")]);
        let em = nodes[3].as_element().unwrap().children[0].as_element().unwrap();
        assert_eq!(em.children, vec![Node::text("d")]);
    }

    #[test]
    fn test_paragraph_inside_table_cell_is_out_of_scope() {
        let (nodes, _) = Parser::new("<p>x<table><tr><td><p>y</td></tr></table>").run();
        let p = nodes[0].as_element().unwrap();
        assert_eq!(p.children, vec![Node::text("x")]);
        assert_eq!(nodes[1].as_element().unwrap().name, "table");
    }

    #[test]
    fn test_list_item_closes_previous_item() {
        let (nodes, _) = Parser::new("<ul><li>uno<li>dos<ol><li>a<li>b</ol></ul>").run();
        let ul = nodes[0].as_element().unwrap();
        assert_eq!(ul.children.len(), 2);
        let dos = ul.children[1].as_element().unwrap();
        assert_eq!(dos.children[0], Node::text("dos"));
        let ol = dos.children[1].as_element().unwrap();
        assert_eq!(ol.children.len(), 2);
    }

    #[test]
    fn test_raw_text_content() {
        let (nodes, _) = Parser::new("<style>p > a { color: red }</STYLE>x").run();
        let style = nodes[0].as_element().unwrap();
        assert_eq!(style.children, vec![Node::text("p > a { color: red }")]);
        assert_eq!(nodes[1], Node::text("x"));
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        let (nodes, issues) = Parser::new("1 < 2 <3").run();
        assert!(issues.is_empty());
        assert_eq!(nodes, vec![Node::text("1 < 2 <3")]);
    }
}
