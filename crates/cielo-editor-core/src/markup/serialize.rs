//! innerHTML-shaped serialization.

use std::fmt;

use markdown_weaver_escape::{FmtWriter, StrWrite, escape_html, escape_html_body_text};

use super::{Element, Markup, Node};

impl Markup {
    /// Write the tree as HTML into any `StrWrite` sink.
    pub fn write_html<W: StrWrite>(&self, w: &mut W) -> Result<(), W::Error> {
        write_nodes(w, &self.nodes, false)
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_html(&mut FmtWriter(f))
    }
}

fn write_nodes<W: StrWrite>(w: &mut W, nodes: &[Node], raw: bool) -> Result<(), W::Error> {
    for node in nodes {
        match node {
            Node::Element(el) => write_element(w, el)?,
            Node::Text(text) if raw => w.write_str(text)?,
            Node::Text(text) => escape_html_body_text(&mut *w, text)?,
            Node::Comment(text) => {
                w.write_str("<!--")?;
                w.write_str(text)?;
                w.write_str("-->")?;
            }
        }
    }
    Ok(())
}

fn write_element<W: StrWrite>(w: &mut W, el: &Element) -> Result<(), W::Error> {
    w.write_str("<")?;
    w.write_str(&el.name)?;
    for (name, value) in &el.attrs {
        w.write_str(" ")?;
        w.write_str(name)?;
        w.write_str("=\"")?;
        escape_html(&mut *w, value)?;
        w.write_str("\"")?;
    }
    w.write_str(">")?;

    if el.is_void() {
        return Ok(());
    }

    write_nodes(w, &el.children, el.is_raw_text())?;
    w.write_str("</")?;
    w.write_str(&el.name)?;
    w.write_str(">")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_output() {
        let markup = Markup::from_nodes(vec![
            Element::new("p")
                .with_child(
                    Element::new("a")
                        .with_attr("href", "/static/store/blog/a b.jpg")
                        .with_child(Element::new("img").with_attr("alt", "\"M31\"").into())
                        .into(),
                )
                .into(),
            Node::Comment(" fin ".into()),
        ]);
        insta::assert_snapshot!(
            markup.to_html(),
            @r#"<p><a href="/static/store/blog/a b.jpg"><img alt="&quot;M31&quot;"></a></p><!-- fin -->"#
        );
    }

    #[test]
    fn test_void_children_are_not_written() {
        let img = Element::new("img").with_child(Node::text("lost"));
        let markup = Markup::from_nodes(vec![img.into()]);
        assert_eq!(markup.to_html(), "<img>");
    }

    #[test]
    fn test_raw_text_is_not_escaped() {
        let markup = Markup::parse("<script>a < b && c</script>");
        assert_eq!(markup.to_html(), "<script>a < b && c</script>");
    }
}
