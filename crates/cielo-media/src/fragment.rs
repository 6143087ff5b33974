//! Markup emitted for inserted images.
//!
//! Each image becomes its own paragraph holding a link to the full-size file
//! around a size-bounded `<img>`:
//!
//! ```text
//! <p><a href="URL" target="_blank" rel="noopener"><img src="URL" alt="" style="..."></a></p>
//! ```

use cielo_editor_core::{Element, Markup, Node};

const IMAGE_STYLE: &str = "max-width: 100%; max-height: 480px; height: auto;";

pub fn fragment_node(url: &str) -> Node {
    let img = Element::new("img")
        .with_attr("src", url)
        .with_attr("alt", "")
        .with_attr("style", IMAGE_STYLE);
    let link = Element::new("a")
        .with_attr("href", url)
        .with_attr("target", "_blank")
        .with_attr("rel", "noopener")
        .with_child(img.into());
    Element::new("p").with_child(link.into()).into()
}

/// Markup for a single image.
pub fn build_fragment(url: &str) -> String {
    Markup::from_nodes(vec![fragment_node(url)]).to_html()
}

/// Fragments for every URL, in order, one per line.
pub fn build_insertion<I, S>(urls: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    urls.into_iter()
        .map(|url| build_fragment(url.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_shape() {
        insta::assert_snapshot!(
            build_fragment("/static/store/blog/m31.jpg"),
            @r#"<p><a href="/static/store/blog/m31.jpg" target="_blank" rel="noopener"><img src="/static/store/blog/m31.jpg" alt="" style="max-width: 100%; max-height: 480px; height: auto;"></a></p>"#
        );
    }

    #[test]
    fn test_url_is_escaped() {
        let html = build_fragment("/x.jpg\"><script>");
        assert!(html.contains("src=\"/x.jpg&quot;"));
        assert!(!html.contains("x.jpg\">"));
    }

    #[test]
    fn test_insertion_keeps_order() {
        let html = build_insertion(["x.jpg", "y.jpg"]);
        let x = html.find("src=\"x.jpg\"").unwrap();
        let y = html.find("src=\"y.jpg\"").unwrap();
        assert!(x < y);
        assert_eq!(html.matches("<p>").count(), 2);
        assert_eq!(build_insertion(Vec::<String>::new()), "");
    }
}
