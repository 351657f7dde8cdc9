//! @ai:module:intent Normalize a rendered fragment into one tagged annotation node
//! @ai:module:layer application
//! @ai:module:public_api wrap, RenderedAnnotation, BODY_CLASS, HIDDEN_CLASS, TITLE_CLASS
//! @ai:module:depends_on html, annotation, error
//! @ai:module:stateless true

use crate::annotation::AnnotationMeta;
use crate::error::Result;
use crate::html::{escape_text, parse_fragment, Element, Node};
use serde::Serialize;

/// Class of the container holding one rendered annotation body.
pub const BODY_CLASS: &str = "annotation_body";
/// Class added to the body container when its non-title content starts collapsed.
pub const HIDDEN_CLASS: &str = "annotation_hidden";
/// Class of the first element child of the body container.
pub const TITLE_CLASS: &str = "ann_title";

/// @ai:intent A wrapped annotation: body container plus the metadata read by the client script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedAnnotation {
    pub metadata_json: String,
    pub html: String,
}

impl RenderedAnnotation {
    /// @ai:intent Full annotation node: hidden JSON payload followed by the body container
    /// @ai:effects pure
    pub fn markup(&self) -> String {
        format!(
            "<div class=\"annotation\">\n<span style=\"display: none;\" class=\"data\">{}</span>\n{}\n</div>",
            escape_text(&self.metadata_json),
            self.html
        )
    }
}

/// @ai:intent Wrap a rendered fragment into a single annotation body container
/// @ai:post html is one div carrying BODY_CLASS, whose first element child carries TITLE_CLASS
/// @ai:post wrapping an already wrapped fragment with the same meta returns it unchanged
/// @ai:idempotent true
/// @ai:effects pure
pub fn wrap(fragment: &str, meta: &AnnotationMeta) -> Result<RenderedAnnotation> {
    let mut container = into_container(parse_fragment(fragment)).with_class(BODY_CLASS);
    if meta.hidden {
        container = container.with_class(HIDDEN_CLASS);
    }
    let container = promote_title(container);

    Ok(RenderedAnnotation {
        metadata_json: serde_json::to_string(meta)?,
        html: container.to_html(),
    })
}

/// @ai:intent Reuse a lone top-level div, or move every top-level node into a new div
/// @ai:post comments and blank text beside a reused div are dropped
fn into_container(mut nodes: Vec<Node>) -> Element {
    if let Some(index) = lone_div(&nodes) {
        if let Node::Element(div) = nodes.swap_remove(index) {
            return div;
        }
    }
    Element::new("div").with_children(trim_edges(nodes))
}

/// @ai:intent Index of the only significant node when that node is a div
fn lone_div(nodes: &[Node]) -> Option<usize> {
    let mut significant = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| !node.is_insignificant());
    match (significant.next(), significant.next()) {
        (Some((index, Node::Element(element))), None) if element.name == "div" => Some(index),
        _ => None,
    }
}

/// @ai:intent Drop whitespace-only text at both ends of a node list
fn trim_edges(mut nodes: Vec<Node>) -> Vec<Node> {
    let blank = |node: &Node| matches!(node, Node::Text(text) if text.trim().is_empty());
    while nodes.last().is_some_and(blank) {
        nodes.pop();
    }
    let leading = nodes.iter().take_while(|node| blank(*node)).count();
    nodes.drain(..leading);
    nodes
}

/// @ai:intent Tag the first element child as the title; text children are skipped
fn promote_title(container: Element) -> Element {
    let Element {
        name,
        attrs,
        children,
    } = container;

    let mut promoted = false;
    let children = children
        .into_iter()
        .map(|child| match child {
            Node::Element(element) if !promoted => {
                promoted = true;
                Node::Element(element.with_class(TITLE_CLASS))
            }
            other => other,
        })
        .collect();

    Element {
        name,
        attrs,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::RangeArg;
    use pretty_assertions::assert_eq;

    fn meta(hidden: bool) -> AnnotationMeta {
        AnnotationMeta {
            prefix: "ab".to_string(),
            hidden,
            args: Some(vec![RangeArg::line(1), RangeArg::chars(2, 0, 4)]),
        }
    }

    #[test]
    fn test_wraps_multiple_nodes() {
        let wrapped = wrap("<h1>Title</h1>\n<p>Body</p>\n", &meta(false)).unwrap();
        assert_eq!(
            wrapped.html,
            "<div class=\"annotation_body\"><h1 class=\"ann_title\">Title</h1>\n<p>Body</p></div>"
        );
    }

    #[test]
    fn test_reuses_lone_div() {
        let wrapped =
            wrap("\n<div id=\"n\" class=\"note\"><p>x</p></div>\n", &meta(false)).unwrap();
        assert_eq!(
            wrapped.html,
            "<div id=\"n\" class=\"note annotation_body\"><p class=\"ann_title\">x</p></div>"
        );
    }

    #[test]
    fn test_lone_div_drops_surrounding_comments() {
        let wrapped = wrap("<!-- note -->\n<div><p>x</p></div>", &meta(false)).unwrap();
        assert_eq!(
            wrapped.html,
            "<div class=\"annotation_body\"><p class=\"ann_title\">x</p></div>"
        );
    }

    #[test]
    fn test_hidden_class() {
        let wrapped = wrap("<p>a</p><p>b</p>", &meta(true)).unwrap();
        assert!(wrapped
            .html
            .starts_with("<div class=\"annotation_body annotation_hidden\">"));
    }

    #[test]
    fn test_title_skips_leading_text() {
        let wrapped =
            wrap("plain words <em>then</em> <strong>more</strong>", &meta(false)).unwrap();
        assert_eq!(
            wrapped.html,
            "<div class=\"annotation_body\">plain words <em class=\"ann_title\">then</em> <strong>more</strong></div>"
        );
    }

    #[test]
    fn test_wrap_is_idempotent() {
        for hidden in [false, true] {
            let once =
                wrap("<h2>T</h2>\n<p>one</p>\n<ul><li>x</li></ul>\n", &meta(hidden)).unwrap();
            let twice = wrap(&once.html, &meta(hidden)).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_empty_fragment() {
        let wrapped = wrap("", &meta(false)).unwrap();
        assert_eq!(wrapped.html, "<div class=\"annotation_body\"></div>");
    }

    #[test]
    fn test_metadata_payload() {
        let wrapped = wrap("<p>x</p>", &meta(false)).unwrap();
        assert_eq!(
            wrapped.metadata_json,
            r#"{"prefix":"ab","hidden":false,"args":[{"line":1,"beg":null,"end":null},{"line":2,"beg":0,"end":4}]}"#
        );
        assert!(wrapped.markup().contains(
            r#"<span style="display: none;" class="data">{"prefix":"ab","#
        ));
    }
}
