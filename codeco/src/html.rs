//! @ai:module:intent Owned HTML node tree: fragment parsing and serialization
//! @ai:module:layer infrastructure
//! @ai:module:public_api Node, Element, parse_fragment, serialize, escape_text, escape_attr
//! @ai:module:stateless true
//!
//! Fragments are parsed with html5ever into an `RcDom` and immediately
//! converted into plain owned values. Transformations then build new nodes
//! instead of mutating shared handles.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// @ai:intent One HTML node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// @ai:intent An HTML element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Node {
    /// @ai:intent Check if the node carries no visible content (whitespace text or comment)
    pub fn is_insignificant(&self) -> bool {
        match self {
            Node::Text(text) => text.trim().is_empty(),
            Node::Comment(_) => true,
            Node::Element(_) => false,
        }
    }

    /// @ai:intent Serialize this node and its subtree
    /// @ai:effects pure
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(self, None, &mut out);
        out
    }
}

impl Element {
    /// @ai:intent Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// @ai:intent Read an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// @ai:intent List the classes of the element in attribute order
    pub fn classes(&self) -> Vec<&str> {
        self.attr("class")
            .map(|value| value.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().contains(&class)
    }

    /// @ai:intent Return the element with `class` added to its class set
    /// @ai:post adding a class that is already present leaves the element unchanged
    /// @ai:idempotent true
    pub fn with_class(mut self, class: &str) -> Self {
        if self.has_class(class) {
            return self;
        }
        match self.attrs.iter_mut().find(|(key, _)| key == "class") {
            Some((_, value)) if !value.trim().is_empty() => {
                value.push(' ');
                value.push_str(class);
            }
            Some((_, value)) => *value = class.to_string(),
            None => self.attrs.push(("class".to_string(), class.to_string())),
        }
        self
    }

    /// @ai:intent Return the element with the given children
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// @ai:intent Serialize this element and its subtree
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

/// @ai:intent Parse an HTML fragment into its top-level nodes
/// @ai:post nodes the parser hoists into <head> come before body content
/// @ai:edge_cases malformed markup is repaired the way browsers repair it, never rejected
/// @ai:effects pure
pub fn parse_fragment(fragment: &str) -> Vec<Node> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(fragment);

    let mut nodes = Vec::new();
    for child in dom.document.children.borrow().iter() {
        if let NodeData::Element { name, .. } = &child.data {
            if &*name.local == "html" {
                for section in child.children.borrow().iter() {
                    nodes.extend(section.children.borrow().iter().filter_map(convert));
                }
            }
        }
    }
    nodes
}

/// @ai:intent Convert an rcdom handle into an owned node
fn convert(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => Some(Node::Element(Element {
            name: name.local.to_string(),
            attrs: attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect(),
            children: handle.children.borrow().iter().filter_map(convert).collect(),
        })),
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(Node::Comment(contents.to_string())),
        _ => None,
    }
}

/// @ai:intent Serialize a sequence of sibling nodes
/// @ai:effects pure
pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, None, &mut out);
    }
    out
}

fn write_node(node: &Node, parent: Option<&str>, out: &mut String) {
    match node {
        Node::Element(element) => write_element(element, out),
        Node::Text(text) if parent.is_some_and(|p| RAW_TEXT_ELEMENTS.contains(&p)) => {
            out.push_str(text)
        }
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.name.as_str()) {
        return;
    }

    // The parser drops one newline right after these start tags.
    if matches!(element.name.as_str(), "pre" | "textarea" | "listing") {
        if let Some(Node::Text(text)) = element.children.first() {
            if text.starts_with('\n') {
                out.push('\n');
            }
        }
    }

    for child in &element.children {
        write_node(child, Some(element.name.as_str()), out);
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

/// @ai:intent Escape text content for HTML
/// @ai:example ("a < b & c") -> "a &lt; b &amp; c"
/// @ai:effects pure
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

/// @ai:intent Escape an attribute value for a double-quoted attribute
/// @ai:effects pure
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_top_level_nodes() {
        let nodes = parse_fragment("<p>One</p>\n<ul><li>Two</li></ul>");
        let names: Vec<_> = nodes
            .iter()
            .filter_map(|n| match n {
                Node::Element(e) => Some(e.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["p", "ul"]);
    }

    #[test]
    fn test_round_trip_keeps_markup() {
        let html = r#"<div class="x"><p>a &amp; b<br>c</p><pre>code</pre></div>"#;
        assert_eq!(serialize(&parse_fragment(html)), html);
    }

    #[test]
    fn test_pre_leading_newline_survives_round_trip() {
        let html = "<pre>\n\nindented</pre>";
        assert_eq!(serialize(&parse_fragment(html)), html);
    }

    #[test]
    fn test_plain_text_fragment() {
        assert_eq!(
            parse_fragment("just text"),
            vec![Node::Text("just text".to_string())]
        );
    }

    #[test]
    fn test_with_class_deduplicates() {
        let element = Element::new("div").with_class("a").with_class("b").with_class("a");
        assert_eq!(element.classes(), vec!["a", "b"]);
        assert_eq!(element.to_html(), r#"<div class="a b"></div>"#);
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_text("<a & b>"), "&lt;a &amp; b&gt;");
        assert_eq!(escape_attr(r#"say "hi""#), "say &quot;hi&quot;");
    }
}
