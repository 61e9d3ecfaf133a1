//! Markup node builder
//!
//! Text passed to [`Node::text`] is escaped on output. Markup passed to
//! [`Node::trusted_html`] is emitted verbatim, so every call site of the latter
//! is an explicit decision to trust its input.

use std::fmt::Write;

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A detached markup fragment
pub type Fragment = Vec<Node>;

/// A markup node that has not been inserted into a document yet
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Plain text, escaped when serialized
    Text(String),
    /// Pre-rendered markup, emitted verbatim
    Trusted(String),
}

impl Node {
    /// Create an escaped text node
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Create a node whose markup is emitted without escaping
    pub fn trusted_html(html: impl Into<String>) -> Self {
        Node::Trusted(html.into())
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(el) => {
                write_open_tag(out, &el.tag, &el.attrs);
                if is_void(&el.tag) {
                    return;
                }
                for child in &el.children {
                    child.write_html(out);
                }
                write_close_tag(out, &el.tag);
            }
            Node::Text(text) => out.push_str(&escape(text)),
            Node::Trusted(html) => out.push_str(html),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// Element builder
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    /// Set an attribute, replacing any previous value
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    /// Append one or more space-separated class names; blank input is ignored
    pub fn class(mut self, class: &str) -> Self {
        let class = class.trim();
        if class.is_empty() {
            return self;
        }
        match self.attrs.iter_mut().find(|(n, _)| n == "class") {
            Some((_, v)) if !v.is_empty() => {
                v.push(' ');
                v.push_str(class);
            }
            Some((_, v)) => *v = class.to_string(),
            None => self.attrs.push(("class".to_string(), class.to_string())),
        }
        self
    }

    pub fn class_if(self, condition: bool, class: &str) -> Self {
        if condition {
            self.class(class)
        } else {
            self
        }
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Append an escaped text child
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::text(text))
    }
}

/// Serialize a fragment to HTML
pub fn render_fragment(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}

/// Escape text for use in element content or a quoted attribute value
pub fn escape(text: &str) -> String {
    v_htmlescape::escape(text).to_string()
}

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub(crate) fn write_open_tag(out: &mut String, tag: &str, attrs: &[(String, String)]) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        let _ = write!(out, " {}=\"{}\"", name, escape(value));
    }
    out.push('>');
}

pub(crate) fn write_close_tag(out: &mut String, tag: &str) {
    let _ = write!(out, "</{}>", tag);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn html(node: impl Into<Node>) -> String {
        render_fragment(&[node.into()])
    }

    fn attr<'a>(el: &'a Element, name: &str) -> Option<&'a str> {
        el.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_text_is_escaped() {
        let node = Node::text("<b>bold</b> & co");
        let out = html(node);
        assert!(!out.contains('<'));
        assert!(out.contains("&amp;"));
    }

    #[test]
    fn test_trusted_is_verbatim() {
        let node = Node::trusted_html("<b>bold</b>");
        assert_eq!(html(node), "<b>bold</b>");
    }

    #[test]
    fn test_element_with_children() {
        let el = Element::new("dl")
            .child(Element::new("dt").text("Name"))
            .child(Element::new("dd").text("Ada"));
        assert_eq!(
            html(el),
            "<dl><dt>Name</dt><dd>Ada</dd></dl>"
        );
    }

    #[test]
    fn test_void_element_has_no_close_tag() {
        let el = Element::new("input").attr("type", "text");
        assert_eq!(html(el), "<input type=\"text\">");
    }

    #[test]
    fn test_attribute_value_is_escaped() {
        let el = Element::new("div").attr("title", "a\"b");
        let html = html(el);
        assert!(!html.contains("a\"b"));
        assert!(html.starts_with("<div title=\""));
    }

    #[test]
    fn test_class_appends_and_skips_blank() {
        let el = Element::new("div")
            .class("field")
            .class("")
            .class_if(true, "required")
            .class_if(false, "hidden");
        assert_eq!(attr(&el, "class"), Some("field required"));
    }

    #[test]
    fn test_attr_replaces_existing() {
        let el = Element::new("div").attr("id", "a").attr("id", "b");
        assert_eq!(el.attrs.len(), 1);
        assert_eq!(attr(&el, "id"), Some("b"));
    }

    #[test]
    fn test_render_fragment_concatenates() {
        let nodes = vec![Node::text("a"), Node::trusted_html("<br>"), Node::text("b")];
        assert_eq!(render_fragment(&nodes), "a<br>b");
    }
}
