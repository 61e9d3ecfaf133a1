//! HTML fragment parsing for form templates and raw HTML values

use super::node::{Element, Node};
use crate::error::Result;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{local_name, namespace_url, ns, parse_fragment as parse_html_fragment};
use html5ever::{ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Parse markup as the content of a `<body>` element.
fn parse_body(html: &str) -> RcDom {
    parse_html_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("body")),
        Vec::new(),
    )
    .one(html)
}

/// Parse markup into owned nodes.
///
/// Comments, doctypes and processing instructions are dropped.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let dom = parse_body(html);

    // The fragment parser wraps its output in a synthetic <html> element.
    let wrappers = dom.document.children.borrow();
    let nodes = wrappers
        .iter()
        .flat_map(|wrapper| {
            wrapper
                .children
                .borrow()
                .iter()
                .filter_map(convert)
                .collect::<Vec<_>>()
        })
        .collect();
    nodes
}

fn convert(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            let children = handle.children.borrow().iter().filter_map(convert).collect();
            Some(Node::Element(Element {
                tag: name.local.to_string(),
                attrs,
                children,
            }))
        }
        _ => None,
    }
}

/// Remove every `<script>` element from user-supplied markup, at any depth,
/// and serialize the rest unchanged
pub fn strip_scripts(html: &str) -> Result<String> {
    let dom = parse_body(html);
    let mut out = Vec::new();
    for wrapper in dom.document.children.borrow().iter() {
        remove_scripts(wrapper);
        let handle: SerializableHandle = wrapper.clone().into();
        serialize(
            &mut out,
            &handle,
            SerializeOpts {
                traversal_scope: TraversalScope::ChildrenOnly(None),
                ..Default::default()
            },
        )?;
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn remove_scripts(handle: &Handle) {
    handle.children.borrow_mut().retain(|child| !is_script(child));
    for child in handle.children.borrow().iter() {
        remove_scripts(child);
    }
}

fn is_script(handle: &Handle) -> bool {
    matches!(&handle.data, NodeData::Element { name, .. } if name.local == local_name!("script"))
}
