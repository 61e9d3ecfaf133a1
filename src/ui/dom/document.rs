//! Arena-backed document that widgets mount into and mutate

use super::node::{escape, is_void, write_close_tag, write_open_tag, Node};
use crate::error::{Error, Result};

/// Handle to a node owned by a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone)]
enum NodeData {
    Root,
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Trusted(String),
    Vacant,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A mutable markup tree.
///
/// Subtrees removed from the tree are freed and their slots reused. A slot's
/// generation changes on every free, so a stale [`NodeId`] never resolves to
/// the node that took its place; it behaves as a detached, empty node.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                generation: 0,
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
            }],
            free: Vec::new(),
            focused: None,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId {
            index: 0,
            generation: 0,
        }
    }

    /// Append a `<div data-streamfield-block>` placeholder under `parent`
    pub fn mount_point(&mut self, parent: NodeId) -> NodeId {
        self.append(
            parent,
            super::Element::new("div")
                .attr("data-streamfield-block", "")
                .into(),
        )
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.data = data;
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    data,
                    parent: None,
                    children: Vec::new(),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    fn insert_detached(&mut self, node: Node) -> NodeId {
        let (data, children) = match node {
            Node::Element(el) => (
                NodeData::Element {
                    tag: el.tag,
                    attrs: el.attrs,
                },
                el.children,
            ),
            Node::Text(text) => (NodeData::Text(text), Vec::new()),
            Node::Trusted(html) => (NodeData::Trusted(html), Vec::new()),
        };
        let id = self.alloc(data);
        for child in children {
            let child_id = self.insert_detached(child);
            self.slots[child_id.index].parent = Some(id);
            self.slots[id.index].children.push(child_id);
        }
        id
    }

    /// Release `id` and its whole subtree back to the free list
    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slot_mut(id) else {
                continue;
            };
            stack.append(&mut slot.children);
            slot.data = NodeData::Vacant;
            slot.parent = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            if self.focused == Some(id) {
                self.focused = None;
            }
        }
    }

    /// Append a node as the last child of `parent`.
    ///
    /// A stale `parent` leaves the new node detached.
    pub fn append(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.insert_detached(node);
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.push(id);
            self.slots[id.index].parent = Some(parent);
        }
        id
    }

    /// Replace `target` in its parent with `nodes`, returning the new ids.
    ///
    /// `target` and its subtree are freed.
    pub fn replace_with(&mut self, target: NodeId, nodes: Vec<Node>) -> Result<Vec<NodeId>> {
        let parent = self
            .slot(target)
            .and_then(|slot| slot.parent)
            .ok_or(Error::Detached(target))?;
        let position = self
            .children(parent)
            .iter()
            .position(|c| *c == target)
            .ok_or(Error::Detached(target))?;

        let ids: Vec<NodeId> = nodes
            .into_iter()
            .map(|node| {
                let id = self.insert_detached(node);
                self.slots[id.index].parent = Some(parent);
                id
            })
            .collect();

        let _ = self.slots[parent.index]
            .children
            .splice(position..=position, ids.iter().copied());
        self.free_subtree(target);
        Ok(ids)
    }

    /// Replace `target` with a single node
    pub fn replace_with_node(&mut self, target: NodeId, node: Node) -> Result<NodeId> {
        let ids = self.replace_with(target, vec![node])?;
        ids.first().copied().ok_or(Error::Detached(target))
    }

    /// Remove and free every child of `id`
    pub fn clear_children(&mut self, id: NodeId) {
        let children = self
            .slot_mut(id)
            .map(|slot| std::mem::take(&mut slot.children))
            .unwrap_or_default();
        for child in children {
            self.free_subtree(child);
        }
    }

    /// Replace all children of `id` with `nodes`
    pub fn set_children(&mut self, id: NodeId, nodes: impl IntoIterator<Item = Node>) -> Vec<NodeId> {
        self.clear_children(id);
        nodes
            .into_iter()
            .map(|node| self.append(id, node))
            .collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|slot| slot.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id)
            .map(|slot| slot.children.as_slice())
            .unwrap_or_default()
    }

    /// Whether `node` is `ancestor` or lies somewhere beneath it
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if self.slot(node).is_none() {
            return false;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.slot(id)?.data {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.slot(id)?.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(Slot {
            data: NodeData::Element { attrs, .. },
            ..
        }) = self.slot_mut(id)
        {
            let value = value.into();
            match attrs.iter_mut().find(|(n, _)| n == name) {
                Some((_, v)) => *v = value,
                None => attrs.push((name.to_string(), value)),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(Slot {
            data: NodeData::Element { attrs, .. },
            ..
        }) = self.slot_mut(id)
        {
            attrs.retain(|(n, _)| n != name);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.tag(id).is_none() || self.has_class(id, class) {
            return;
        }
        let classes = match self.attr(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", classes);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(existing) = self.attr(id, "class") else {
            return;
        };
        let classes = existing
            .split_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(id, "class", classes);
    }

    /// Depth-first search for the first node (including `scope`) matching `pred`
    pub fn find(&self, scope: NodeId, pred: impl Fn(&Self, NodeId) -> bool) -> Option<NodeId> {
        let mut stack = vec![scope];
        while let Some(id) = stack.pop() {
            if self.slot(id).is_none() {
                continue;
            }
            if pred(self, id) {
                return Some(id);
            }
            stack.extend(self.children(id).iter().rev());
        }
        None
    }

    pub fn find_by_attr(&self, scope: NodeId, name: &str, value: &str) -> Option<NodeId> {
        self.find(scope, |doc, id| doc.attr(id, name) == Some(value))
    }

    pub fn focus(&mut self, id: NodeId) {
        if self.slot(id).is_some() {
            self.focused = Some(id);
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Serialize the children of the node
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_node(*child, &mut out);
        }
        out
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        self.inner_html(self.root())
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(slot) = self.slot(id) else {
            return;
        };
        match &slot.data {
            NodeData::Root => {
                for child in &slot.children {
                    self.write_node(*child, out);
                }
            }
            NodeData::Element { tag, attrs } => {
                write_open_tag(out, tag, attrs);
                if is_void(tag) {
                    return;
                }
                for child in &slot.children {
                    self.write_node(*child, out);
                }
                write_close_tag(out, tag);
            }
            NodeData::Text(text) => out.push_str(&escape(text)),
            NodeData::Trusted(html) => out.push_str(html),
            NodeData::Vacant => {}
        }
    }
}
