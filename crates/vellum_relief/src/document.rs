//! Arena-backed document tree.
//!
//! Detaching a node only unlinks it from its parent. Replacing children
//! through [`Document::clear_children`] or [`Document::set_text_content`]
//! frees the old subtrees: their listeners and retained handles are dropped,
//! the slots are reused, and the old [`NodeId`]s stop resolving.

use std::any::Any;
use std::rc::Rc;

use vellum_carton::{is_form_control_tag, is_void_tag, String};

use crate::errors::{DomError, DomResult};
use crate::event::Listener;
use crate::node::{Attribute, ElementData, NodeData, NodeId, NodeKind, NodeType};

struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

/// An in-memory document
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with a single root node
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                generation: 0,
                data: Some(NodeData::new(NodeKind::Document)),
            }],
            free: Vec::new(),
        }
    }

    /// The document node itself
    #[inline]
    pub const fn root(&self) -> NodeId {
        NodeId::new(0, 0)
    }

    /// Number of live nodes, attached or not
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let data = Some(NodeData::new(kind));
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.data = data;
            return NodeId::new(index, slot.generation);
        }
        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            data,
        });
        NodeId::new(index, 0)
    }

    /// Free a node and its whole subtree
    fn release(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let Some(slot) = self
                .slots
                .get_mut(id.index())
                .filter(|slot| slot.generation == id.generation())
            else {
                continue;
            };
            let Some(data) = slot.data.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index());
            pending.extend_from_slice(&data.children);
        }
    }

    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(data.into()))
    }

    pub fn create_comment(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Comment(data.into()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeKind::Fragment)
    }

    pub fn node(&self, id: NodeId) -> DomResult<&NodeData> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.data.as_ref())
            .ok_or(DomError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> DomResult<&mut NodeData> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.data.as_mut())
            .ok_or(DomError::UnknownNode(id))
    }

    pub fn node_type(&self, id: NodeId) -> DomResult<NodeType> {
        Ok(self.node(id)?.kind.node_type())
    }

    #[inline]
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).map(|n| &n.kind), Ok(NodeKind::Element(_)))
    }

    pub fn element(&self, id: NodeId) -> DomResult<&ElementData> {
        match &self.node(id)?.kind {
            NodeKind::Element(el) => Ok(el),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(el) => Ok(el),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    /// Tag name of an element node
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|el| el.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(NodeData::parent)
    }

    pub fn children(&self, id: NodeId) -> DomResult<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok()?.children.first().copied()
    }

    /// Whether `node` is `ancestor` or lies beneath it
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Appending a fragment moves the fragment's children instead, leaving the
    /// fragment empty.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.node(parent)?;
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if self.node_type(child)? == NodeType::Fragment {
            let moved = std::mem::take(&mut self.node_mut(child)?.children);
            for id in &moved {
                self.node_mut(*id)?.parent = Some(parent);
            }
            self.node_mut(parent)?.children.extend(moved);
            return Ok(());
        }

        self.detach(child)?;
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Unlink a node from its parent, keeping its own subtree intact
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        self.node_mut(parent)?.children.retain(|c| *c != id);
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    /// Remove and free every child of a node, subtrees included
    pub fn clear_children(&mut self, id: NodeId) -> DomResult<()> {
        let children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in children {
            self.release(child);
        }
        Ok(())
    }

    /// Keep `handle` alive for as long as the node exists
    pub fn retain(&mut self, id: NodeId, handle: Rc<dyn Any>) -> DomResult<()> {
        self.node_mut(id)?.retained.push(handle);
        Ok(())
    }

    pub fn attributes(&self, id: NodeId) -> DomResult<&[Attribute]> {
        Ok(&self.element(id)?.attributes)
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok()?.attribute(name)
    }

    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> DomResult<()> {
        let name = name.into();
        let value = value.into();
        let el = self.element_mut(id)?;
        match el
            .attributes
            .iter_mut()
            .find(|attr| attr.name.eq_ignore_ascii_case(&name))
        {
            Some(attr) => attr.value = value,
            None => el.attributes.push(Attribute { name, value }),
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<()> {
        self.element_mut(id)?
            .attributes
            .retain(|attr| !attr.name.eq_ignore_ascii_case(name));
        Ok(())
    }

    /// Concatenated text of all descendant text nodes, or the data of a
    /// text/comment node
    pub fn text_content(&self, id: NodeId) -> DomResult<String> {
        match &self.node(id)?.kind {
            NodeKind::Text(data) | NodeKind::Comment(data) => Ok(data.clone()),
            _ => {
                let mut out = String::default();
                self.collect_text(id, &mut out)?;
                Ok(out)
            }
        }
    }

    fn collect_text(&self, id: NodeId, out: &mut String) -> DomResult<()> {
        for child in self.children(id)? {
            match &self.node(*child)?.kind {
                NodeKind::Text(data) => out.push_str(data),
                NodeKind::Comment(_) => {}
                _ => self.collect_text(*child, out)?,
            }
        }
        Ok(())
    }

    /// Replace a node's text.
    ///
    /// Containers end up with one text node (none for empty text), reusing a
    /// lone text child when there is one; text and comment nodes have their
    /// data replaced.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Text(data) | NodeKind::Comment(data) => {
                *data = text.into();
                return Ok(());
            }
            _ => {}
        }
        let lone_child = match *self.children(id)? {
            [only] => Some(only),
            _ => None,
        };
        if let Some(child) = lone_child.filter(|_| !text.is_empty()) {
            if let NodeKind::Text(data) = &mut self.node_mut(child)?.kind {
                *data = text.into();
                return Ok(());
            }
        }
        self.clear_children(id)?;
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(id, text_node)?;
        }
        Ok(())
    }

    /// Live `value` of a form control.
    ///
    /// Falls back to the `value` attribute (or the text of a `<textarea>`)
    /// until the property is first assigned.
    pub fn value(&self, id: NodeId) -> DomResult<String> {
        let el = self.element(id)?;
        if let Some(value) = &el.value {
            return Ok(value.clone());
        }
        if el.tag.eq_ignore_ascii_case("textarea") {
            return self.text_content(id);
        }
        Ok(el.attribute("value").map(String::from).unwrap_or_default())
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> DomResult<()> {
        let el = self.element_mut(id)?;
        if !is_form_control_tag(&el.tag) {
            tracing::trace!(tag = %el.tag, "value assigned to a non-form element");
        }
        el.value = Some(value.into());
        Ok(())
    }

    pub(crate) fn add_listener(
        &mut self,
        id: NodeId,
        event: impl Into<String>,
        listener: Listener,
    ) -> DomResult<()> {
        self.node_mut(id)?.listeners.push((event.into(), listener));
        Ok(())
    }

    pub(crate) fn listeners_for(&self, id: NodeId, event: &str) -> DomResult<Vec<Listener>> {
        Ok(self
            .node(id)?
            .listeners
            .iter()
            .filter(|(kind, _)| kind.as_str() == event)
            .map(|(_, listener)| listener.clone())
            .collect())
    }

    /// All nodes beneath `id` in tree order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if let Ok(children) = self.children(id) {
            for child in children {
                out.push(*child);
                self.collect_descendants(*child, out);
            }
        }
    }

    /// First element in the document matching a simple selector
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_selector_in(self.root(), selector)
    }

    /// First element beneath `scope` matching a simple selector.
    ///
    /// Supports `#id`, `.class` and bare tag names.
    pub fn query_selector_in(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        let selector = selector.trim();
        if selector.is_empty() {
            return None;
        }
        self.descendants(scope).into_iter().find(|id| {
            let Ok(el) = self.element(*id) else {
                return false;
            };
            if let Some(id_name) = selector.strip_prefix('#') {
                el.attribute("id") == Some(id_name)
            } else if let Some(class) = selector.strip_prefix('.') {
                el.attribute("class")
                    .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
            } else {
                el.tag.eq_ignore_ascii_case(selector)
            }
        })
    }

    /// Serialized children of a node
    pub fn inner_html(&self, id: NodeId) -> DomResult<std::string::String> {
        let mut out = std::string::String::new();
        for child in self.children(id)? {
            self.write_html(*child, &mut out)?;
        }
        Ok(out)
    }

    /// Serialized node including itself
    pub fn outer_html(&self, id: NodeId) -> DomResult<std::string::String> {
        let mut out = std::string::String::new();
        self.write_html(id, &mut out)?;
        Ok(out)
    }

    fn write_html(&self, id: NodeId, out: &mut std::string::String) -> DomResult<()> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Document | NodeKind::Fragment => {
                for child in &node.children {
                    self.write_html(*child, out)?;
                }
            }
            NodeKind::Text(data) => out.push_str(&htmlize::escape_text(data.as_str())),
            NodeKind::Comment(data) => {
                out.push_str("<!--");
                out.push_str(data);
                out.push_str("-->");
            }
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for attr in &el.attributes {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&htmlize::escape_attribute(attr.value.as_str()));
                    out.push('"');
                }
                out.push('>');
                if is_void_tag(&el.tag) {
                    return Ok(());
                }
                for child in &node.children {
                    self.write_html(*child, out)?;
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
        Ok(())
    }
}
