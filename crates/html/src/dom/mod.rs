use anyhow::{Error, anyhow};
use indextree::{Arena, Node, NodeId};
use log::trace;
use smallvec::SmallVec;

mod query;

#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element { tag: String },
    Text { text: String },
}

#[derive(Debug, Clone, Default)]
pub struct DOMNode {
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
}

impl DOMNode {
    fn element(tag: &str) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: tag.to_owned(),
            },
            attrs: SmallVec::new(),
        }
    }

    fn text(text: &str) -> Self {
        Self {
            kind: NodeKind::Text {
                text: text.to_owned(),
            },
            attrs: SmallVec::new(),
        }
    }

    #[inline]
    pub const fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    /// Attribute value by lowercased name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A read-mostly document tree that answers selector queries.
///
/// Nodes live in an arena; `NodeId`s stay valid for the lifetime of the document.
#[derive(Debug)]
pub struct DOM {
    dom: Arena<DOMNode>,
    root: NodeId,
    closed: bool,
}

impl Default for DOM {
    fn default() -> Self {
        Self::new()
    }
}

impl DOM {
    pub fn new() -> Self {
        let mut dom = Arena::new();
        Self {
            root: dom.new_node(DOMNode::default()),
            dom,
            closed: false,
        }
    }

    /// The document node.
    #[inline]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Append an element as the last child of `parent`.
    ///
    /// # Errors
    /// When `parent` is not a node of this document, or is a text node.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, Error> {
        self.append(parent, DOMNode::element(tag))
    }

    /// Append a text node as the last child of `parent`.
    ///
    /// # Errors
    /// See [`DOM::append_element`].
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, Error> {
        self.append(parent, DOMNode::text(text))
    }

    fn append(&mut self, parent: NodeId, node: DOMNode) -> Result<NodeId, Error> {
        let parent_node = self
            .dom
            .get(parent)
            .ok_or_else(|| anyhow!("Unknown parent node {parent:?}"))?;
        if matches!(parent_node.get().kind, NodeKind::Text { .. }) {
            return Err(anyhow!("Text node {parent:?} cannot have children"));
        }
        let child = self.dom.new_node(node);
        parent
            .checked_append(child, &mut self.dom)
            .map_err(|error| anyhow!("Failed to append to {parent:?}: {error}"))?;
        trace!("[DOM] appended {child:?} to {parent:?}");
        Ok(child)
    }

    /// Set an attribute, replacing any previous value. Names are stored lowercased.
    ///
    /// # Errors
    /// When `node` is not an element of this document.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), Error> {
        let entry = self
            .dom
            .get_mut(node)
            .ok_or_else(|| anyhow!("Unknown node {node:?}"))?
            .get_mut();
        if !entry.is_element() {
            return Err(anyhow!("Node {node:?} is not an element"));
        }
        let name = name.to_ascii_lowercase();
        if let Some(slot) = entry.attrs.iter_mut().find(|(key, _)| *key == name) {
            value.clone_into(&mut slot.1);
        } else {
            entry.attrs.push((name, value.to_owned()));
        }
        Ok(())
    }

    /// Detach `node` and its subtree from the document.
    pub fn remove(&mut self, node: NodeId) {
        if node != self.root {
            node.remove_subtree(&mut self.dom);
        }
    }

    /// Mark the document as gone; every later query fails.
    #[inline]
    pub const fn close(&mut self) {
        self.closed = true;
    }

    #[inline]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn node(&self, node: NodeId) -> Option<&DOMNode> {
        self.dom
            .get(node)
            .filter(|_| !node.is_removed(&self.dom))
            .map(Node::get)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?.attr(name)
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Document | NodeKind::Text { .. } => None,
        }
    }

    /// All elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.root
            .descendants(&self.dom)
            .filter(|id| self.dom.get(*id).is_some_and(|node| node.get().is_element()))
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(DOMNode::is_element)
    }
}
