//! Selector matching over the arena tree.

use super::{DOM, NodeKind};
use css_selectors::{ElementAdapter, QueryError, SelectorQuery, query_selector_all};
use indextree::NodeId;
use log::debug;

impl ElementAdapter for DOM {
    type Handle = NodeId;

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        element
            .parent(&self.dom)
            .filter(|parent| self.is_element(*parent))
    }

    fn previous_sibling_element(&self, element: NodeId) -> Option<NodeId> {
        element
            .preceding_siblings(&self.dom)
            .skip(1)
            .find(|sibling| self.is_element(*sibling))
    }

    fn next_sibling_element(&self, element: NodeId) -> Option<NodeId> {
        element
            .following_siblings(&self.dom)
            .skip(1)
            .find(|sibling| self.is_element(*sibling))
    }

    fn first_child_element(&self, element: NodeId) -> Option<NodeId> {
        element
            .children(&self.dom)
            .find(|child| self.is_element(*child))
    }

    fn tag_name(&self, element: NodeId) -> &str {
        self.tag(element).unwrap_or_default()
    }

    fn element_id(&self, element: NodeId) -> Option<&str> {
        self.attribute(element, "id")
    }

    fn has_class(&self, element: NodeId, class: &str) -> bool {
        self.attribute(element, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|token| token == class))
    }

    fn attr(&self, element: NodeId, name: &str) -> Option<&str> {
        self.attribute(element, name)
    }

    fn is_empty(&self, element: NodeId) -> bool {
        element.children(&self.dom).all(|child| {
            self.node(child).is_none_or(|node| match &node.kind {
                NodeKind::Text { text } => text.is_empty(),
                NodeKind::Element { .. } | NodeKind::Document => false,
            })
        })
    }
}

impl SelectorQuery for DOM {
    type Element = NodeId;

    fn query_selector_all(&self, selectors: &str) -> Result<Vec<NodeId>, QueryError> {
        if self.closed {
            return Err(QueryError::DocumentUnavailable {
                reason: "document was closed".to_owned(),
            });
        }
        let found = query_selector_all(self, self.elements(), selectors)?;
        debug!("[DOM] `{selectors}` matched {} element(s)", found.len());
        Ok(found)
    }
}
