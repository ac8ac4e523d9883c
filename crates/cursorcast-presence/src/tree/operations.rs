//! Construction, mutation and structural lookups on the element tree.

use cursorcast_common::{Point, Rect, TreeError};

use super::types::{normalize_tag, Node, NodeId, NodeKind};

/// Arena-backed tree of visual elements with shadow-root boundaries.
#[derive(Debug, Clone)]
pub struct ElementTree {
    pub(crate) nodes: Vec<Node>,
    scroll: Point,
}

impl ElementTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document, None, Rect::default())],
            scroll: Point::default(),
        }
    }

    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(id.0).ok_or(TreeError::UnknownNode(id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(id.0).ok_or(TreeError::UnknownNode(id.0))
    }

    fn push_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId, TreeError> {
        if !self.node(parent)?.is_container() {
            return Err(TreeError::NotAContainer(parent.0));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Append a new element with the given tag as the last child of `parent`.
    pub fn create_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        rect: Rect,
    ) -> Result<NodeId, TreeError> {
        let tag = normalize_tag(tag).ok_or_else(|| TreeError::InvalidTag(tag.to_string()))?;
        self.push_child(
            parent,
            Node::new(NodeKind::Element { tag }, Some(parent), rect),
        )
    }

    /// Append a text node as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId) -> Result<NodeId, TreeError> {
        self.push_child(
            parent,
            Node::new(NodeKind::Text, Some(parent), Rect::default()),
        )
    }

    /// Attach a shadow root to `host`, or return the one it already has.
    pub fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, TreeError> {
        let node = self.node(host)?;
        if !matches!(node.kind, NodeKind::Element { .. }) {
            return Err(TreeError::NotAnElement(host.0));
        }
        if let Some(existing) = node.shadow_root {
            return Ok(existing);
        }
        let rect = node.rect;
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Node::new(NodeKind::ShadowRoot { host }, None, rect));
        self.node_mut(host)?.shadow_root = Some(id);
        Ok(id)
    }

    /// Detach `node` (and its subtree) from its parent.
    ///
    /// The node keeps its id but is no longer connected, so addresses that
    /// pointed through it stop resolving.
    pub fn remove(&mut self, node: NodeId) -> Result<(), TreeError> {
        let parent = match self.node(node)?.kind {
            NodeKind::Element { .. } | NodeKind::Text => self.node(node)?.parent,
            _ => return Err(TreeError::NotAnElement(node.0)),
        };
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.retain(|&c| c != node);
        }
        self.node_mut(node)?.parent = None;
        Ok(())
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) -> Result<(), TreeError> {
        self.node_mut(node)?.rect = rect;
        Ok(())
    }

    /// Bounding rectangle of `node` in viewport coordinates.
    pub fn rect(&self, node: NodeId) -> Option<Rect> {
        self.nodes.get(node.0).map(|n| n.rect)
    }

    pub fn set_scroll(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    /// Current viewport scroll offset.
    pub fn scroll(&self) -> Point {
        self.scroll
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.nodes.get(node.0).map(|n| &n.kind)
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match self.kind(node)? {
            NodeKind::Element { tag } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.tag(node).is_some()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Element children of `node`, in document order. Text nodes are skipped.
    pub fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node)
            .iter()
            .copied()
            .filter(move |&c| self.is_element(c))
    }

    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.nodes.get(host.0)?.shadow_root
    }

    /// The host element owning `node`, if `node` is a shadow root.
    pub fn host(&self, node: NodeId) -> Option<NodeId> {
        match self.kind(node)? {
            NodeKind::ShadowRoot { host } => Some(*host),
            _ => None,
        }
    }

    /// The document or shadow root whose subtree contains `node`.
    ///
    /// Returns `None` for nodes sitting in a detached subtree.
    pub fn containing_root(&self, node: NodeId) -> Option<NodeId> {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        match self.kind(current)? {
            NodeKind::Document | NodeKind::ShadowRoot { .. } => Some(current),
            _ => None,
        }
    }

    /// Whether `node` is reachable from the document, through any number of
    /// shadow boundaries.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            match self.containing_root(current) {
                Some(root) => match self.kind(root) {
                    Some(NodeKind::Document) => return true,
                    Some(NodeKind::ShadowRoot { host }) => current = *host,
                    _ => return false,
                },
                None => return false,
            }
        }
    }

    /// Short human-readable description, e.g. `<div> (node-4)`.
    pub fn describe(&self, node: NodeId) -> String {
        match self.kind(node) {
            Some(NodeKind::Document) => format!("#document ({node})"),
            Some(NodeKind::Element { tag }) => format!("<{tag}> ({node})"),
            Some(NodeKind::Text) => format!("#text ({node})"),
            Some(NodeKind::ShadowRoot { host }) => format!("#shadow-root of {host} ({node})"),
            None => format!("unknown ({node})"),
        }
    }

    /// Nodes ever allocated, the document and removed nodes included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The document has no children attached.
    pub fn has_no_content(&self) -> bool {
        self.children(self.document()).is_empty()
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}
