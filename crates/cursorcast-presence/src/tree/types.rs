//! Core types for the element tree: node identifiers and node kinds.

use cursorcast_common::Rect;

/// Index of a node inside an [`ElementTree`](super::ElementTree) arena.
///
/// Ids stay valid for the lifetime of the tree, including after the node
/// has been removed; removed nodes simply stop being connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The single root of the tree.
    Document,
    /// A visual element. The tag is always stored lowercase.
    Element { tag: String },
    /// Non-element content. Never counted when disambiguating siblings.
    Text,
    /// Encapsulation boundary owned by `host`. Its children are invisible
    /// to structural lookups that start outside it.
    ShadowRoot { host: NodeId },
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) shadow_root: Option<NodeId>,
    pub(crate) rect: Rect,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, parent: Option<NodeId>, rect: Rect) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            shadow_root: None,
            rect,
        }
    }

    pub(crate) fn is_container(&self) -> bool {
        !matches!(self.kind, NodeKind::Text)
    }
}

/// Normalize a tag name to lowercase, rejecting anything that could clash
/// with address syntax.
pub(crate) fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim().to_ascii_lowercase();
    let mut chars = tag.chars();
    let first = chars.next()?;
    if !first.is_ascii_lowercase() {
        return None;
    }
    if chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        Some(tag)
    } else {
        None
    }
}
