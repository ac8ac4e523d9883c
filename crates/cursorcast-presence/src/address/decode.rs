//! Address string → live element.

use crate::tree::{ElementTree, NodeId};

use super::segment::Segment;
use super::{BOUNDARY_MARKER, CHILD_SEPARATOR};

/// Resolve `address` against the current tree.
///
/// Returns `None` as soon as any part fails to resolve; a partially
/// resolved element is never returned. Never panics on malformed input.
pub fn decode(tree: &ElementTree, address: &str) -> Option<NodeId> {
    if address.is_empty() {
        return None;
    }

    let mut search_root = tree.document();
    let mut parts = address.split(BOUNDARY_MARKER).peekable();

    while let Some(part) = parts.next() {
        let found = resolve_part(tree, search_root, part)?;
        if parts.peek().is_none() {
            return Some(found);
        }
        search_root = tree.shadow_root(found)?;
    }

    None
}

/// Resolve one boundary-free part as a child-anchored selector under `root`.
fn resolve_part(tree: &ElementTree, root: NodeId, part: &str) -> Option<NodeId> {
    let mut current = root;
    for raw in part.split(CHILD_SEPARATOR) {
        let segment = Segment::parse(raw)?;
        current = segment.resolve(tree, current)?;
    }
    Some(current)
}
