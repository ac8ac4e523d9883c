//! Event path → address string.

use std::collections::HashMap;

use crate::tree::{ElementTree, NodeId};

use super::segment::Segment;
use super::{BOUNDARY_MARKER, CHILD_SEPARATOR};

/// Encodes event paths against one borrowed snapshot of the tree.
///
/// Each element's own segment is memoised in a side table; the address is
/// always assembled from the chain actually passed in, so a partial chain
/// never leaks into a later full one. The encoder borrows the tree, so the
/// table cannot outlive a mutation; build a fresh encoder for every pass.
pub struct AddressEncoder<'t> {
    tree: &'t ElementTree,
    cache: HashMap<NodeId, String>,
}

impl<'t> AddressEncoder<'t> {
    pub fn new(tree: &'t ElementTree) -> Self {
        Self {
            tree,
            cache: HashMap::new(),
        }
    }

    /// Encode a composed path (innermost target first) into an address.
    ///
    /// Non-element entries (text, shadow roots, the document) contribute no
    /// segment. Returns `None` when the path holds no element.
    pub fn encode(&mut self, chain: &[NodeId]) -> Option<String> {
        let mut address: Option<String> = None;
        let mut previous: Option<NodeId> = None;

        for &element in chain.iter().rev() {
            if !self.tree.is_element(element) {
                continue;
            }
            let segment = self.segment(element)?;
            address = Some(match (address.take(), previous) {
                (Some(mut prefix), Some(outer)) => {
                    prefix.push_str(if self.crosses_boundary(outer, element) {
                        BOUNDARY_MARKER
                    } else {
                        CHILD_SEPARATOR
                    });
                    prefix.push_str(&segment);
                    prefix
                }
                _ => segment,
            });
            previous = Some(element);
        }

        address
    }

    fn segment(&mut self, element: NodeId) -> Option<String> {
        if let Some(cached) = self.cache.get(&element) {
            return Some(cached.clone());
        }
        let segment = Segment::of(self.tree, element)?.to_string();
        self.cache.insert(element, segment.clone());
        Some(segment)
    }

    /// Number of elements whose segment is memoised in this pass.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// `inner` lives in the shadow root owned by `outer`.
    fn crosses_boundary(&self, outer: NodeId, inner: NodeId) -> bool {
        match self.tree.shadow_root(outer) {
            Some(shadow) => self.tree.containing_root(inner) == Some(shadow),
            None => false,
        }
    }
}

/// Encode a single composed path with a throwaway cache.
pub fn encode(tree: &ElementTree, chain: &[NodeId]) -> Option<String> {
    AddressEncoder::new(tree).encode(chain)
}
