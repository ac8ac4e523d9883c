//! A single step of an address: a tag plus its ordinal among same-tag siblings.

use std::fmt;

use crate::tree::{ElementTree, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub tag: String,
    /// 1-based position among element siblings sharing `tag`.
    pub ordinal: usize,
}

impl Segment {
    /// Compute the segment identifying `element` among its siblings.
    pub fn of(tree: &ElementTree, element: NodeId) -> Option<Self> {
        let tag = tree.tag(element)?;
        let preceding = match tree.parent(element) {
            Some(parent) => tree
                .element_children(parent)
                .take_while(|&sibling| sibling != element)
                .filter(|&sibling| {
                    tree.tag(sibling)
                        .is_some_and(|t| t.eq_ignore_ascii_case(tag))
                })
                .count(),
            None => 0,
        };
        Some(Self {
            tag: tag.to_string(),
            ordinal: preceding + 1,
        })
    }

    /// Parse `tag` or `tag[n]`. Returns `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        let (tag, ordinal) = match raw.split_once('[') {
            Some((tag, rest)) => {
                let digits = rest.strip_suffix(']')?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let ordinal: usize = digits.parse().ok()?;
                (tag, ordinal)
            }
            None => (raw, 1),
        };
        if ordinal == 0 || tag.is_empty() {
            return None;
        }
        if !tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return None;
        }
        Some(Self {
            tag: tag.to_ascii_lowercase(),
            ordinal,
        })
    }

    /// Find the matching element among the element children of `container`.
    pub fn resolve(&self, tree: &ElementTree, container: NodeId) -> Option<NodeId> {
        tree.element_children(container)
            .filter(|&child| {
                tree.tag(child)
                    .is_some_and(|t| t.eq_ignore_ascii_case(&self.tag))
            })
            .nth(self.ordinal - 1)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ordinal == 1 {
            write!(f, "{}", self.tag)
        } else {
            write!(f, "{}[{}]", self.tag, self.ordinal)
        }
    }
}
