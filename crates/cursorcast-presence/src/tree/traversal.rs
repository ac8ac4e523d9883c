//! Event-path construction and hit testing.

use super::{ElementTree, NodeId, NodeKind};

impl ElementTree {
    /// The path an event dispatched at `node` travels, innermost first.
    ///
    /// Climbs parents and steps from each shadow root to its host, ending at
    /// the document when `node` is connected.
    pub fn composed_path(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            if self.kind(id).is_none() {
                break;
            }
            path.push(id);
            current = match self.kind(id) {
                Some(NodeKind::ShadowRoot { host }) => Some(*host),
                _ => self.parent(id),
            };
        }
        path
    }

    /// Find the deepest connected element under the viewport point and
    /// return its composed path.
    ///
    /// Later siblings paint over earlier ones, and shadow content paints
    /// over light children.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<Vec<NodeId>> {
        let target = self.hit_within(self.document(), x, y)?;
        Some(self.composed_path(target))
    }

    fn hit_within(&self, container: NodeId, x: f64, y: f64) -> Option<NodeId> {
        let children: Vec<NodeId> = self.element_children(container).collect();
        for child in children.into_iter().rev() {
            let inside = self.rect(child).is_some_and(|r| r.contains(x, y));
            if !inside {
                continue;
            }
            if let Some(shadow) = self.shadow_root(child) {
                if let Some(hit) = self.hit_within(shadow, x, y) {
                    return Some(hit);
                }
            }
            if let Some(hit) = self.hit_within(child, x, y) {
                return Some(hit);
            }
            return Some(child);
        }
        None
    }
}
