//! In-memory model of the shared visual-element tree.
//!
//! Elements are stored in an arena and addressed by [`NodeId`]. Shadow
//! roots model encapsulation boundaries: their content hangs off the host
//! element but is not part of the host's ordinary child list.

mod operations;
mod traversal;
mod types;

pub use operations::ElementTree;
pub use types::{NodeId, NodeKind};
