//! Node types: NodeId, Labeled.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a tree node. Copy, lightweight (u64).
    ///
    /// A `NodeId` is the node's identity: two children are "the same child"
    /// exactly when their ids are equal.
    pub struct NodeId;
}

/// Payloads that carry an optional identifier usable in path resolution.
///
/// A literal path portion matches the first child (in child order) whose
/// label equals the portion.
pub trait Labeled {
    /// The node's identifier, if it has one.
    fn label(&self) -> Option<&str>;
}
