//! Ordered tree arena shared by the display scene graph and the control tree.

pub mod arena;
pub mod node;
pub mod path;

pub use arena::Tree;
pub use node::{Labeled, NodeId};
