//! Tree operations: attach, detach, swap, walk, resolve.

use slotmap::{SecondaryMap, SlotMap};
use tracing::debug;

use super::node::{Labeled, NodeId};
use super::path::{self, PathToken};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// An ordered tree of `T` payloads, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`; parent/child relationships are
/// stored in secondary maps. The structural invariant maintained by every
/// operation: a node's parent pointer and its membership in exactly one
/// parent's ordered child list always agree. Attaching a node that already
/// has a parent detaches it first, with no observable intermediate state.
#[derive(Debug)]
pub struct Tree<T> {
    nodes: SlotMap<NodeId, T>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
}

impl<T> Tree<T> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
        }
    }

    /// Insert a detached node into the arena.
    pub fn insert(&mut self, data: T) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        id
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// If `child` is already a child of `parent` this is a no-op. If it is
    /// attached elsewhere it is detached first.
    ///
    /// # Panics
    ///
    /// Panics (debug) if either node does not exist, or `parent == child`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let count = self.child_count(parent);
        self.add_child_at(parent, count, child);
    }

    /// Attach `child` at `index` within `parent`'s child list.
    ///
    /// `index` is clamped to the current child count. If `child` is already
    /// a child of `parent` this is a no-op (its position is not changed).
    ///
    /// # Panics
    ///
    /// Panics (debug) if either node does not exist, or `parent == child`.
    pub fn add_child_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        debug_assert!(self.nodes.contains_key(parent), "parent node does not exist");
        debug_assert!(self.nodes.contains_key(child), "child node does not exist");
        debug_assert!(parent != child, "a node cannot be its own child");

        if self.parent.get(child) == Some(&parent) {
            return;
        }
        self.detach(child);

        self.parent.insert(child, parent);
        let siblings = self
            .children
            .get_mut(parent)
            .expect("parent must have a child list");
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        debug!(?parent, ?child, index, "attached child");
    }

    /// Detach `child` from its parent, if it has one.
    ///
    /// The node and its subtree stay in the arena and can be re-attached.
    /// Returns `true` if the node was attached.
    pub fn detach(&mut self, child: NodeId) -> bool {
        let Some(old_parent) = self.parent.remove(child) else {
            return false;
        };
        if let Some(siblings) = self.children.get_mut(old_parent) {
            siblings.retain(|&c| c != child);
        }
        debug!(parent = ?old_parent, ?child, "detached child");
        true
    }

    /// Detach `child` from `parent`.
    ///
    /// Returns `false` (and changes nothing) if `child` is not a child of
    /// `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent.get(child) != Some(&parent) {
            return false;
        }
        self.detach(child)
    }

    /// Detach the child at `index` from `parent`.
    ///
    /// Returns the detached node, or `None` if `index` is out of bounds.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        let child = self.get_child_at(parent, index)?;
        self.detach(child);
        Some(child)
    }

    /// Detach every child of `parent`, returning them in their former order.
    pub fn remove_all_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let removed = match self.children.get_mut(parent) {
            Some(siblings) => std::mem::take(siblings),
            None => Vec::new(),
        };
        for &child in &removed {
            self.parent.remove(child);
        }
        removed
    }

    /// Delete a node and its entire subtree from the arena.
    ///
    /// Returns the payload of the deleted node, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        self.detach(id);

        let mut removed_root_data = None;
        let mut to_remove = vec![id];
        while let Some(current) = to_remove.pop() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed_root_data = data;
            }
        }
        removed_root_data
    }

    /// Exchange the positions of two children of `parent`.
    ///
    /// All other children keep their relative order. Returns `false` (and
    /// changes nothing) if either node is not a child of `parent`.
    pub fn swap_children(&mut self, parent: NodeId, a: NodeId, b: NodeId) -> bool {
        let (Some(ia), Some(ib)) = (self.child_index(parent, a), self.child_index(parent, b))
        else {
            return false;
        };
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.swap(ia, ib);
        }
        true
    }

    /// The parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// The children of a node. Empty if the node has none or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Number of children of `id`.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// The child of `parent` at `index`, or `None` if out of bounds.
    pub fn get_child_at(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.children(parent).get(index).copied()
    }

    /// The index of `child` within `parent`'s child list.
    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Walk from `id` up to the root, collecting ancestor node ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Immutable access to a node's payload.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's payload.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id)
    }

    /// Whether the arena contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }
}

impl<T: Labeled> Tree<T> {
    /// Resolve a path against `start`.
    ///
    /// Portions are evaluated left to right; see [`super::path`] for the
    /// grammar. Resolution short-circuits: once a portion fails to resolve,
    /// the result is `None` regardless of the remaining portions. A miss is
    /// not an error; callers that must distinguish "no such node" check the
    /// returned option.
    pub fn resolve(&self, start: NodeId, path: &str) -> Option<NodeId> {
        let mut current = start;
        for token in path::lex(path) {
            let next = match token {
                PathToken::Separator | PathToken::Stay => Some(current),
                PathToken::Parent => self.parent(current),
                PathToken::First => self.get_child_at(current, 0),
                PathToken::Last => {
                    let count = self.child_count(current);
                    if count == 0 {
                        None
                    } else {
                        self.get_child_at(current, count - 1)
                    }
                }
                PathToken::Name(name) => self
                    .children(current)
                    .iter()
                    .copied()
                    .find(|&c| self.get(c).and_then(Labeled::label) == Some(name.as_str())),
            };
            match next {
                Some(n) => current = n,
                None => return None,
            }
        }
        Some(current)
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Named(Option<&'static str>);

    impl Labeled for Named {
        fn label(&self) -> Option<&str> {
            self.0
        }
    }

    /// Build a small test tree:
    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (Tree<Named>, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let root = tree.insert(Named(Some("root")));
        let a = tree.insert(Named(Some("a")));
        let b = tree.insert(Named(Some("b")));
        let c = tree.insert(Named(Some("c")));
        let d = tree.insert(Named(Some("d")));
        tree.add_child(root, a);
        tree.add_child(root, b);
        tree.add_child(a, c);
        tree.add_child(a, d);
        (tree, root, a, b, c, d)
    }

    #[test]
    fn add_child_sets_parent_and_order() {
        let (tree, root, a, b, c, _d) = build_tree();
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(c), Some(a));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.children(root), &[a, b]);
    }

    #[test]
    fn add_child_is_idempotent() {
        let (mut tree, root, a, b, _c, _d) = build_tree();
        tree.add_child(root, a);
        assert_eq!(tree.children(root), &[a, b]);
    }

    #[test]
    fn add_child_reparents() {
        let (mut tree, root, a, b, c, d) = build_tree();
        tree.add_child(b, c);
        assert_eq!(tree.parent(c), Some(b));
        assert_eq!(tree.children(a), &[d]);
        assert_eq!(tree.children(b), &[c]);
        assert_eq!(tree.ancestors(c), vec![b, root]);
    }

    #[test]
    fn add_child_at_index() {
        let (mut tree, root, a, b, _c, _d) = build_tree();
        let e = tree.insert(Named(Some("e")));
        tree.add_child_at(root, 1, e);
        assert_eq!(tree.children(root), &[a, e, b]);
    }

    #[test]
    fn add_child_at_clamps_index() {
        let (mut tree, root, a, b, _c, _d) = build_tree();
        let e = tree.insert(Named(None));
        tree.add_child_at(root, 99, e);
        assert_eq!(tree.children(root), &[a, b, e]);
    }

    #[test]
    fn remove_child() {
        let (mut tree, _root, a, _b, c, d) = build_tree();
        assert!(tree.remove_child(a, c));
        assert_eq!(tree.parent(c), None);
        assert_eq!(tree.children(a), &[d]);
        // The node still exists and can be re-attached.
        assert!(tree.contains(c));
        tree.add_child(a, c);
        assert_eq!(tree.children(a), &[d, c]);
    }

    #[test]
    fn remove_child_wrong_parent() {
        let (mut tree, root, _a, _b, c, _d) = build_tree();
        assert!(!tree.remove_child(root, c));
        assert!(tree.parent(c).is_some());
    }

    #[test]
    fn remove_child_at() {
        let (mut tree, root, a, b, _c, _d) = build_tree();
        assert_eq!(tree.remove_child_at(root, 0), Some(a));
        assert_eq!(tree.children(root), &[b]);
        assert_eq!(tree.remove_child_at(root, 5), None);
    }

    #[test]
    fn remove_all_children() {
        let (mut tree, root, a, b, _c, _d) = build_tree();
        let removed = tree.remove_all_children(root);
        assert_eq!(removed, vec![a, b]);
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.parent(b), None);
    }

    #[test]
    fn remove_deletes_subtree() {
        let (mut tree, root, a, b, c, d) = build_tree();
        assert!(tree.remove(a).is_some());
        assert!(!tree.contains(a));
        assert!(!tree.contains(c));
        assert!(!tree.contains(d));
        assert!(tree.contains(root));
        assert_eq!(tree.children(root), &[b]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn remove_nonexistent() {
        let mut tree: Tree<Named> = Tree::new();
        let id = tree.insert(Named(None));
        tree.remove(id);
        assert!(tree.remove(id).is_none());
    }

    #[test]
    fn swap_children_exchanges_indices() {
        let (mut tree, root, a, b, _c, _d) = build_tree();
        let e = tree.insert(Named(Some("e")));
        tree.add_child(root, e);
        assert!(tree.swap_children(root, a, e));
        assert_eq!(tree.children(root), &[e, b, a]);
    }

    #[test]
    fn swap_children_preserves_set_and_length() {
        let (mut tree, _root, a, _b, c, d) = build_tree();
        assert!(tree.swap_children(a, c, d));
        assert_eq!(tree.children(a), &[d, c]);
        assert_eq!(tree.child_count(a), 2);
    }

    #[test]
    fn swap_children_requires_both_members() {
        let (mut tree, root, a, _b, c, _d) = build_tree();
        // c is a grandchild of root, not a child.
        assert!(!tree.swap_children(root, a, c));
    }

    #[test]
    fn get_child_at_and_index() {
        let (tree, root, a, b, _c, _d) = build_tree();
        assert_eq!(tree.get_child_at(root, 0), Some(a));
        assert_eq!(tree.get_child_at(root, 1), Some(b));
        assert_eq!(tree.get_child_at(root, 2), None);
        assert_eq!(tree.child_index(root, b), Some(1));
        assert_eq!(tree.child_index(a, b), None);
    }

    #[test]
    fn ancestors() {
        let (tree, root, a, _b, c, _d) = build_tree();
        assert_eq!(tree.ancestors(c), vec![a, root]);
        assert_eq!(tree.ancestors(a), vec![root]);
        assert!(tree.ancestors(root).is_empty());
    }

    #[test]
    fn walk_depth_first() {
        let (tree, root, a, b, c, d) = build_tree();
        assert_eq!(tree.walk_depth_first(root), vec![root, a, c, d, b]);
        assert_eq!(tree.walk_depth_first(a), vec![a, c, d]);
    }

    #[test]
    fn default_is_empty() {
        let tree: Tree<Named> = Tree::default();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    // ── resolve ──────────────────────────────────────────────────────

    #[test]
    fn resolve_child_by_name() {
        let (tree, root, a, _b, _c, _d) = build_tree();
        assert_eq!(tree.resolve(root, "a"), Some(a));
    }

    #[test]
    fn resolve_nested() {
        let (tree, root, _a, _b, c, _d) = build_tree();
        assert_eq!(tree.resolve(root, "a/c"), Some(c));
    }

    #[test]
    fn resolve_parent() {
        let (tree, root, a, _b, _c, _d) = build_tree();
        assert_eq!(tree.resolve(a, ".."), Some(root));
        assert_eq!(tree.resolve(root, "a/.."), Some(root));
    }

    #[test]
    fn resolve_parent_of_root_is_none() {
        let (tree, root, ..) = build_tree();
        assert_eq!(tree.resolve(root, ".."), None);
    }

    #[test]
    fn resolve_first_last() {
        let (tree, root, a, b, c, d) = build_tree();
        assert_eq!(tree.resolve(root, ".first"), Some(a));
        assert_eq!(tree.resolve(root, ".last"), Some(b));
        assert_eq!(tree.resolve(root, ".first/.last"), Some(d));
        assert_eq!(tree.resolve(root, ".first/.first"), Some(c));
    }

    #[test]
    fn resolve_first_last_on_leaf() {
        let (tree, _root, _a, _b, c, _d) = build_tree();
        assert_eq!(tree.resolve(c, ".first"), None);
        assert_eq!(tree.resolve(c, ".last"), None);
    }

    #[test]
    fn resolve_stay_and_empty_portions() {
        let (tree, root, a, ..) = build_tree();
        assert_eq!(tree.resolve(root, "."), Some(root));
        assert_eq!(tree.resolve(root, ""), Some(root));
        assert_eq!(tree.resolve(root, "a//."), Some(a));
    }

    #[test]
    fn resolve_short_circuits() {
        let (tree, root, ..) = build_tree();
        // "nonexistent" fails; ".." must not resurrect the resolution.
        assert_eq!(tree.resolve(root, "nonexistent/.."), None);
    }

    #[test]
    fn resolve_unlabeled_children_do_not_match() {
        let mut tree = Tree::new();
        let root = tree.insert(Named(Some("root")));
        let anon = tree.insert(Named(None));
        tree.add_child(root, anon);
        assert_eq!(tree.resolve(root, "anon"), None);
        assert_eq!(tree.resolve(root, ".first"), Some(anon));
    }
}
