//! Borrowing traversals.
//!
//! These hold a shared borrow of the arena, so the compiler rules out mutation
//! while they are alive. Use [`crate::domain::Cursor`] when the tree has to stay
//! mutable between steps.

use tracing::instrument;

use crate::domain::arena::{NodeId, NodeRef, TreeArena};

impl<P> TreeArena<P> {
    /// Pre-order walk of the subtree rooted at `root`.
    /// A stale `root` handle yields nothing.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self, root: NodeId) -> PreOrderIter<'_, P> {
        PreOrderIter::new(self, root)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self, root: NodeId) -> PostOrderIter<'_, P> {
        PostOrderIter::new(self, root)
    }
}

pub struct PreOrderIter<'a, P> {
    tree: &'a TreeArena<P>,
    stack: Vec<(NodeId, usize)>,
}

impl<'a, P> PreOrderIter<'a, P> {
    fn new(tree: &'a TreeArena<P>, root: NodeId) -> Self {
        let mut stack = Vec::new();
        if tree.contains(root) {
            stack.push((root, 0));
        }
        Self { tree, stack }
    }
}

impl<'a, P> Iterator for PreOrderIter<'a, P> {
    type Item = NodeRef<'a, P>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, depth)) = self.stack.pop() {
            if let Ok(node) = self.tree.node_ref_at(current, depth) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children().iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some(node);
            }
        }
        None
    }
}

pub struct PostOrderIter<'a, P> {
    tree: &'a TreeArena<P>,
    stack: Vec<(NodeId, usize, bool)>,
}

impl<'a, P> PostOrderIter<'a, P> {
    fn new(tree: &'a TreeArena<P>, root: NodeId) -> Self {
        let mut stack = Vec::new();
        if tree.contains(root) {
            stack.push((root, 0, false));
        }
        Self { tree, stack }
    }
}

impl<'a, P> Iterator for PostOrderIter<'a, P> {
    type Item = NodeRef<'a, P>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, depth, expanded)) = self.stack.pop() {
            let Ok(node) = self.tree.node_ref_at(current, depth) else {
                continue;
            };
            if expanded {
                return Some(node);
            }
            self.stack.push((current, depth, true));
            for &child in node.children().iter().rev() {
                self.stack.push((child, depth + 1, false));
            }
        }
        None
    }
}
