//! Detached, fail-fast pre-order cursor.
//!
//! A [`Cursor`] holds node handles rather than a borrow of the arena, so the
//! tree can be mutated between steps. On creation it records the modification
//! counter of its root; every structural change below that root bumps the
//! counter, and the next `next`/`has_next` then fails with
//! [`TreeError::ConcurrentModification`]. Recovery is the caller's business,
//! typically by creating a fresh cursor.

use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::error::{TreeError, TreeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    NotStarted,
    Positioned(NodeId),
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct Cursor {
    root: NodeId,
    expected_mod_count: u64,
    pending: Vec<NodeId>,
    state: CursorState,
}

impl<P> TreeArena<P> {
    /// Starts a pre-order cursor over the subtree rooted at `root`.
    #[instrument(level = "trace", skip(self))]
    pub fn cursor(&self, root: NodeId) -> TreeResult<Cursor> {
        Ok(Cursor {
            root,
            expected_mod_count: self.mod_count(root)?,
            pending: vec![root],
            state: CursorState::NotStarted,
        })
    }
}

impl Cursor {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    fn check<P>(&self, tree: &TreeArena<P>) -> TreeResult<()> {
        match tree.mod_count(self.root) {
            Ok(current) if current == self.expected_mod_count => Ok(()),
            _ => {
                debug!(root = %self.root, "structural change since cursor creation");
                Err(TreeError::ConcurrentModification { root: self.root })
            }
        }
    }

    /// True iff the following [`Cursor::next`] would yield a node.
    pub fn has_next<P>(&self, tree: &TreeArena<P>) -> TreeResult<bool> {
        self.check(tree)?;
        Ok(!self.pending.is_empty())
    }

    /// Advances to the next node in pre-order.
    pub fn next<P>(&mut self, tree: &TreeArena<P>) -> TreeResult<NodeId> {
        self.check(tree)?;
        let Some(current) = self.pending.pop() else {
            self.state = CursorState::Exhausted;
            return Err(TreeError::Exhausted);
        };
        self.pending
            .extend(tree.children(current)?.iter().rev().copied());
        self.state = CursorState::Positioned(current);
        Ok(current)
    }

    /// Drains the remaining nodes, failing on the first error.
    pub fn collect_remaining<P>(&mut self, tree: &TreeArena<P>) -> TreeResult<Vec<NodeId>> {
        let mut nodes = Vec::new();
        while self.has_next(tree)? {
            nodes.push(self.next(tree)?);
        }
        Ok(nodes)
    }
}
