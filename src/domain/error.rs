//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::{NodeId, NodeKind};

/// Tree errors represent violated structural contracts.
/// All of them are raised at the offending call and leave the tree unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("cycle detected: {node} cannot become a child of {parent}")]
    CycleDetected { parent: NodeId, node: NodeId },

    #[error("node {node} is already owned by {parent}")]
    AlreadyOwned { node: NodeId, parent: NodeId },

    #[error("node not found: {0}")]
    NotFound(NodeId),

    #[error("unsupported operation: {operation} on {kind} node")]
    UnsupportedOperation {
        operation: String,
        kind: NodeKind,
    },

    #[error("tree modified during traversal rooted at {root}")]
    ConcurrentModification { root: NodeId },

    #[error("traversal exhausted")]
    Exhausted,

    #[error("index {index} out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl TreeError {
    pub(crate) fn unsupported(operation: impl Into<String>, kind: NodeKind) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            kind,
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
