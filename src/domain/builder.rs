//! Tree builder for materializing outlines into an arena.

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::error::TreeResult;

/// Declarative description of one node.
///
/// A node with `children` (even an empty list) is a composite; otherwise it is
/// a leaf measuring `size` (0 when omitted). Outline loading rejects entries
/// that carry both.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutlineNode {
    pub name: String,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub children: Option<Vec<OutlineNode>>,
}

impl OutlineNode {
    pub fn leaf(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size: Some(size),
            children: None,
        }
    }

    pub fn composite(name: impl Into<String>, children: Vec<OutlineNode>) -> Self {
        Self {
            name: name.into(),
            size: None,
            children: Some(children),
        }
    }
}

/// Constructs trees from outlines through the public mutation interface,
/// so built trees obey the same invariants as hand-assembled ones.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: TreeArena<f64>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the outline as a new detached tree and returns its root.
    #[instrument(level = "debug", skip(self, outline), fields(root = %outline.name))]
    pub fn add_outline(&mut self, outline: &OutlineNode) -> TreeResult<NodeId> {
        let root = self.materialize(outline)?;
        debug!(nodes = self.tree.len(), "outline materialized");
        Ok(root)
    }

    fn materialize(&mut self, outline: &OutlineNode) -> TreeResult<NodeId> {
        match &outline.children {
            None => Ok(self
                .tree
                .new_leaf(outline.name.as_str(), outline.size.unwrap_or_default())),
            Some(children) => {
                let id = self.tree.new_composite(outline.name.as_str());
                for child in children {
                    let child_id = self.materialize(child)?;
                    self.tree.add_child(id, child_id, None)?;
                }
                Ok(id)
            }
        }
    }

    pub fn build(self) -> TreeArena<f64> {
        self.tree
    }
}
