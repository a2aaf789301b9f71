//! Loading tree outlines from TOML files
//!
//! ```toml
//! [root]
//! name = "project"
//! children = [
//!     { name = "src", children = [{ name = "main.rs", size = 120 }] },
//!     { name = "README.md", size = 12 },
//! ]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{FindFirst, NodeId, OutlineNode, TreeArena, TreeBuilder};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutlineFile {
    pub root: OutlineNode,
}

/// A materialized outline: the arena plus the handle of its root.
#[derive(Debug)]
pub struct LoadedTree {
    pub tree: TreeArena<f64>,
    pub root: NodeId,
}

impl LoadedTree {
    /// Handle of the first node in pre-order labelled `label`.
    pub fn find(&self, label: &str) -> ApplicationResult<NodeId> {
        let mut finder = FindFirst::new(label);
        self.tree.accept(self.root, &mut finder)?;
        finder
            .found
            .ok_or_else(|| ApplicationError::LabelNotFound(label.to_string()))
    }
}

/// Parse outline TOML; `origin` only labels errors.
pub fn parse_outline(content: &str, origin: &Path) -> ApplicationResult<LoadedTree> {
    let outline: OutlineFile =
        toml::from_str(content).map_err(|e| ApplicationError::InvalidOutline {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
    check_entries(&outline.root).map_err(|message| ApplicationError::InvalidOutline {
        path: origin.to_path_buf(),
        message,
    })?;
    let mut builder = TreeBuilder::new();
    let root = builder.add_outline(&outline.root)?;
    Ok(LoadedTree {
        tree: builder.build(),
        root,
    })
}

/// An entry is either a leaf (`size`) or a composite (`children`), never both.
fn check_entries(root: &OutlineNode) -> Result<(), String> {
    let mut pending = vec![root];
    while let Some(entry) = pending.pop() {
        if let Some(children) = &entry.children {
            if entry.size.is_some() {
                return Err(format!(
                    "'{}' has both size and children; only leaves carry a size",
                    entry.name
                ));
            }
            pending.extend(children);
        }
    }
    Ok(())
}

#[instrument(level = "debug")]
pub fn load_outline(path: &Path) -> ApplicationResult<LoadedTree> {
    let content = fs::read_to_string(path).with_path_context("read outline", path)?;
    let loaded = parse_outline(&content, path)?;
    debug!(nodes = loaded.tree.len(), "outline loaded");
    Ok(loaded)
}
