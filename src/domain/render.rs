use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{NodeId, NodeKind, Payload, TreeArena};
use crate::domain::error::{TreeError, TreeResult};

pub trait TreeRender {
    /// Box-drawing rendering of the subtree rooted at `root`.
    fn to_tree_string(&self, root: NodeId) -> TreeResult<Tree<String>>;
}

impl<P: Payload> TreeRender for TreeArena<P> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, root: NodeId) -> TreeResult<Tree<String>> {
        self.node(root)?;

        // Finished subtrees with their measures; in post-order a node's
        // children are the topmost entries when the node itself comes up.
        let mut built: Vec<(Tree<String>, f64)> = Vec::new();
        for node in self.iter_postorder(root) {
            let first_child = built.len().saturating_sub(node.children().len());
            let children = built.split_off(first_child);
            let (text, total) = match node.kind() {
                NodeKind::Leaf => {
                    let total = node.payload().map(|p| p.measure()).unwrap_or_default();
                    (format!("{} ({})", node.label(), total), total)
                }
                NodeKind::Composite => {
                    let total: f64 = children.iter().map(|(_, measure)| measure).sum();
                    (format!("{}/ ({})", node.label(), total), total)
                }
            };
            let leaves = children.into_iter().map(|(tree, _)| tree);
            built.push((Tree::new(text).with_leaves(leaves), total));
        }

        built
            .pop()
            .map(|(tree, _)| tree)
            .ok_or(TreeError::NotFound(root))
    }
}
