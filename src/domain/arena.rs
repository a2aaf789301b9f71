use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, warn};

use crate::domain::error::{TreeError, TreeResult};

/// Stable handle of a node inside a [`TreeArena`].
///
/// Handles are generational: once a node is deleted its handle never resolves
/// again, even if the slot is reused by a later node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}v{}", slot, generation)
    }
}

/// Concrete node kinds. Only the visitor dispatch table branches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Leaf,
    Composite,
}

impl NodeKind {
    pub const COUNT: usize = 2;
    pub const ALL: [NodeKind; NodeKind::COUNT] = [NodeKind::Leaf, NodeKind::Composite];

    /// Dense index used by dispatch tables.
    pub const fn index(self) -> usize {
        match self {
            NodeKind::Leaf => 0,
            NodeKind::Composite => 1,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Leaf => write!(f, "leaf"),
            NodeKind::Composite => write!(f, "composite"),
        }
    }
}

/// Intrinsic data carried by a leaf.
pub trait Payload {
    fn measure(&self) -> f64;
}

macro_rules! numeric_payload {
    ($($t:ty),*) => {
        $(
            impl Payload for $t {
                fn measure(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

numeric_payload!(f64, f32, u64, u32, u16, u8, usize, i64, i32);

/// Children of a composite plus its modification counter.
#[derive(Debug, Default)]
pub struct Composite {
    children: Vec<NodeId>,
    /// Bumped on every structural change of this composite or any descendant
    mod_count: u64,
}

#[derive(Debug)]
pub enum NodeBody<P> {
    Leaf(P),
    Composite(Composite),
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode<P> {
    label: String,
    parent: Option<NodeId>,
    body: NodeBody<P>,
}

impl<P> TreeNode<P> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::Leaf(_) => NodeKind::Leaf,
            NodeBody::Composite(_) => NodeKind::Composite,
        }
    }

    pub fn body(&self) -> &NodeBody<P> {
        &self.body
    }

    /// Leaf payload, `None` for composites.
    pub fn payload(&self) -> Option<&P> {
        match &self.body {
            NodeBody::Leaf(payload) => Some(payload),
            NodeBody::Composite(_) => None,
        }
    }

    /// Ordered children; always empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        match &self.body {
            NodeBody::Leaf(_) => &[],
            NodeBody::Composite(composite) => &composite.children,
        }
    }
}

/// Borrowed view of one node, handed to visitors and iterators.
///
/// `depth` is relative to the node a traversal started from.
pub struct NodeRef<'a, P> {
    tree: &'a TreeArena<P>,
    id: NodeId,
    node: &'a TreeNode<P>,
    depth: usize,
}

impl<P> Clone for NodeRef<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for NodeRef<'_, P> {}

impl<P> fmt::Debug for NodeRef<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("label", &self.node.label)
            .field("depth", &self.depth)
            .finish()
    }
}

impl<'a, P> NodeRef<'a, P> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    pub fn label(&self) -> &'a str {
        &self.node.label
    }

    pub fn payload(&self) -> Option<&'a P> {
        self.node.payload()
    }

    pub fn children(&self) -> &'a [NodeId] {
        self.node.children()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.node.parent
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn tree(&self) -> &'a TreeArena<P> {
        self.tree
    }
}

impl<P: Payload> NodeRef<'_, P> {
    pub fn measure(&self) -> TreeResult<f64> {
        self.tree.measure(self.id)
    }
}

/// Formatting knobs for [`TreeArena::describe_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeStyle {
    /// Spaces per depth level
    pub indent: usize,
    /// Append the node's measure to each line
    pub show_measure: bool,
}

impl Default for DescribeStyle {
    fn default() -> Self {
        Self {
            indent: 2,
            show_measure: true,
        }
    }
}

impl DescribeStyle {
    /// One description line for `node`, indented for `depth`.
    pub fn line<P: Payload>(&self, node: &NodeRef<'_, P>, depth: usize) -> TreeResult<String> {
        let measure = if self.show_measure {
            Some(node.measure()?)
        } else {
            None
        };
        Ok(self.format(node, depth, measure))
    }

    fn format<P>(&self, node: &NodeRef<'_, P>, depth: usize, measure: Option<f64>) -> String {
        let pad = " ".repeat(self.indent * depth);
        let mut line = match node.kind() {
            NodeKind::Leaf => format!("{}{}", pad, node.label()),
            NodeKind::Composite => format!("{}{} [{}]", pad, node.label(), node.children().len()),
        };
        if let Some(measure) = measure {
            line.push_str(&format!(": {}", measure));
        }
        line
    }
}

/// Arena-based forest of leaves and composites.
///
/// Nodes are created detached and attached with [`TreeArena::add_child`].
/// Every parentless node is the root of its own tree.
#[derive(Debug)]
pub struct TreeArena<P> {
    arena: Arena<TreeNode<P>>,
}

impl<P> Default for TreeArena<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> TreeArena<P> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    #[instrument(level = "trace", skip(self, payload))]
    pub fn new_leaf(&mut self, label: impl Into<String> + fmt::Debug, payload: P) -> NodeId {
        self.insert(label.into(), NodeBody::Leaf(payload))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn new_composite(&mut self, label: impl Into<String> + fmt::Debug) -> NodeId {
        self.insert(label.into(), NodeBody::Composite(Composite::default()))
    }

    fn insert(&mut self, label: String, body: NodeBody<P>) -> NodeId {
        NodeId(self.arena.insert(TreeNode {
            label,
            parent: None,
            body,
        }))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn node(&self, id: NodeId) -> TreeResult<&TreeNode<P>> {
        self.arena.get(id.0).ok_or(TreeError::NotFound(id))
    }

    pub fn node_ref(&self, id: NodeId) -> TreeResult<NodeRef<'_, P>> {
        self.node_ref_at(id, 0)
    }

    pub(crate) fn node_ref_at(&self, id: NodeId, depth: usize) -> TreeResult<NodeRef<'_, P>> {
        Ok(NodeRef {
            tree: self,
            id,
            node: self.node(id)?,
            depth,
        })
    }

    pub fn kind(&self, id: NodeId) -> TreeResult<NodeKind> {
        Ok(self.node(id)?.kind())
    }

    pub fn parent(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    /// Parentless nodes, in arena slot order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.arena
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(idx, _)| NodeId(idx))
    }

    /// Structural modification counter of the subtree rooted at `id`.
    /// Leaves have no structure of their own and always report zero.
    pub fn mod_count(&self, id: NodeId) -> TreeResult<u64> {
        match &self.node(id)?.body {
            NodeBody::Leaf(_) => Ok(0),
            NodeBody::Composite(composite) => Ok(composite.mod_count),
        }
    }

    /// True if `ancestor` lies on the parent chain above `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.arena.get(node.0).and_then(|n| n.parent);
        while let Some(idx) = current {
            if idx == ancestor {
                return true;
            }
            current = self.arena.get(idx.0).and_then(|n| n.parent);
        }
        false
    }

    fn composite(&self, id: NodeId, operation: &str) -> TreeResult<&Composite> {
        match &self.node(id)?.body {
            NodeBody::Composite(composite) => Ok(composite),
            NodeBody::Leaf(_) => Err(TreeError::unsupported(operation, NodeKind::Leaf)),
        }
    }

    fn composite_mut(&mut self, id: NodeId, operation: &str) -> TreeResult<&mut Composite> {
        match self.arena.get_mut(id.0) {
            Some(TreeNode {
                body: NodeBody::Composite(composite),
                ..
            }) => Ok(composite),
            Some(_) => Err(TreeError::unsupported(operation, NodeKind::Leaf)),
            None => Err(TreeError::NotFound(id)),
        }
    }

    fn position_of(&self, parent: NodeId, node: NodeId, operation: &str) -> TreeResult<usize> {
        self.composite(parent, operation)?
            .children
            .iter()
            .position(|&child| child == node)
            .ok_or(TreeError::NotFound(node))
    }

    /// Bumps the modification counter of `id` and every composite above it.
    fn touch(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(idx) = current {
            let Some(node) = self.arena.get_mut(idx.0) else {
                break;
            };
            if let NodeBody::Composite(composite) = &mut node.body {
                composite.mod_count += 1;
            }
            current = node.parent;
        }
    }

    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.arena.get_mut(id.0) {
            node.parent = parent;
        }
    }

    /// Inserts `node` into `parent`'s children at `at` (default: append).
    ///
    /// The node must be detached. Checks run before anything is touched, so a
    /// failed call leaves the tree unchanged.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: NodeId, node: NodeId, at: Option<usize>) -> TreeResult<()> {
        let owner = self.node(node)?.parent;
        self.node(parent)?;
        if node == parent || self.is_ancestor(node, parent) {
            warn!(%parent, %node, "rejecting insert that would create a cycle");
            return Err(TreeError::CycleDetected { parent, node });
        }
        let len = self.composite(parent, "add_child")?.children.len();
        if let Some(owner) = owner {
            return Err(TreeError::AlreadyOwned {
                node,
                parent: owner,
            });
        }
        let index = at.unwrap_or(len);
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }

        self.composite_mut(parent, "add_child")?
            .children
            .insert(index, node);
        self.set_parent(node, Some(parent));
        self.touch(parent);
        debug!(%parent, %node, index, "child added");
        Ok(())
    }

    /// Detaches `node` from `parent`. The subtree is kept; the caller now owns it.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_child(&mut self, parent: NodeId, node: NodeId) -> TreeResult<NodeId> {
        let index = self.position_of(parent, node, "remove_child")?;
        self.composite_mut(parent, "remove_child")?
            .children
            .remove(index);
        self.set_parent(node, None);
        self.touch(parent);
        debug!(%parent, %node, index, "child removed");
        Ok(node)
    }

    /// Moves a direct child of `parent` to `new_index` within the same parent.
    #[instrument(level = "debug", skip(self))]
    pub fn move_child(&mut self, parent: NodeId, node: NodeId, new_index: usize) -> TreeResult<()> {
        let index = self.position_of(parent, node, "move_child")?;
        if index == new_index {
            return Ok(());
        }
        let composite = self.composite_mut(parent, "move_child")?;
        let len = composite.children.len();
        if new_index >= len {
            return Err(TreeError::IndexOutOfBounds {
                index: new_index,
                len,
            });
        }
        composite.children.remove(index);
        composite.children.insert(new_index, node);
        self.touch(parent);
        debug!(%parent, %node, from = index, to = new_index, "child moved");
        Ok(())
    }

    /// Frees `id` and every node it owns, detaching it from its parent first.
    /// Returns the number of nodes freed.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: NodeId) -> TreeResult<usize> {
        if let Some(parent) = self.node(id)?.parent {
            self.remove_child(parent, id)?;
        }

        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current.0) {
                stack.extend(node.children());
                freed += 1;
            }
        }
        debug!(%id, freed, "subtree deleted");
        Ok(freed)
    }

    /// Replaces a leaf's payload. Not a structural change; cursors stay valid.
    pub fn set_payload(&mut self, id: NodeId, payload: P) -> TreeResult<P> {
        match self.arena.get_mut(id.0) {
            Some(TreeNode {
                body: NodeBody::Leaf(current),
                ..
            }) => Ok(std::mem::replace(current, payload)),
            Some(_) => Err(TreeError::unsupported("set_payload", NodeKind::Composite)),
            None => Err(TreeError::NotFound(id)),
        }
    }

    pub fn rename(&mut self, id: NodeId, label: impl Into<String>) -> TreeResult<()> {
        let node = self.arena.get_mut(id.0).ok_or(TreeError::NotFound(id))?;
        node.label = label.into();
        Ok(())
    }

    /// Number of levels in the subtree rooted at `id` (a lone leaf has depth 1).
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self, id: NodeId) -> TreeResult<usize> {
        self.node(id)?;
        Ok(self.iter(id).map(|node| node.depth() + 1).max().unwrap_or(1))
    }

    /// Labels of all leaves below `id`, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_labels(&self, id: NodeId) -> TreeResult<Vec<String>> {
        self.node(id)?;
        Ok(self
            .iter(id)
            .filter(|node| node.kind() == NodeKind::Leaf)
            .map(|node| node.label().to_string())
            .collect())
    }
}

impl<P: Payload> TreeArena<P> {
    /// Leaf payload measure, or the sum over all leaves below a composite.
    /// Recomputed on every call.
    #[instrument(level = "trace", skip(self))]
    pub fn measure(&self, id: NodeId) -> TreeResult<f64> {
        self.node(id)?;
        Ok(self
            .iter(id)
            .filter_map(|node| node.payload())
            .map(|payload| payload.measure())
            .sum())
    }

    /// Measure of every node in the subtree, computed in one post-order pass.
    fn subtree_measures(&self, id: NodeId) -> HashMap<NodeId, f64> {
        let mut measures: HashMap<NodeId, f64> = HashMap::new();
        for node in self.iter_postorder(id) {
            let total = match node.payload() {
                Some(payload) => payload.measure(),
                None => node
                    .children()
                    .iter()
                    .filter_map(|child| measures.get(child))
                    .sum(),
            };
            measures.insert(node.id(), total);
        }
        measures
    }

    pub fn describe(&self, id: NodeId, depth: usize) -> TreeResult<Vec<String>> {
        self.describe_with(id, depth, &DescribeStyle::default())
    }

    /// One line per node in pre-order, `id` at `depth` and each level below one deeper.
    #[instrument(level = "debug", skip(self, style))]
    pub fn describe_with(
        &self,
        id: NodeId,
        depth: usize,
        style: &DescribeStyle,
    ) -> TreeResult<Vec<String>> {
        self.node(id)?;
        let measures = if style.show_measure {
            self.subtree_measures(id)
        } else {
            HashMap::new()
        };
        Ok(self
            .iter(id)
            .map(|node| {
                let measure = measures.get(&node.id()).copied();
                style.format(&node, depth + node.depth(), measure)
            })
            .collect())
    }
}
