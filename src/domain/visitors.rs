//! Stock visitors used by the CLI and as templates for new operations.

use crate::domain::arena::{DescribeStyle, NodeId, NodeKind, NodeRef, Payload};
use crate::domain::error::TreeResult;
use crate::domain::visitor::{HandlerTable, VisitFlow, Visitor};

fn descend<V, P>(_: &mut V, _: &NodeRef<'_, P>) -> TreeResult<VisitFlow> {
    Ok(VisitFlow::Continue)
}

/// Sums leaf measures. Composites contribute nothing of their own.
#[derive(Debug)]
pub struct MeasureSum<P> {
    pub total: f64,
    table: HandlerTable<Self, P>,
}

impl<P: Payload> Default for MeasureSum<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload> MeasureSum<P> {
    pub fn new() -> Self {
        let table = HandlerTable::new()
            .on(NodeKind::Leaf, Self::visit_leaf)
            .on(NodeKind::Composite, descend);
        Self { total: 0.0, table }
    }

    fn visit_leaf(&mut self, node: &NodeRef<'_, P>) -> TreeResult<VisitFlow> {
        if let Some(payload) = node.payload() {
            self.total += payload.measure();
        }
        Ok(VisitFlow::Continue)
    }
}

impl<P> Visitor<P> for MeasureSum<P> {
    fn name(&self) -> &str {
        "measure-sum"
    }

    fn handlers(&self) -> HandlerTable<Self, P> {
        self.table
    }
}

/// Counts visited nodes per kind.
#[derive(Debug)]
pub struct KindCounter<P> {
    counts: [usize; NodeKind::COUNT],
    table: HandlerTable<Self, P>,
}

impl<P> Default for KindCounter<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> KindCounter<P> {
    pub fn new() -> Self {
        Self {
            counts: [0; NodeKind::COUNT],
            table: HandlerTable::new().on_any(Self::count),
        }
    }

    fn count(&mut self, node: &NodeRef<'_, P>) -> TreeResult<VisitFlow> {
        self.counts[node.kind().index()] += 1;
        Ok(VisitFlow::Continue)
    }

    pub fn get(&self, kind: NodeKind) -> usize {
        self.counts[kind.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl<P> Visitor<P> for KindCounter<P> {
    fn name(&self) -> &str {
        "kind-counter"
    }

    fn handlers(&self) -> HandlerTable<Self, P> {
        self.table
    }
}

/// Collects leaf labels left to right.
#[derive(Debug)]
pub struct LeafCollector<P> {
    pub labels: Vec<String>,
    table: HandlerTable<Self, P>,
}

impl<P> Default for LeafCollector<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> LeafCollector<P> {
    pub fn new() -> Self {
        let table = HandlerTable::new()
            .on(NodeKind::Leaf, Self::visit_leaf)
            .on(NodeKind::Composite, descend);
        Self {
            labels: Vec::new(),
            table,
        }
    }

    fn visit_leaf(&mut self, node: &NodeRef<'_, P>) -> TreeResult<VisitFlow> {
        self.labels.push(node.label().to_string());
        Ok(VisitFlow::Continue)
    }
}

impl<P> Visitor<P> for LeafCollector<P> {
    fn name(&self) -> &str {
        "leaf-collector"
    }

    fn handlers(&self) -> HandlerTable<Self, P> {
        self.table
    }
}

/// Produces the same lines as [`crate::domain::TreeArena::describe_with`],
/// driven by dispatch instead of recursion inside the arena. With a
/// `max_depth` the walk is pruned below that depth.
#[derive(Debug)]
pub struct Renderer<P> {
    pub lines: Vec<String>,
    style: DescribeStyle,
    base_depth: usize,
    max_depth: Option<usize>,
    table: HandlerTable<Self, P>,
}

impl<P: Payload> Renderer<P> {
    pub fn new(style: DescribeStyle, base_depth: usize) -> Self {
        Self {
            lines: Vec::new(),
            style,
            base_depth,
            max_depth: None,
            table: HandlerTable::new().on_any(Self::render),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    fn render(&mut self, node: &NodeRef<'_, P>) -> TreeResult<VisitFlow> {
        let line = self.style.line(node, self.base_depth + node.depth())?;
        self.lines.push(line);
        match self.max_depth {
            Some(max) if node.depth() >= max => Ok(VisitFlow::SkipChildren),
            _ => Ok(VisitFlow::Continue),
        }
    }
}

impl<P> Visitor<P> for Renderer<P> {
    fn name(&self) -> &str {
        "renderer"
    }

    fn handlers(&self) -> HandlerTable<Self, P> {
        self.table
    }
}

/// Records labels down to `max_depth`, pruning deeper subtrees.
#[derive(Debug)]
pub struct DepthLimit<P> {
    pub max_depth: usize,
    pub labels: Vec<String>,
    table: HandlerTable<Self, P>,
}

impl<P> DepthLimit<P> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            labels: Vec::new(),
            table: HandlerTable::new().on_any(Self::visit),
        }
    }

    fn visit(&mut self, node: &NodeRef<'_, P>) -> TreeResult<VisitFlow> {
        self.labels.push(node.label().to_string());
        if node.depth() >= self.max_depth {
            Ok(VisitFlow::SkipChildren)
        } else {
            Ok(VisitFlow::Continue)
        }
    }
}

impl<P> Visitor<P> for DepthLimit<P> {
    fn name(&self) -> &str {
        "depth-limit"
    }

    fn handlers(&self) -> HandlerTable<Self, P> {
        self.table
    }
}

/// Finds the first node in pre-order carrying `label`, then stops.
#[derive(Debug)]
pub struct FindFirst<P> {
    pub label: String,
    pub found: Option<NodeId>,
    pub visited: usize,
    table: HandlerTable<Self, P>,
}

impl<P> FindFirst<P> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            found: None,
            visited: 0,
            table: HandlerTable::new().on_any(Self::visit),
        }
    }

    fn visit(&mut self, node: &NodeRef<'_, P>) -> TreeResult<VisitFlow> {
        self.visited += 1;
        if node.label() == self.label {
            self.found = Some(node.id());
            return Ok(VisitFlow::Stop);
        }
        Ok(VisitFlow::Continue)
    }
}

impl<P> Visitor<P> for FindFirst<P> {
    fn name(&self) -> &str {
        "find-first"
    }

    fn handlers(&self) -> HandlerTable<Self, P> {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::TreeArena;

    fn sample() -> (TreeArena<f64>, NodeId) {
        let mut tree = TreeArena::new();
        let root = tree.new_composite("root");
        let a = tree.new_composite("a");
        let a1 = tree.new_leaf("a1", 1.5);
        let a2 = tree.new_leaf("a2", 2.5);
        let b = tree.new_leaf("b", 4.0);
        tree.add_child(root, a, None).unwrap();
        tree.add_child(a, a1, None).unwrap();
        tree.add_child(a, a2, None).unwrap();
        tree.add_child(root, b, None).unwrap();
        (tree, root)
    }

    #[test]
    fn test_measure_sum_matches_measure() {
        let (tree, root) = sample();
        let mut sum = MeasureSum::new();
        tree.accept(root, &mut sum).unwrap();
        assert_eq!(sum.total, tree.measure(root).unwrap());
        assert_eq!(sum.total, 8.0);
    }

    #[test]
    fn test_kind_counter() {
        let (tree, root) = sample();
        let mut counter = KindCounter::new();
        tree.accept(root, &mut counter).unwrap();
        assert_eq!(counter.get(NodeKind::Composite), 2);
        assert_eq!(counter.get(NodeKind::Leaf), 3);
        assert_eq!(counter.total(), 5);
    }

    #[test]
    fn test_renderer_matches_describe() {
        let (tree, root) = sample();
        let style = DescribeStyle::default();
        let mut renderer = Renderer::new(style.clone(), 1);
        tree.accept(root, &mut renderer).unwrap();
        assert_eq!(renderer.lines, tree.describe_with(root, 1, &style).unwrap());
    }

    #[test]
    fn test_renderer_max_depth() {
        let (tree, root) = sample();
        let style = DescribeStyle {
            indent: 1,
            show_measure: false,
        };
        let mut renderer = Renderer::new(style, 0).with_max_depth(1);
        tree.accept(root, &mut renderer).unwrap();
        assert_eq!(renderer.lines, vec!["root [2]", " a [2]", " b"]);
    }

    #[test]
    fn test_depth_limit_skips_subtree_but_not_siblings() {
        let (tree, root) = sample();
        let mut limit = DepthLimit::new(1);
        let flow = tree.accept(root, &mut limit).unwrap();
        assert_eq!(flow, VisitFlow::Continue);
        assert_eq!(limit.labels, vec!["root", "a", "b"]);
    }

    #[test]
    fn test_find_first_stops_whole_walk() {
        let (tree, root) = sample();
        let mut find = FindFirst::new("a1");
        let flow = tree.accept(root, &mut find).unwrap();
        assert_eq!(flow, VisitFlow::Stop);
        assert!(find.found.is_some());
        assert_eq!(find.visited, 3);
    }
}
