//! Double dispatch through handler tables

use arbor::domain::visitor::dispatch;
use arbor::util::testing;
use arbor::{
    HandlerTable, NodeId, NodeKind, NodeRef, TreeArena, TreeError, TreeResult, VisitFlow, Visitor,
};
use rstest::{fixture, rstest};

/// Records which handler ran for which node.
#[derive(Debug)]
struct Recorder {
    calls: Vec<(&'static str, String)>,
    table: HandlerTable<Recorder, u32>,
}

impl Recorder {
    fn full() -> Self {
        Self::with(
            HandlerTable::new()
                .on(NodeKind::Leaf, Self::on_leaf)
                .on(NodeKind::Composite, Self::on_composite),
        )
    }

    fn leaves_only() -> Self {
        Self::with(HandlerTable::new().on(NodeKind::Leaf, Self::on_leaf))
    }

    fn with(table: HandlerTable<Recorder, u32>) -> Self {
        Self {
            calls: Vec::new(),
            table,
        }
    }

    fn on_leaf(&mut self, node: &NodeRef<'_, u32>) -> TreeResult<VisitFlow> {
        self.calls.push(("leaf", node.label().to_string()));
        Ok(VisitFlow::Continue)
    }

    fn on_composite(&mut self, node: &NodeRef<'_, u32>) -> TreeResult<VisitFlow> {
        self.calls.push(("composite", node.label().to_string()));
        Ok(VisitFlow::Continue)
    }
}

impl Visitor<u32> for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn handlers(&self) -> HandlerTable<Self, u32> {
        self.table
    }
}

/// Skips the subtree of one label and stops at another.
struct Steering {
    skip: &'static str,
    stop: &'static str,
    seen: Vec<String>,
}

impl Steering {
    fn steer(&mut self, node: &NodeRef<'_, u32>) -> TreeResult<VisitFlow> {
        self.seen.push(node.label().to_string());
        Ok(match node.label() {
            label if label == self.stop => VisitFlow::Stop,
            label if label == self.skip => VisitFlow::SkipChildren,
            _ => VisitFlow::Continue,
        })
    }
}

impl Visitor<u32> for Steering {
    fn name(&self) -> &str {
        "steering"
    }

    fn handlers(&self) -> HandlerTable<Self, u32> {
        HandlerTable::new().on_any(Self::steer)
    }
}

/// Fails on a chosen label to show handler errors propagate.
struct Failing;

impl Visitor<u32> for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn handlers(&self) -> HandlerTable<Self, u32> {
        HandlerTable::new().on_any(|_, node| {
            if node.label() == "A2" {
                Err(TreeError::NotFound(node.id()))
            } else {
                Ok(VisitFlow::Continue)
            }
        })
    }
}

// root
// ├── A
// │   ├── A1
// │   └── A2
// └── B
#[fixture]
fn tree() -> (TreeArena<u32>, NodeId) {
    testing::init_test_setup();
    let mut tree = TreeArena::new();
    let root = tree.new_composite("root");
    let a = tree.new_composite("A");
    let a1 = tree.new_leaf("A1", 1);
    let a2 = tree.new_leaf("A2", 2);
    let b = tree.new_leaf("B", 3);
    tree.add_child(root, a, None).unwrap();
    tree.add_child(a, a1, None).unwrap();
    tree.add_child(a, a2, None).unwrap();
    tree.add_child(root, b, None).unwrap();
    (tree, root)
}

fn calls(recorder: &Recorder) -> Vec<(&'static str, &str)> {
    recorder
        .calls
        .iter()
        .map(|(handler, label)| (*handler, label.as_str()))
        .collect()
}

#[rstest]
fn given_mixed_tree_when_accepting_then_each_kind_gets_its_handler(tree: (TreeArena<u32>, NodeId)) {
    let (tree, root) = tree;
    let mut recorder = Recorder::full();

    let flow = tree.accept(root, &mut recorder).unwrap();

    assert_eq!(flow, VisitFlow::Continue);
    assert_eq!(
        calls(&recorder),
        vec![
            ("composite", "root"),
            ("composite", "A"),
            ("leaf", "A1"),
            ("leaf", "A2"),
            ("leaf", "B"),
        ]
    );
}

#[rstest]
fn given_missing_composite_handler_when_accepting_then_fails_at_composite(
    tree: (TreeArena<u32>, NodeId),
) {
    let (tree, root) = tree;
    let mut recorder = Recorder::leaves_only();

    let err = tree.accept(root, &mut recorder).unwrap_err();

    assert_eq!(
        err,
        TreeError::UnsupportedOperation {
            operation: "recorder visitor".to_string(),
            kind: NodeKind::Composite,
        }
    );
    assert!(recorder.calls.is_empty(), "no handler runs for or below the failing node");
}

#[rstest]
fn given_missing_composite_handler_when_walk_meets_no_composite_then_succeeds(
    tree: (TreeArena<u32>, NodeId),
) {
    let (tree, root) = tree;
    let a = tree.children(root).unwrap()[0];
    let a1 = tree.children(a).unwrap()[0];
    let mut recorder = Recorder::leaves_only();

    // Lookup happens per node, so a partial table is only rejected on contact
    assert_eq!(tree.accept(a1, &mut recorder).unwrap(), VisitFlow::Continue);
    assert!(tree.accept(a, &mut recorder).is_err());

    assert_eq!(calls(&recorder), vec![("leaf", "A1")]);
}

#[rstest]
fn given_skip_children_when_accepting_then_siblings_still_visited(tree: (TreeArena<u32>, NodeId)) {
    let (tree, root) = tree;
    let mut steering = Steering {
        skip: "A",
        stop: "none",
        seen: Vec::new(),
    };

    let flow = tree.accept(root, &mut steering).unwrap();

    assert_eq!(flow, VisitFlow::Continue);
    assert_eq!(steering.seen, vec!["root", "A", "B"]);
}

#[rstest]
fn given_stop_when_accepting_then_whole_walk_aborts(tree: (TreeArena<u32>, NodeId)) {
    let (tree, root) = tree;
    let mut steering = Steering {
        skip: "none",
        stop: "A1",
        seen: Vec::new(),
    };

    let flow = tree.accept(root, &mut steering).unwrap();

    assert_eq!(flow, VisitFlow::Stop);
    assert_eq!(steering.seen, vec!["root", "A", "A1"]);
}

#[rstest]
fn given_handler_error_when_accepting_then_propagated(tree: (TreeArena<u32>, NodeId)) {
    let (tree, root) = tree;
    let err = tree.accept(root, &mut Failing).unwrap_err();
    assert!(matches!(err, TreeError::NotFound(_)));
}

#[rstest]
fn given_single_node_when_dispatching_then_no_recursion(tree: (TreeArena<u32>, NodeId)) {
    let (tree, root) = tree;
    let mut recorder = Recorder::full();
    let node = tree.node_ref(root).unwrap();

    let flow = dispatch(&mut recorder, &node).unwrap();

    assert_eq!(flow, VisitFlow::Continue);
    assert_eq!(calls(&recorder), vec![("composite", "root")]);
}
