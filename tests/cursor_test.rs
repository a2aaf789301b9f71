//! Fail-fast cursor behavior under structural mutation

use arbor::util::testing;
use arbor::{CursorState, NodeId, TreeArena, TreeError};
use rstest::{fixture, rstest};

struct Small {
    tree: TreeArena<u32>,
    root: NodeId,
    left: NodeId,
    right: NodeId,
}

// root
// ├── left
// └── right
#[fixture]
fn small() -> Small {
    testing::init_test_setup();
    let mut tree = TreeArena::new();
    let root = tree.new_composite("root");
    let left = tree.new_composite("left");
    let right = tree.new_leaf("right", 2);
    tree.add_child(root, left, None).unwrap();
    tree.add_child(root, right, None).unwrap();
    Small {
        tree,
        root,
        left,
        right,
    }
}

#[rstest]
fn given_unmutated_tree_when_walking_then_all_nodes_in_preorder(small: Small) {
    let mut cursor = small.tree.cursor(small.root).unwrap();
    let mut seen = Vec::new();
    while cursor.has_next(&small.tree).unwrap() {
        seen.push(cursor.next(&small.tree).unwrap());
    }
    assert_eq!(seen, vec![small.root, small.left, small.right]);
    assert_eq!(cursor.next(&small.tree).unwrap_err(), TreeError::Exhausted);
    assert_eq!(cursor.state(), CursorState::Exhausted);
}

#[rstest]
fn given_add_child_after_first_next_then_concurrent_modification(mut small: Small) {
    let mut cursor = small.tree.cursor(small.root).unwrap();
    assert_eq!(cursor.next(&small.tree).unwrap(), small.root);

    let extra = small.tree.new_leaf("extra", 1);
    small.tree.add_child(small.root, extra, None).unwrap();

    assert_eq!(
        cursor.next(&small.tree).unwrap_err(),
        TreeError::ConcurrentModification { root: small.root }
    );
    assert!(matches!(
        cursor.has_next(&small.tree),
        Err(TreeError::ConcurrentModification { .. })
    ));
}

#[rstest]
#[case::remove("remove")]
#[case::move_child("move")]
#[case::nested_add("nested_add")]
#[case::delete("delete")]
fn given_any_structural_mutation_then_cursor_fails(mut small: Small, #[case] mutation: &str) {
    let mut cursor = small.tree.cursor(small.root).unwrap();
    cursor.next(&small.tree).unwrap();

    match mutation {
        "remove" => {
            small.tree.remove_child(small.root, small.right).unwrap();
        }
        "move" => small.tree.move_child(small.root, small.right, 0).unwrap(),
        "nested_add" => {
            let deep = small.tree.new_leaf("deep", 7);
            small.tree.add_child(small.left, deep, None).unwrap();
        }
        "delete" => {
            small.tree.delete(small.left).unwrap();
        }
        other => panic!("unknown mutation {}", other),
    }

    assert!(matches!(
        cursor.next(&small.tree),
        Err(TreeError::ConcurrentModification { .. })
    ));
}

#[rstest]
fn given_failed_mutation_then_cursor_still_valid(mut small: Small) {
    let mut cursor = small.tree.cursor(small.root).unwrap();
    cursor.next(&small.tree).unwrap();

    let err = small.tree.add_child(small.left, small.root, None).unwrap_err();
    assert!(matches!(err, TreeError::CycleDetected { .. }));

    assert_eq!(cursor.next(&small.tree).unwrap(), small.left);
}

#[rstest]
fn given_move_to_current_index_then_cursor_still_valid(mut small: Small) {
    let mut cursor = small.tree.cursor(small.root).unwrap();
    cursor.next(&small.tree).unwrap();

    small.tree.move_child(small.root, small.right, 1).unwrap();

    assert_eq!(small.tree.children(small.root).unwrap(), &[small.left, small.right]);
    assert_eq!(
        cursor.collect_remaining(&small.tree).unwrap(),
        vec![small.left, small.right]
    );
}

#[rstest]
fn given_mutation_outside_subtree_then_cursor_unaffected(mut small: Small) {
    let mut cursor = small.tree.cursor(small.left).unwrap();

    small.tree.move_child(small.root, small.right, 0).unwrap();

    assert_eq!(cursor.collect_remaining(&small.tree).unwrap(), vec![small.left]);
}

#[rstest]
fn given_two_cursors_then_independent(small: Small) {
    let mut first = small.tree.cursor(small.root).unwrap();
    let mut second = small.tree.cursor(small.root).unwrap();

    assert_eq!(first.next(&small.tree).unwrap(), small.root);
    assert_eq!(first.next(&small.tree).unwrap(), small.left);
    assert_eq!(second.next(&small.tree).unwrap(), small.root);

    assert_eq!(first.state(), CursorState::Positioned(small.left));
    assert_eq!(second.state(), CursorState::Positioned(small.root));
    assert_eq!(
        second.collect_remaining(&small.tree).unwrap(),
        vec![small.left, small.right]
    );
}

#[rstest]
fn given_concurrent_modification_when_recreating_cursor_then_sees_new_structure(mut small: Small) {
    let mut stale = small.tree.cursor(small.root).unwrap();
    let extra = small.tree.new_leaf("extra", 1);
    small.tree.add_child(small.left, extra, None).unwrap();
    assert!(stale.next(&small.tree).is_err());

    let mut fresh = small.tree.cursor(small.root).unwrap();
    assert_eq!(
        fresh.collect_remaining(&small.tree).unwrap(),
        vec![small.root, small.left, extra, small.right]
    );
}
