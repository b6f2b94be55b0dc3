//! Scenario: a straight line of blocks under one gated article. Each block
//! unlocks the next as it completes, and a settled tree stays settled.

use crate::support::{build_tree, complete, gated, id, is_locked, row};
use serde_json::json;
use sluice_content::NodeKind;
use sluice_engine::{apply_locks, inject_buttons};

fn course() -> sluice_content::ContentTree {
    build_tree(vec![
        row(NodeKind::Course, "m05"),
        row(NodeKind::Page, "co-05"),
        gated(NodeKind::Article, "a-05", json!({ "isEnabled": true })),
        row(NodeKind::Block, "b-05"),
        row(NodeKind::Component, "c-05"),
        row(NodeKind::Block, "b-10"),
        row(NodeKind::Component, "c-10"),
    ])
}

#[test]
fn the_first_block_is_open_and_the_second_locked() {
    let mut tree = course();
    apply_locks(&mut tree, None).unwrap();
    assert!(!is_locked(&tree, "b-05"));
    assert!(!is_locked(&tree, "c-05"));
    assert!(is_locked(&tree, "b-10"));
    assert!(is_locked(&tree, "c-10"));
}

#[test]
fn completing_the_first_block_unlocks_the_second() {
    let mut tree = course();
    apply_locks(&mut tree, None).unwrap();
    complete(&mut tree, "c-05");
    complete(&mut tree, "b-05");
    apply_locks(&mut tree, None).unwrap();
    assert!(!is_locked(&tree, "b-10"));
    assert!(!is_locked(&tree, "c-10"));
}

#[test]
fn a_settled_pass_writes_nothing() {
    let mut tree = course();
    apply_locks(&mut tree, None).unwrap();
    let again = apply_locks(&mut tree, None).unwrap();
    assert_eq!(again.changed, 0);
}

#[test]
fn buttons_are_injected_once_per_site() {
    let mut tree = course();
    let first = inject_buttons(&mut tree).unwrap();
    assert_eq!(first, 2);
    let second = inject_buttons(&mut tree).unwrap();
    assert_eq!(second, 0);
    // One per block, none for the container article.
    let article_children = tree.children(&id("a-05")).to_vec();
    assert_eq!(article_children, vec![id("b-05"), id("b-10")]);
    assert_eq!(tree.children(&id("b-05")).last(), Some(&id("continue-0")));
    assert_eq!(tree.children(&id("b-10")).last(), Some(&id("continue-1")));
}

#[test]
fn availability_changes_re_anchor_the_group() {
    let mut tree = course();
    apply_locks(&mut tree, None).unwrap();
    // Removing the first block from the flow leaves the second as the
    // group's entry point.
    tree.set_available(&id("b-05"), false).unwrap();
    apply_locks(&mut tree, None).unwrap();
    assert!(!is_locked(&tree, "b-10"));
}
