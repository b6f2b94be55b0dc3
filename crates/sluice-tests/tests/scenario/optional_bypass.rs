//! Scenario: optional content never blocks succession, and is itself never
//! a reason to stay locked.

use crate::support::{build_tree, complete, gated, id, is_locked, row};
use serde_json::json;
use sluice_content::NodeKind;
use sluice_engine::apply_locks;

fn course() -> sluice_content::ContentTree {
    build_tree(vec![
        row(NodeKind::Course, "m05"),
        row(NodeKind::Page, "co-05"),
        gated(NodeKind::Article, "a-05", json!({ "isEnabled": true })),
        row(NodeKind::Block, "b-05"),
        row(NodeKind::Block, "b-10"),
        row(NodeKind::Block, "b-15"),
    ])
}

#[test]
fn an_optional_incomplete_site_does_not_block_its_successors() {
    let mut tree = course();
    tree.set_optional(&id("b-05"), true).unwrap();
    apply_locks(&mut tree, None).unwrap();
    assert!(!is_locked(&tree, "b-10"));
    // The second block still gates the third.
    assert!(is_locked(&tree, "b-15"));
}

#[test]
fn an_optional_follower_is_never_locked() {
    let mut tree = course();
    tree.set_optional(&id("b-10"), true).unwrap();
    apply_locks(&mut tree, None).unwrap();
    // b-05 is incomplete: its succession is locked, but the optional b-10
    // stays reachable; only the required b-15 is barred.
    assert!(!is_locked(&tree, "b-10"));
    assert!(is_locked(&tree, "b-15"));
    complete(&mut tree, "b-05");
    apply_locks(&mut tree, None).unwrap();
    // b-10 incomplete but optional: it does not lock b-15 either.
    assert!(!is_locked(&tree, "b-15"));
}
