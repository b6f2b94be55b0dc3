//! Scenario: a container article (`onChildren`) governs its children's
//! succession rather than itself. The article is not a site; its first
//! block is the group's anchor.

use crate::support::{build_tree, gated, id, is_locked, row};
use serde_json::json;
use sluice_config::{container_of, resolve};
use sluice_content::NodeKind;
use sluice_engine::{apply_locks, inject_buttons, is_continue_button};

fn course() -> sluice_content::ContentTree {
    build_tree(vec![
        row(NodeKind::Course, "m05"),
        row(NodeKind::Page, "co-05"),
        gated(NodeKind::Article, "a-05", json!({ "isEnabled": true, "onChildren": true })),
        row(NodeKind::Block, "b-05"),
        row(NodeKind::Block, "b-10"),
    ])
}

#[test]
fn the_container_article_is_not_a_site() {
    let tree = course();
    assert!(resolve(&tree, &id("a-05")).unwrap().is_none());
    // Its blocks inherit the configuration instead.
    let block = resolve(&tree, &id("b-05")).unwrap().unwrap();
    assert!(block.is_enabled);
    assert!(block.on_children);
    assert_eq!(container_of(&tree, &id("b-05")).unwrap(), Some(id("a-05")));
}

#[test]
fn the_first_child_is_the_propagation_anchor() {
    let mut tree = course();
    apply_locks(&mut tree, None).unwrap();
    assert!(!is_locked(&tree, "a-05"));
    assert!(!is_locked(&tree, "b-05"));
    assert!(is_locked(&tree, "b-10"));
}

#[test]
fn buttons_go_to_the_children_not_the_container() {
    let mut tree = course();
    inject_buttons(&mut tree).unwrap();
    assert!(!tree
        .children(&id("a-05"))
        .iter()
        .any(|child| is_continue_button(&tree, child)));
    assert!(tree
        .children(&id("b-05"))
        .iter()
        .any(|child| is_continue_button(&tree, child)));
    assert!(tree
        .children(&id("b-10"))
        .iter()
        .any(|child| is_continue_button(&tree, child)));
}

#[test]
fn inherited_blocks_reference_their_configuration_source() {
    let mut tree = course();
    inject_buttons(&mut tree).unwrap();
    assert_eq!(tree.get(&id("b-05")).unwrap().config_source, Some(id("a-05")));
    assert_eq!(tree.get(&id("b-10")).unwrap().config_source, Some(id("a-05")));
}

#[test]
fn a_child_override_beats_a_disabled_container() {
    let tree = build_tree(vec![
        row(NodeKind::Course, "m05"),
        row(NodeKind::Page, "co-05"),
        gated(
            NodeKind::Article,
            "a-05",
            json!({ "isEnabled": false, "button": { "isEnabled": false } }),
        ),
        gated(NodeKind::Block, "b-05", json!({ "isEnabled": true })),
    ]);
    let config = resolve(&tree, &id("b-05")).unwrap().unwrap();
    assert!(config.is_enabled);
    assert!(config.button.is_enabled);
}
