//! Shared helpers for building content trees from a flat row list.
//!
//! Hierarchy is inferred from list order: each row becomes a child of the
//! most recent row one level up, so realistic course fixtures read as a
//! flat outline.

// Each test target uses its own subset of these helpers.
#![allow(dead_code)]

use serde_json::Value;
use sluice_content::{ContentNode, ContentTree, NodeId, NodeKind};

/// One content row: kind, id, optional authored gating configuration.
pub struct Row {
    pub kind: NodeKind,
    pub id: &'static str,
    pub gating: Option<Value>,
}

pub fn row(kind: NodeKind, id: &'static str) -> Row {
    Row {
        kind,
        id,
        gating: None,
    }
}

pub fn gated(kind: NodeKind, id: &'static str, gating: Value) -> Row {
    Row {
        kind,
        id,
        gating: Some(gating),
    }
}

/// Build a ready tree from rows. The first row must be the course.
pub fn build_tree(rows: Vec<Row>) -> ContentTree {
    let mut tree = ContentTree::new();
    // Last-seen node per hierarchy level.
    let mut last_at_level: [Option<NodeId>; 5] = Default::default();
    for row in rows {
        let mut node = ContentNode::new(row.id, row.kind);
        node.gating = row.gating;
        let level = row.kind.level() as usize;
        if level > 0 {
            node.parent = last_at_level[level - 1].clone();
        }
        last_at_level[level] = Some(node.id.clone());
        tree.insert(node).expect("well-formed fixture rows");
    }
    tree.mark_ready();
    tree
}

pub fn id(raw: &str) -> NodeId {
    NodeId::new(raw)
}

pub fn is_locked(tree: &ContentTree, raw: &str) -> bool {
    tree.get(&id(raw)).expect("node exists").is_locked
}

pub fn complete(tree: &mut ContentTree, raw: &str) {
    tree.set_completion(&id(raw), sluice_content::DEFAULT_COMPLETION_ATTRIBUTE, true)
        .expect("node exists");
}
