//! Succession traversal: which nodes come "after" a site.

use sluice_content::{ContentTree, NodeId};

/// All nodes directly subsequent to `from` in document order, restricted to
/// the chain of container boundaries up to the nearest unit.
///
/// The list is the available siblings after `from` (including `from` itself
/// when `include_self` is set), followed by each in-unit ancestor's
/// available later siblings, deepest first. The walk stops at — and
/// includes — the nearest page; succession never crosses into the next
/// unit. A parentless node has no succession.
pub fn subsequent_across_ancestors(
    tree: &ContentTree,
    from: &NodeId,
    include_self: bool,
) -> Vec<NodeId> {
    let Some(parent) = tree.parent(from).cloned() else {
        return Vec::new();
    };
    let siblings = tree.available_children(&parent);
    let start = match siblings.iter().position(|id| id == from) {
        Some(index) if include_self => index,
        Some(index) => index + 1,
        None => 0,
    };
    let mut out: Vec<NodeId> = siblings[start..].to_vec();

    // Ancestors between `from` and the unit boundary, nearest first.
    let ancestors = tree.ancestors(from, false);
    let unit_index = ancestors.iter().position(|ancestor| {
        tree.get(ancestor)
            .map(|node| node.kind.is_unit())
            .unwrap_or(false)
    });
    let Some(unit_index) = unit_index else {
        return out;
    };
    let in_unit = &ancestors[..=unit_index];
    for pair in in_unit.windows(2) {
        let (parent, grandparent) = (&pair[0], &pair[1]);
        let cousins = tree.available_children(grandparent);
        let after = match cousins.iter().position(|id| id == parent) {
            Some(index) => index + 1,
            None => 0,
        };
        out.extend(cousins[after..].iter().cloned());
    }
    out
}
