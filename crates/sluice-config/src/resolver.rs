//! Effective-configuration resolution.
//!
//! A node's gating configuration is derived by walking its inheritance
//! chain: a block may defer to its article, an article stands alone, and
//! every other kind is ungated. The chain is layered distant-first with the
//! schema defaults seeded under the most specific member, so a defaulted
//! key on the child wins over an ancestor's override while non-defaulted
//! keys still inherit.

use crate::defaults::defaults_for;
use crate::error::ConfigError;
use crate::types::{GatingConfig, RawGatingConfig};
use sluice_content::{ContentTree, NodeId, NodeKind, DEFAULT_COMPLETION_ATTRIBUTE};

fn raw_config(tree: &ContentTree, id: &NodeId) -> Option<RawGatingConfig> {
    tree.get(id)?
        .gating
        .as_ref()
        .and_then(RawGatingConfig::from_value)
}

/// True for an article whose configuration governs its children rather than
/// itself (`onChildren` absent or true). Such articles are not sites; their
/// blocks inherit instead.
pub fn is_article_managing_children(tree: &ContentTree, id: &NodeId) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    node.kind == NodeKind::Article
        && raw_config(tree, id).and_then(|raw| raw.on_children) != Some(false)
}

/// True for a block whose article is enabled with `onChildren: false`: the
/// article intentionally manages itself, not this block.
pub fn is_block_managed_by_article(tree: &ContentTree, id: &NodeId) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    if node.kind != NodeKind::Block {
        return false;
    }
    let Some(parent) = tree.parent(id) else {
        return false;
    };
    let Some(parent_raw) = raw_config(tree, parent) else {
        return false;
    };
    parent_raw.is_enabled == Some(true) && parent_raw.on_children == Some(false)
}

/// The ordered list of nodes a configuration may be derived from, most
/// specific first, or `None` where no derivation applies.
///
/// Members without a configuration, and members explicitly marked
/// `isInherited`, are dropped from the chain.
pub fn inheritance_chain(
    tree: &ContentTree,
    id: &NodeId,
) -> Result<Option<Vec<NodeId>>, ConfigError> {
    if !tree.is_ready() {
        return Err(ConfigError::TreeNotReady);
    }
    let Some(node) = tree.get(id) else {
        return Ok(None);
    };
    match node.kind {
        NodeKind::Block => {
            let Some(parent) = tree.parent(id).cloned() else {
                return Ok(None);
            };
            let parent_raw = raw_config(tree, &parent);
            let block_raw = raw_config(tree, id);
            let parent_enabled_not_on_children = parent_raw
                .as_ref()
                .map(|raw| raw.is_enabled == Some(true) && raw.on_children == Some(false))
                .unwrap_or(false);
            let no_own_config = block_raw
                .as_ref()
                .map(|raw| raw.is_enabled != Some(true))
                .unwrap_or(true);
            if parent_enabled_not_on_children && no_own_config {
                return Ok(None);
            }
            let chain = [id.clone(), parent]
                .into_iter()
                .filter(|member| {
                    raw_config(tree, member)
                        .map(|raw| raw.is_inherited != Some(true))
                        .unwrap_or(false)
                })
                .collect();
            Ok(Some(chain))
        }
        NodeKind::Article => Ok(Some(vec![id.clone()])),
        _ => Ok(None),
    }
}

/// Derive the effective gating configuration for `id`, or `None` when the
/// node is ungated: no chain, a container-mode article, a block managed by
/// its article, or a derived configuration that is not enabled.
pub fn resolve(tree: &ContentTree, id: &NodeId) -> Result<Option<GatingConfig>, ConfigError> {
    let Some(chain) = inheritance_chain(tree, id)? else {
        return Ok(None);
    };
    if chain.is_empty()
        || is_article_managing_children(tree, id)
        || is_block_managed_by_article(tree, id)
    {
        return Ok(None);
    }
    let mut merged: Option<RawGatingConfig> = None;
    let last = chain.len() - 1;
    for (index, member) in chain.iter().rev().enumerate() {
        let mut layer = raw_config(tree, member).unwrap_or_default();
        if index == last {
            let kind = tree
                .get(member)
                .map(|node| node.kind)
                .unwrap_or(NodeKind::Block);
            layer = defaults_for(kind).overlaid(&layer);
        }
        merged = Some(match merged {
            None => layer,
            Some(acc) => acc.overlaid(&layer),
        });
    }
    let resolved = merged.expect("chain is non-empty").into_resolved();
    if !resolved.is_enabled {
        return Ok(None);
    }
    Ok(Some(resolved))
}

/// The node that anchors `id`'s gating group: the first article in the
/// chain whose defaulted configuration has `onChildren: true`, else the
/// first chain member. Blocks are never containers, whatever their
/// authored `onChildren`.
pub fn container_of(tree: &ContentTree, id: &NodeId) -> Result<Option<NodeId>, ConfigError> {
    let Some(chain) = inheritance_chain(tree, id)? else {
        return Ok(None);
    };
    for member in &chain {
        let Some(node) = tree.get(member) else {
            continue;
        };
        if node.kind != NodeKind::Article {
            continue;
        }
        let merged = defaults_for(node.kind)
            .overlaid(&raw_config(tree, member).unwrap_or_default())
            .into_resolved();
        if merged.on_children {
            return Ok(Some(member.clone()));
        }
    }
    Ok(chain.first().cloned())
}

/// The completion attribute gating `id`: its own configuration's choice,
/// else the course-level configuration's, else the default.
pub fn completion_attribute(tree: &ContentTree, id: &NodeId) -> Result<String, ConfigError> {
    if let Some(config) = resolve(tree, id)? {
        if let Some(attribute) = config.completion_attribute {
            return Ok(attribute);
        }
    }
    Ok(fallback_completion_attribute(tree))
}

/// The course-level completion attribute, else the default. Used by callers
/// that already hold a resolved configuration.
pub fn fallback_completion_attribute(tree: &ContentTree) -> String {
    if let Some(root) = tree.root() {
        if let Some(raw) = raw_config(tree, root) {
            if let Some(attribute) = raw.completion_attribute {
                return attribute;
            }
        }
    }
    DEFAULT_COMPLETION_ATTRIBUTE.to_string()
}
