//! The lock pass.
//!
//! `compute_locks` is pure: it derives the complete lock map for the
//! current tree. `apply_locks` diffs that map against the stored
//! `is_locked` attributes and writes only the deltas, so calling it twice
//! with no intervening changes produces zero additional writes — the
//! property that makes re-entrant triggering safe.

use crate::button::is_continue_button;
use crate::error::EngineError;
use crate::succession::subsequent_across_ancestors;
use sluice_config::{fallback_completion_attribute, resolver, GatingConfig};
use sluice_content::{ContentTree, NodeId};
use std::collections::BTreeMap;

/// The outcome of one pure lock computation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LockComputation {
    /// Computed lock state per participating node.
    pub locks: BTreeMap<NodeId, bool>,
    /// Computed engine-management flags per succession node.
    pub gated: BTreeMap<NodeId, bool>,
}

/// Counters reported by one applied pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LockSummary {
    /// Nodes that participated in the computation.
    pub computed: usize,
    /// Nodes whose stored `is_locked` actually changed.
    pub changed: usize,
}

/// Whether `site` currently blocks its succession.
///
/// With completion required, the site itself must be complete (or optional);
/// otherwise the site's continue button carries the acknowledgment and its
/// completion is the signal.
pub fn is_site_locked(
    tree: &ContentTree,
    site: &NodeId,
    config: &GatingConfig,
) -> Result<bool, EngineError> {
    if !config.step_locking.is_enabled {
        return Ok(false);
    }
    let attribute = config
        .completion_attribute
        .clone()
        .unwrap_or_else(|| fallback_completion_attribute(tree));
    if !config.step_locking.is_completion_required {
        let button = tree
            .available_children(site)
            .into_iter()
            .find(|child| is_continue_button(tree, child));
        let button_complete = button
            .and_then(|id| tree.get(&id).map(|node| node.is_complete(&attribute)))
            .unwrap_or(false);
        return Ok(!button_complete);
    }
    let Some(node) = tree.get(site) else {
        return Ok(false);
    };
    Ok(!node.is_complete(&attribute) && !node.is_optional)
}

/// Compute the full lock map for the tree.
///
/// Sites are visited in document order so a later site reads locks already
/// accumulated by earlier ones; locks only ever accumulate within a pass.
/// The first node of a site's own group is never force-locked, and every
/// descendant of a propagated node mirrors that node's value verbatim
/// (unless another locking mechanism claimed the node via `lock_type`).
/// Nodes inside a killed unit always compute unlocked.
pub fn compute_locks(
    tree: &ContentTree,
    killed_unit: Option<&NodeId>,
) -> Result<LockComputation, EngineError> {
    let mut out = LockComputation::default();
    let Some(root) = tree.root().cloned() else {
        return Ok(out);
    };
    for site in tree.descendants(&root, true) {
        let available = tree.get(&site).map(|node| node.is_available).unwrap_or(false);
        if !available {
            continue;
        }
        let Some(config) = resolver::resolve(tree, &site)? else {
            continue;
        };
        let site_locked = is_site_locked(tree, &site, &config)?;
        let entry = *out.locks.entry(site.clone()).or_insert(false);
        if !entry {
            cascade(tree, &site, false, &mut out.locks);
        }
        for follower in subsequent_across_ancestors(tree, &site, false) {
            let is_button = is_continue_button(tree, &follower);
            out.gated.insert(follower.clone(), !is_button);
            // Optional nodes never lock: they are skippable, so an earlier
            // incomplete step must not bar access to them.
            let follower_optional = tree
                .get(&follower)
                .map(|node| node.is_optional)
                .unwrap_or(false);
            let slot = out.locks.entry(follower.clone()).or_insert(false);
            *slot = *slot || (site_locked && !follower_optional);
            let value = *slot;
            let claimed = tree
                .get(&follower)
                .map(|node| node.lock_type.is_some())
                .unwrap_or(false);
            if claimed {
                continue;
            }
            cascade(tree, &follower, value, &mut out.locks);
        }
    }
    if let Some(unit) = killed_unit {
        for (id, locked) in out.locks.iter_mut() {
            if id == unit || tree.is_descendant_of(id, unit) {
                *locked = false;
            }
        }
    }
    Ok(out)
}

fn cascade(tree: &ContentTree, from: &NodeId, value: bool, locks: &mut BTreeMap<NodeId, bool>) {
    for descendant in tree.descendants(from, false) {
        locks.insert(descendant, value);
    }
}

/// Run one pass: compute, diff, write the deltas.
///
/// A no-op before the tree is ready, and safe to call at any time after.
pub fn apply_locks(
    tree: &mut ContentTree,
    killed_unit: Option<&NodeId>,
) -> Result<LockSummary, EngineError> {
    if !tree.is_ready() {
        return Ok(LockSummary::default());
    }
    let computation = compute_locks(tree, killed_unit)?;
    let mut summary = LockSummary {
        computed: computation.locks.len(),
        changed: 0,
    };
    for (id, gated) in &computation.gated {
        let current = tree.get(id).map(|node| node.is_gated);
        if current != Some(*gated) {
            tree.set_gated(id, *gated)?;
        }
    }
    for (id, locked) in &computation.locks {
        let current = tree.get(id).map(|node| node.is_locked);
        if current == Some(*locked) {
            continue;
        }
        tree.set_locked(id, *locked)?;
        summary.changed += 1;
    }
    log_lock_state(tree);
    Ok(summary)
}

/// Pretty-print the lock state of the whole tree at DEBUG level when the
/// course configuration asks for it (`logState` on the root's gating
/// record).
fn log_lock_state(tree: &ContentTree) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    let Some(root) = tree.root() else {
        return;
    };
    let wants_log = tree
        .get(root)
        .and_then(|node| node.gating.as_ref())
        .and_then(|gating| gating.get("logState"))
        .and_then(|flag| flag.as_bool())
        .unwrap_or(false);
    if !wants_log {
        return;
    }
    tracing::debug!("gating lock state");
    for id in tree.descendants(root, true) {
        let Some(node) = tree.get(&id) else {
            continue;
        };
        if !node.is_available {
            continue;
        }
        let depth = tree.ancestors(&id, false).len();
        tracing::debug!(
            "{:indent$}{} {} isLocked: {} isGated: {}",
            "",
            node.kind,
            node.id,
            node.is_locked,
            node.is_gated,
            indent = depth
        );
    }
}
