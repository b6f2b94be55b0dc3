//! Continue-button synthesis and presentation state.
//!
//! Every gating site gets exactly one synthetic button node, appended as
//! its last child. The button's completion attribute is the "user
//! acknowledged this step" signal; its visible/enabled state follows the
//! site configuration's style table.

use crate::error::EngineError;
use sluice_config::{resolver, ButtonStyle};
use sluice_content::{
    ButtonState, ContentNode, ContentTree, NodeId, NodeKind, DEFAULT_COMPLETION_ATTRIBUTE,
    INTERACTION_COMPLETE,
};

/// Component name carried by synthesized continue-button nodes.
pub const CONTINUE_BUTTON_COMPONENT: &str = "continue-button";

/// True when `id` names a synthesized continue button.
pub fn is_continue_button(tree: &ContentTree, id: &NodeId) -> bool {
    tree.get(id)
        .map(|node| node.component.as_deref() == Some(CONTINUE_BUTTON_COMPONENT))
        .unwrap_or(false)
}

/// Complete a button (both completion attributes).
pub fn set_button_completion(tree: &mut ContentTree, id: &NodeId) -> Result<(), EngineError> {
    tree.set_completion(id, DEFAULT_COMPLETION_ATTRIBUTE, true)?;
    tree.set_completion(id, INTERACTION_COMPLETE, true)?;
    Ok(())
}

/// Synthesize one continue button per gating site.
///
/// Runs over the whole tree in document order; sites already marked
/// configured are skipped, so a second call injects nothing. Sites whose
/// configuration is wholly inherited get a `config_source` back-reference
/// to the owning chain member; a button whose site is already complete
/// starts complete. Returns the number of buttons created.
pub fn inject_buttons(tree: &mut ContentTree) -> Result<usize, EngineError> {
    let Some(root) = tree.root().cloned() else {
        return Ok(0);
    };
    let mut uid = tree
        .descendants(&root, true)
        .iter()
        .filter(|id| is_continue_button(tree, id))
        .count();
    let mut injected = 0;
    for site in tree.descendants(&root, true) {
        if resolver::resolve(tree, &site)?.is_none() {
            continue;
        }
        let configured = tree
            .get(&site)
            .map(|node| node.is_site_configured)
            .unwrap_or(true);
        if configured {
            continue;
        }
        tree.set_site_configured(&site, true)?;
        if let Some(chain) = resolver::inheritance_chain(tree, &site)? {
            if chain.first() != Some(&site) {
                tree.set_config_source(&site, chain.first().cloned())?;
            }
        }
        let button_id = NodeId::new(format!("continue-{uid}"));
        uid += 1;
        let mut button = ContentNode::new(button_id.clone(), NodeKind::Component)
            .with_component(CONTINUE_BUTTON_COMPONENT)
            .with_gating(serde_json::json!({ "isEnabled": true }));
        button.config_source = Some(site.clone());
        tree.insert_child(&site, button)?;
        let attribute = resolver::completion_attribute(tree, &site)?;
        let site_complete = tree
            .get(&site)
            .map(|node| node.is_complete(&attribute))
            .unwrap_or(false);
        if site_complete {
            set_button_completion(tree, &button_id)?;
        }
        injected += 1;
    }
    Ok(injected)
}

fn site_of(tree: &ContentTree, button: &NodeId) -> Option<NodeId> {
    tree.parent(button).cloned()
}

/// True when the button is enabled by its site's configuration.
pub fn is_button_enabled(tree: &ContentTree, button: &NodeId) -> Result<bool, EngineError> {
    let Some(site) = site_of(tree, button) else {
        return Ok(false);
    };
    let Some(config) = resolver::resolve(tree, &site)? else {
        return Ok(false);
    };
    Ok(config.is_enabled && config.button.is_enabled)
}

/// True when step locking applies at the button's site.
pub fn is_step_locking(tree: &ContentTree, button: &NodeId) -> Result<bool, EngineError> {
    let Some(site) = site_of(tree, button) else {
        return Ok(false);
    };
    let Some(config) = resolver::resolve(tree, &site)? else {
        return Ok(false);
    };
    Ok(config.step_locking.is_enabled)
}

/// True when completion of the site is required to unlock the step.
pub fn is_completion_required(tree: &ContentTree, button: &NodeId) -> Result<bool, EngineError> {
    let Some(site) = site_of(tree, button) else {
        return Ok(false);
    };
    let Some(config) = resolver::resolve(tree, &site)? else {
        return Ok(false);
    };
    Ok(config.step_locking.is_enabled && config.step_locking.is_completion_required)
}

/// True when every available sibling of the button is complete, optional or
/// unavailable. False while the site's completion is blocked by another
/// extension.
pub fn is_step_unlocked(tree: &ContentTree, button: &NodeId) -> Result<bool, EngineError> {
    let Some(site) = site_of(tree, button) else {
        return Ok(false);
    };
    let Some(site_node) = tree.get(&site) else {
        return Ok(false);
    };
    if site_node.is_completion_blocked {
        return Ok(false);
    }
    let attribute = resolver::completion_attribute(tree, &site)?;
    for sibling in tree.children(&site) {
        if sibling == button {
            continue;
        }
        let Some(node) = tree.get(sibling) else {
            continue;
        };
        if node.is_complete(&attribute) || node.is_optional || !node.is_available {
            continue;
        }
        return Ok(false);
    }
    Ok(true)
}

/// True when the site itself is already complete.
pub fn is_step_complete(tree: &ContentTree, button: &NodeId) -> Result<bool, EngineError> {
    let Some(site) = site_of(tree, button) else {
        return Ok(false);
    };
    let attribute = resolver::completion_attribute(tree, &site)?;
    Ok(tree
        .get(&site)
        .map(|node| node.is_complete(&attribute))
        .unwrap_or(false))
}

/// True when the button must relock on unit re-entry.
pub fn is_locked_on_revisit(tree: &ContentTree, button: &NodeId) -> Result<bool, EngineError> {
    let Some(site) = site_of(tree, button) else {
        return Ok(false);
    };
    let Some(config) = resolver::resolve(tree, &site)? else {
        return Ok(false);
    };
    Ok(config.step_locking.is_locked_on_revisit)
}

/// True once the step is satisfied and the button clicked.
pub fn is_finished(tree: &ContentTree, button: &NodeId) -> Result<bool, EngineError> {
    let step_unlocked = is_step_unlocked(tree, button)?;
    let completion_required = is_completion_required(tree, button)?;
    let clicked = tree
        .get(button)
        .map(|node| node.is_complete(DEFAULT_COMPLETION_ATTRIBUTE))
        .unwrap_or(false);
    Ok((step_unlocked || !completion_required) && clicked)
}

/// True when the button is the last node of its unit (and the gating
/// container is not still awaiting completion).
pub fn is_last_in_unit(tree: &ContentTree, button: &NodeId) -> Result<bool, EngineError> {
    let Some(unit) = tree.unit_of(button) else {
        return Ok(false);
    };
    let descendants = tree.descendants(&unit, true);
    let Some(last) = descendants.last() else {
        return Ok(false);
    };
    let Some(site) = site_of(tree, button) else {
        return Ok(false);
    };
    let container = resolver::container_of(tree, &site)?.unwrap_or(site);
    let container_blocked = tree
        .get(&container)
        .map(|node| node.is_completion_blocked)
        .unwrap_or(false);
    Ok(!container_blocked && last == button)
}

fn pick_text(candidate: Option<&String>, fallback: &str) -> String {
    match candidate {
        Some(text) if !text.is_empty() => text.clone(),
        _ => fallback.to_string(),
    }
}

/// Compute the button's visible/enabled state and label.
///
/// `is_killed` reflects the unit session: a killed unit presents every step
/// as unlocked and finished. The forced flags let the renderer suppress the
/// button while it is animating or off-screen.
pub fn compute_button_state(
    tree: &ContentTree,
    button: &NodeId,
    is_killed: bool,
    disable_forced: bool,
    hide_forced: bool,
) -> Result<Option<ButtonState>, EngineError> {
    let Some(site) = site_of(tree, button) else {
        return Ok(None);
    };
    let Some(config) = resolver::resolve(tree, &site)? else {
        return Ok(None);
    };

    if !(config.is_enabled && config.button.is_enabled) {
        let step_unlocked = is_step_unlocked(tree, button)?;
        return Ok(Some(ButtonState {
            is_visible: false,
            is_disabled: !step_unlocked,
            text: config.button.text.clone(),
        }));
    }

    if is_last_in_unit(tree, button)? && !config.button.show_end_of_unit {
        return Ok(Some(ButtonState {
            is_visible: false,
            is_disabled: true,
            text: config.button.text.clone(),
        }));
    }

    let step_unlocked = is_step_unlocked(tree, button)? || is_killed;
    let finished = is_finished(tree, button)? || is_killed;
    let completion_required = is_completion_required(tree, button)?;

    let visible_before = config.button.style_before_completion != ButtonStyle::Hidden;
    // Full-width buttons are never visible after completion: absolutely
    // positioned buttons would stack.
    let visible_after =
        config.button.style_after_click != ButtonStyle::Hidden && !config.button.is_full_width;

    let is_visible = (!completion_required && !finished && visible_before)
        || (!completion_required && step_unlocked && !finished)
        || (!completion_required && finished && visible_after)
        || (completion_required && !step_unlocked && visible_before && !hide_forced)
        || (completion_required && finished && visible_after)
        || (completion_required && step_unlocked && !finished);

    let enabled_before = config.button.style_before_completion != ButtonStyle::Disabled;
    let enabled_after = config.button.style_after_click != ButtonStyle::Disabled;
    let unlocked_unclicked = completion_required && step_unlocked && !finished;

    let is_enabled = (!completion_required && !finished && enabled_before)
        || (!completion_required && step_unlocked && !finished)
        || (!completion_required && finished && enabled_after)
        || (unlocked_unclicked && !disable_forced)
        || (completion_required && finished && enabled_after);

    let is_disabled = !is_enabled;

    // Start/final labels apply to container-mode groups, derived from the
    // site's position among the container's available sites: group
    // membership can change at runtime (e.g. randomized assessments).
    let mut is_start = false;
    let mut is_final = false;
    if config.on_children {
        if let Some(container) = resolver::container_of(tree, &site)? {
            let mut group: Vec<NodeId> = Vec::new();
            for id in tree.descendants(&container, true) {
                let available = tree.get(&id).map(|node| node.is_available).unwrap_or(false);
                if available && resolver::resolve(tree, &id)?.is_some() {
                    group.push(id);
                }
            }
            if let Some(index) = group.iter().position(|id| id == &site) {
                let container_open = tree
                    .get(&container)
                    .map(|node| node.can_request_child)
                    .unwrap_or(false);
                is_start = index == 0;
                is_final = index + 1 == group.len() && !container_open;
            }
        }
    }

    let text = if is_disabled && config.button.disabled_text.is_some() {
        pick_text(config.button.disabled_text.as_ref(), &config.button.text)
    } else if is_start && config.button.start_text.is_some() {
        pick_text(config.button.start_text.as_ref(), &config.button.text)
    } else if is_final && config.button.final_text.is_some() {
        pick_text(config.button.final_text.as_ref(), &config.button.text)
    } else {
        config.button.text.clone()
    };

    Ok(Some(ButtonState {
        is_visible,
        is_disabled,
        text,
    }))
}

/// Recompute and diff-write the state of every button in the tree.
/// `killed_unit` marks the one unit currently killed, if any.
pub fn refresh_button_states(
    tree: &mut ContentTree,
    killed_unit: Option<&NodeId>,
) -> Result<(), EngineError> {
    let Some(root) = tree.root().cloned() else {
        return Ok(());
    };
    let buttons: Vec<NodeId> = tree
        .descendants(&root, true)
        .into_iter()
        .filter(|id| is_continue_button(tree, id))
        .collect();
    for button in buttons {
        let is_killed = match killed_unit {
            Some(unit) => tree.unit_of(&button).as_ref() == Some(unit),
            None => false,
        };
        let state = compute_button_state(tree, &button, is_killed, false, false)?;
        let current = tree.get(&button).and_then(|node| node.button_state.clone());
        if current != state {
            tree.set_button_state(&button, state)?;
        }
    }
    Ok(())
}

/// Reset a button on unit re-entry when its step should relock.
///
/// A finished button stays finished unless the site is configured
/// `isLockedOnRevisit`; anything else with completion set is cleared so the
/// learner acknowledges the step again. Returns whether anything changed
/// (the caller re-runs the lock pass if so).
pub fn check_reset_on_revisit(tree: &mut ContentTree, button: &NodeId) -> Result<bool, EngineError> {
    if is_finished(tree, button)? && !is_locked_on_revisit(tree, button)? {
        return Ok(false);
    }
    let Some(node) = tree.get(button) else {
        return Ok(false);
    };
    if !node.is_complete(DEFAULT_COMPLETION_ATTRIBUTE) && !node.is_complete(INTERACTION_COMPLETE) {
        return Ok(false);
    }
    tree.set_completion(button, DEFAULT_COMPLETION_ATTRIBUTE, false)?;
    tree.set_completion(button, INTERACTION_COMPLETE, false)?;
    Ok(true)
}
