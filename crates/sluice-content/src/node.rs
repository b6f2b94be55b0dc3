//! Node attribute records.

use crate::ids::NodeId;
use crate::kinds::NodeKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The completion attribute consulted when no configuration names one.
pub const DEFAULT_COMPLETION_ATTRIBUTE: &str = "isComplete";

/// Secondary completion attribute, tracked alongside the default so either
/// may be configured as the gating signal.
pub const INTERACTION_COMPLETE: &str = "isInteractionComplete";

/// Computed presentation state of a continue button, diff-written onto the
/// button node so the external renderer observes changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonState {
    pub is_visible: bool,
    pub is_disabled: bool,
    pub text: String,
}

/// A single node of the content tree.
///
/// Identity, kind and parentage are fixed at insertion; everything else is
/// a mutable attribute. `is_locked` is owned by the lock pass, `is_gated`
/// marks nodes currently under this engine's management, and `gating` holds
/// the authored configuration verbatim (interpreted by the config layer,
/// unknown keys preserved).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: NodeId,
    pub kind: NodeKind,

    /// Assigned by the tree at insertion.
    pub parent: Option<NodeId>,

    /// Ordered child ids, managed by the tree.
    pub children: Vec<NodeId>,

    /// Registered component name for leaf items.
    pub component: Option<String>,

    pub is_available: bool,
    pub is_optional: bool,

    /// Owned by the lock pass; hosts must not write it.
    pub is_locked: bool,

    /// True while this node's locking is managed by the gating engine.
    pub is_gated: bool,

    /// Back-reference to the node whose configuration governs this one,
    /// set when the configuration is wholly inherited.
    pub config_source: Option<NodeId>,

    /// Set by other locking subsystems; when present the lock pass leaves
    /// this node's children alone.
    pub lock_type: Option<String>,

    /// The node may still add children dynamically (e.g. an assessment
    /// requesting more questions).
    pub can_request_child: bool,

    /// Completion is being suppressed by another extension.
    pub is_completion_blocked: bool,

    /// Injection guard: a continue button has already been synthesized for
    /// this site.
    pub is_site_configured: bool,

    /// Named completion attributes.
    pub completion: BTreeMap<String, bool>,

    /// Authored gating configuration, uninterpreted.
    pub gating: Option<Value>,

    /// Presentation state for continue-button nodes.
    pub button_state: Option<ButtonState>,
}

impl ContentNode {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        let mut completion = BTreeMap::new();
        completion.insert(DEFAULT_COMPLETION_ATTRIBUTE.to_string(), false);
        completion.insert(INTERACTION_COMPLETE.to_string(), false);
        Self {
            id: id.into(),
            kind,
            parent: None,
            children: Vec::new(),
            component: None,
            is_available: true,
            is_optional: false,
            is_locked: false,
            is_gated: false,
            config_source: None,
            lock_type: None,
            can_request_child: false,
            is_completion_blocked: false,
            is_site_configured: false,
            completion,
            gating: None,
            button_state: None,
        }
    }

    pub fn with_gating(mut self, gating: Value) -> Self {
        self.gating = Some(gating);
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_available(mut self, is_available: bool) -> Self {
        self.is_available = is_available;
        self
    }

    pub fn with_optional(mut self, is_optional: bool) -> Self {
        self.is_optional = is_optional;
        self
    }

    pub fn with_complete(mut self, attribute: &str) -> Self {
        self.completion.insert(attribute.to_string(), true);
        self
    }

    /// Read a named completion attribute; absent attributes read false.
    pub fn is_complete(&self, attribute: &str) -> bool {
        self.completion.get(attribute).copied().unwrap_or(false)
    }
}
