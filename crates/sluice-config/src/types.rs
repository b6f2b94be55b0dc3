//! Typed gating configuration records.
//!
//! `Raw*` records mirror what authors write: every field optional, unknown
//! keys carried through untouched. The resolved [`GatingConfig`] is the
//! fully-defaulted record the engine reads.

use crate::merge::extend_extra;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Presentation style of a continue button before completion or after the
/// click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Visible,
    Hidden,
    Disabled,
    Scroll,
}

/// Authored per-node gating configuration. All fields optional; unknown
/// keys are preserved for forward compatibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawGatingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_inherited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scroll: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_children: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<RawButtonConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_locking: Option<RawStepLockingConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Authored continue-button configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawButtonConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_full_width: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_hide: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_before_completion: Option<ButtonStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_after_click: Option<ButtonStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_end_of_unit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled_text: Option<String>,
}

/// Authored step-locking policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawStepLockingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completion_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked_on_revisit: Option<bool>,
}

impl RawGatingConfig {
    /// Parse an authored configuration value. Malformed records are treated
    /// as absent (feature disabled for that node), with a diagnostic.
    pub fn from_value(value: &Value) -> Option<Self> {
        match serde_json::from_value(value.clone()) {
            Ok(config) => Some(config),
            Err(error) => {
                tracing::warn!(%error, "ignoring malformed gating configuration");
                None
            }
        }
    }

    /// Overlay `over` onto `self`: `over`'s authored values win, nested
    /// records merge field-by-field, unknown keys merge recursively.
    pub fn overlaid(mut self, over: &Self) -> Self {
        self.is_enabled = over.is_enabled.or(self.is_enabled);
        self.is_inherited = over.is_inherited.or(self.is_inherited);
        self.auto_scroll = over.auto_scroll.or(self.auto_scroll);
        self.scroll_target = over.scroll_target.clone().or(self.scroll_target);
        self.scroll_duration_ms = over.scroll_duration_ms.or(self.scroll_duration_ms);
        self.on_children = over.on_children.or(self.on_children);
        self.completion_attribute = over
            .completion_attribute
            .clone()
            .or(self.completion_attribute);
        self.button = match (self.button, &over.button) {
            (Some(base), Some(over)) => Some(base.overlaid(over)),
            (base, over) => over.clone().or(base),
        };
        self.step_locking = match (self.step_locking, &over.step_locking) {
            (Some(base), Some(over)) => Some(base.overlaid(over)),
            (base, over) => over.clone().or(base),
        };
        extend_extra(&mut self.extra, &over.extra);
        self
    }

    /// Finalize into the resolved record. Any field still unset falls back
    /// to its schema default. A full-width button forces step locking on,
    /// regardless of the authored value: a full-width button cannot be
    /// bypassed.
    pub fn into_resolved(self) -> GatingConfig {
        let button = self.button.unwrap_or_default();
        let step_locking = self.step_locking.unwrap_or_default();
        let button = ButtonConfig {
            is_enabled: button.is_enabled.unwrap_or(true),
            is_full_width: button.is_full_width.unwrap_or(true),
            auto_hide: button.auto_hide.unwrap_or(false),
            style_before_completion: button.style_before_completion.unwrap_or(ButtonStyle::Hidden),
            style_after_click: button.style_after_click.unwrap_or(ButtonStyle::Hidden),
            show_end_of_unit: button.show_end_of_unit.unwrap_or(true),
            text: button.text.unwrap_or_else(|| "Continue".to_string()),
            start_text: button.start_text,
            final_text: button.final_text,
            disabled_text: button.disabled_text,
        };
        let mut step_locking = StepLockingConfig {
            is_enabled: step_locking.is_enabled.unwrap_or(true),
            is_completion_required: step_locking.is_completion_required.unwrap_or(true),
            is_locked_on_revisit: step_locking.is_locked_on_revisit.unwrap_or(false),
        };
        if button.is_full_width {
            step_locking.is_enabled = true;
        }
        GatingConfig {
            is_enabled: self.is_enabled.unwrap_or(false),
            is_inherited: self.is_inherited.unwrap_or(false),
            auto_scroll: self.auto_scroll.unwrap_or(true),
            scroll_target: self.scroll_target.unwrap_or_else(|| "@block +1".to_string()),
            scroll_duration_ms: self.scroll_duration_ms,
            on_children: self.on_children.unwrap_or(false),
            completion_attribute: self.completion_attribute,
            button,
            step_locking,
            extra: self.extra,
        }
    }
}

impl RawButtonConfig {
    fn overlaid(mut self, over: &Self) -> Self {
        self.is_enabled = over.is_enabled.or(self.is_enabled);
        self.is_full_width = over.is_full_width.or(self.is_full_width);
        self.auto_hide = over.auto_hide.or(self.auto_hide);
        self.style_before_completion = over.style_before_completion.or(self.style_before_completion);
        self.style_after_click = over.style_after_click.or(self.style_after_click);
        self.show_end_of_unit = over.show_end_of_unit.or(self.show_end_of_unit);
        self.text = over.text.clone().or(self.text);
        self.start_text = over.start_text.clone().or(self.start_text);
        self.final_text = over.final_text.clone().or(self.final_text);
        self.disabled_text = over.disabled_text.clone().or(self.disabled_text);
        self
    }
}

impl RawStepLockingConfig {
    fn overlaid(mut self, over: &Self) -> Self {
        self.is_enabled = over.is_enabled.or(self.is_enabled);
        self.is_completion_required = over.is_completion_required.or(self.is_completion_required);
        self.is_locked_on_revisit = over.is_locked_on_revisit.or(self.is_locked_on_revisit);
        self
    }
}

/// Effective gating configuration for a node, derived per resolution call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatingConfig {
    pub is_enabled: bool,
    pub is_inherited: bool,
    pub auto_scroll: bool,
    pub scroll_target: String,
    /// No schema default so that an ancestor's explicit value survives
    /// inheritance; the scroll site falls back to 500 ms.
    pub scroll_duration_ms: Option<u64>,
    pub on_children: bool,
    pub completion_attribute: Option<String>,
    pub button: ButtonConfig,
    pub step_locking: StepLockingConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Effective continue-button configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonConfig {
    pub is_enabled: bool,
    pub is_full_width: bool,
    pub auto_hide: bool,
    pub style_before_completion: ButtonStyle,
    pub style_after_click: ButtonStyle,
    pub show_end_of_unit: bool,
    pub text: String,
    pub start_text: Option<String>,
    pub final_text: Option<String>,
    pub disabled_text: Option<String>,
}

/// Effective step-locking policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepLockingConfig {
    pub is_enabled: bool,
    pub is_completion_required: bool,
    pub is_locked_on_revisit: bool,
}
