//! Schema defaults for gating configuration.

use crate::types::{ButtonStyle, RawButtonConfig, RawGatingConfig, RawStepLockingConfig};
use sluice_content::NodeKind;

/// The schema defaults seeded under the most specific inheritance-chain
/// member during resolution.
///
/// `onChildren` defaults to true only for articles (the legacy container
/// behaviour: gating declared on an article governs its children's
/// succession); article-mode configurations also pick up start/final label
/// defaults for the first and last button of the group.
pub fn defaults_for(kind: NodeKind) -> RawGatingConfig {
    let on_children = kind == NodeKind::Article;
    RawGatingConfig {
        is_enabled: Some(false),
        is_inherited: Some(false),
        auto_scroll: Some(true),
        scroll_target: Some("@block +1".to_string()),
        scroll_duration_ms: None,
        on_children: Some(on_children),
        completion_attribute: None,
        button: Some(RawButtonConfig {
            is_enabled: Some(true),
            is_full_width: Some(true),
            auto_hide: Some(false),
            style_before_completion: Some(ButtonStyle::Hidden),
            style_after_click: Some(ButtonStyle::Hidden),
            show_end_of_unit: None,
            text: Some("Continue".to_string()),
            start_text: on_children.then(|| "Begin".to_string()),
            final_text: on_children.then(|| "Finish".to_string()),
            disabled_text: None,
        }),
        step_locking: Some(RawStepLockingConfig {
            is_enabled: Some(true),
            is_completion_required: Some(true),
            is_locked_on_revisit: Some(false),
        }),
        extra: Default::default(),
    }
}
