//! Property tests: configuration resolution invariants over randomized
//! authored records.

use crate::support::id;
use proptest::prelude::*;
use serde_json::{json, Value};
use sluice_config::{resolve, RawGatingConfig};
use sluice_content::{ContentNode, ContentTree, NodeKind};

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_style() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("visible"),
        Just("hidden"),
        Just("disabled"),
        Just("scroll"),
    ]
}

/// A random authored gating record with a random subset of keys present.
fn arb_raw_config() -> impl Strategy<Value = Value> {
    (
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
        prop::option::of(arb_style()),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(
            |(enabled, on_children, full_width, button_enabled, style, locking, required)| {
                let mut config = serde_json::Map::new();
                if let Some(enabled) = enabled {
                    config.insert("isEnabled".into(), json!(enabled));
                }
                if let Some(on_children) = on_children {
                    config.insert("onChildren".into(), json!(on_children));
                }
                let mut button = serde_json::Map::new();
                if let Some(full_width) = full_width {
                    button.insert("isFullWidth".into(), json!(full_width));
                }
                if let Some(button_enabled) = button_enabled {
                    button.insert("isEnabled".into(), json!(button_enabled));
                }
                if let Some(style) = style {
                    button.insert("styleBeforeCompletion".into(), json!(style));
                }
                if !button.is_empty() {
                    config.insert("button".into(), Value::Object(button));
                }
                let mut step_locking = serde_json::Map::new();
                if let Some(locking) = locking {
                    step_locking.insert("isEnabled".into(), json!(locking));
                }
                if let Some(required) = required {
                    step_locking.insert("isCompletionRequired".into(), json!(required));
                }
                if !step_locking.is_empty() {
                    config.insert("stepLocking".into(), Value::Object(step_locking));
                }
                Value::Object(config)
            },
        )
}

fn block_tree(article_config: Option<Value>, block_config: Option<Value>) -> ContentTree {
    let mut tree = ContentTree::new();
    tree.insert(ContentNode::new("m05", NodeKind::Course)).unwrap();
    let mut page = ContentNode::new("co-05", NodeKind::Page);
    page.parent = Some(id("m05"));
    tree.insert(page).unwrap();
    let mut article = ContentNode::new("a-05", NodeKind::Article);
    article.parent = Some(id("co-05"));
    article.gating = article_config;
    tree.insert(article).unwrap();
    let mut block = ContentNode::new("b-05", NodeKind::Block);
    block.parent = Some(id("a-05"));
    block.gating = block_config;
    tree.insert(block).unwrap();
    tree.mark_ready();
    tree
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    /// A full-width button always forces step locking on, whatever else the
    /// record says.
    #[test]
    fn full_width_always_forces_step_locking(config in arb_raw_config()) {
        let raw = RawGatingConfig::from_value(&config).unwrap();
        let resolved = raw.into_resolved();
        if resolved.button.is_full_width {
            prop_assert!(resolved.step_locking.is_enabled);
        }
    }

    /// A node resolves enabled only if its own derived `isEnabled` is true:
    /// a disabled ancestor never implicitly enables a descendant, and a
    /// disabled final record resolves to nothing.
    #[test]
    fn enabled_only_by_its_own_derivation(
        article in prop::option::of(arb_raw_config()),
        block in prop::option::of(arb_raw_config()),
    ) {
        let tree = block_tree(article, block);
        if let Some(config) = resolve(&tree, &id("b-05")).unwrap() {
            prop_assert!(config.is_enabled);
            prop_assert!(config.step_locking.is_enabled || !config.button.is_full_width);
        }
        if let Some(config) = resolve(&tree, &id("a-05")).unwrap() {
            prop_assert!(config.is_enabled);
            // A resolving article is always self-managing.
            prop_assert!(!config.on_children);
        }
    }

    /// Unknown keys ride through resolution untouched.
    #[test]
    fn unknown_keys_pass_through(flag in any::<bool>(), number in 0u32..1000) {
        let tree = block_tree(
            None,
            Some(json!({
                "isEnabled": true,
                "vendorFlag": flag,
                "vendorDepth": number
            })),
        );
        let config = resolve(&tree, &id("b-05")).unwrap().unwrap();
        prop_assert_eq!(config.extra.get("vendorFlag"), Some(&json!(flag)));
        prop_assert_eq!(config.extra.get("vendorDepth"), Some(&json!(number)));
    }
}
