//! Scroll and navigation requests issued after a step is passed.
//!
//! The engine only resolves the configured target expression and asks the
//! host to render, focus and scroll; all visual work is the host's.

use crate::error::EngineError;
use crate::session::SessionController;
use sluice_config::resolver;
use sluice_content::{NodeId, ScrollTarget};

/// Scroll duration applied when the configuration does not name one.
const DEFAULT_SCROLL_DURATION_MS: u64 = 500;

impl SessionController {
    /// Scroll onward from `site` as its configuration directs.
    ///
    /// Abandons quietly (returning false) when the site is ungated, is a
    /// container-managing article, has neither auto-scroll nor a button, or
    /// when the target expression does not resolve — the desired target may
    /// legitimately not exist at the end of the content.
    pub async fn scroll_from(&self, site: &NodeId) -> Result<bool, EngineError> {
        let (config, target, unit) = {
            let tree = self.tree().read_owned().await;
            let Some(config) = resolver::resolve(&tree, site)? else {
                return Ok(false);
            };
            if resolver::is_article_managing_children(&tree, site) {
                return Ok(false);
            }
            if !config.auto_scroll && !config.button.is_enabled {
                return Ok(false);
            }
            let Some(parsed) = ScrollTarget::parse(&config.scroll_target) else {
                tracing::debug!(site = %site, expression = %config.scroll_target, "scroll target expression is empty or malformed");
                return Ok(false);
            };
            let Some(target) = parsed.resolve(&tree, site) else {
                tracing::debug!(site = %site, expression = %config.scroll_target, "scroll target did not resolve");
                return Ok(false);
            };
            let unit = match self.session().await {
                Some(session) => Some(session.unit().clone()),
                None => tree.unit_of(site),
            };
            let Some(unit) = unit else {
                return Ok(false);
            };
            (config, target, unit)
        };

        let in_unit = {
            let tree = self.tree();
            let tree = tree.read().await;
            target == unit || tree.is_descendant_of(&target, &unit)
        };

        if !in_unit {
            // The target lives in another unit: settle locks, navigate to
            // that unit, then re-resolve (relative targets may change once
            // the destination is live) and navigate to the element.
            self.apply_locks_now().await?;
            let target_unit = {
                let tree = self.tree();
                let tree = tree.read().await;
                tree.unit_of(&target)
            };
            if let Some(target_unit) = target_unit {
                self.host().navigate_to(&target_unit).await?;
            }
            let target = {
                let tree = self.tree();
                let tree = tree.read().await;
                ScrollTarget::parse(&config.scroll_target).and_then(|parsed| parsed.resolve(&tree, site))
            };
            if let Some(target) = target {
                self.host().navigate_to(&target).await?;
            }
            return Ok(true);
        }

        self.host().render_to(&unit, &target).await?;
        if config.button.is_enabled {
            // Focus moves only when there is a button to return focus from.
            self.host().focus(&target).await?;
        }
        if !config.auto_scroll {
            return Ok(false);
        }
        let duration = config
            .scroll_duration_ms
            .unwrap_or(DEFAULT_SCROLL_DURATION_MS);
        self.host().scroll_to(&target, duration).await?;
        Ok(true)
    }
}
