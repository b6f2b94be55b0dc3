//! Gating configuration for the Sluice engine.
//!
//! Authored configuration is a per-node record persisted with the content
//! data. This crate parses it into typed records (unknown keys preserved),
//! derives an effective configuration for any node by walking its
//! inheritance chain and layering schema defaults under the most specific
//! member, and resolves which completion attribute gates a site.

#![deny(unsafe_code)]

pub mod defaults;
pub mod error;
pub mod merge;
pub mod resolver;
pub mod types;

pub use error::ConfigError;
pub use resolver::{
    completion_attribute, container_of, fallback_completion_attribute, inheritance_chain,
    is_article_managing_children, is_block_managed_by_article, resolve,
};
pub use types::{
    ButtonConfig, ButtonStyle, GatingConfig, RawButtonConfig, RawGatingConfig,
    RawStepLockingConfig, StepLockingConfig,
};
