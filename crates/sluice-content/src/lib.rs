//! Content tree model for the Sluice gating engine.
//!
//! The tree is an arena of nodes addressed by stable string identity:
//! parents and children are stored as id references resolved through the
//! arena, never as live object pointers. Hosts load their document model
//! into a [`ContentTree`], mark it ready, and mutate attributes through the
//! change-emitting setters; the gating engine observes the resulting
//! [`TreeEvent`] stream and owns the `is_locked` attribute.

#![deny(unsafe_code)]

pub mod address;
pub mod error;
pub mod events;
pub mod ids;
pub mod kinds;
pub mod node;
pub mod tree;

pub use address::ScrollTarget;
pub use error::TreeError;
pub use events::TreeEvent;
pub use ids::NodeId;
pub use kinds::NodeKind;
pub use node::{ButtonState, ContentNode, DEFAULT_COMPLETION_ATTRIBUTE, INTERACTION_COMPLETE};
pub use tree::ContentTree;
