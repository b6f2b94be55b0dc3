//! Change notifications emitted by the content tree.

use crate::ids::NodeId;
use serde::{Deserialize, Serialize};

/// A single observable mutation of the tree.
///
/// Setters emit an event only when the stored value actually changed, so a
/// burst of redundant writes produces no notifications and re-entrant
/// recomputation settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeEvent {
    NodeAdded {
        id: NodeId,
    },
    NodeRemoved {
        id: NodeId,
    },
    AvailabilityChanged {
        id: NodeId,
        is_available: bool,
    },
    CompletionChanged {
        id: NodeId,
        attribute: String,
        value: bool,
    },
    LockChanged {
        id: NodeId,
        is_locked: bool,
    },
}

impl TreeEvent {
    /// The node the event concerns.
    pub fn node_id(&self) -> &NodeId {
        match self {
            Self::NodeAdded { id }
            | Self::NodeRemoved { id }
            | Self::AvailabilityChanged { id, .. }
            | Self::CompletionChanged { id, .. }
            | Self::LockChanged { id, .. } => id,
        }
    }
}
