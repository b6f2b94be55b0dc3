//! Unit lifecycle events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sluice_content::NodeId;
use uuid::Uuid;

/// Lifecycle notifications emitted per top-level unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatingEvent {
    /// Gating has engaged for the unit: at least one descendant is gated
    /// and locked.
    Started { unit: NodeId },
    /// Nothing in the unit is locked any more.
    Finished { unit: NodeId },
    /// Gating was forcibly bypassed for the unit.
    Killed { unit: NodeId },
}

/// Envelope wrapping every gating event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatingEventEnvelope {
    /// Unique event id.
    pub id: Uuid,
    /// Emission timestamp.
    pub timestamp: DateTime<Utc>,
    /// The actual event.
    pub event: GatingEvent,
}

impl GatingEventEnvelope {
    pub fn new(event: GatingEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn unit(&self) -> &NodeId {
        match &self.event {
            GatingEvent::Started { unit }
            | GatingEvent::Finished { unit }
            | GatingEvent::Killed { unit } => unit,
        }
    }
}
