//! The seam to the host renderer.
//!
//! The engine never renders, scrolls or focuses anything itself: it asks
//! the host through this trait and otherwise only reads and writes tree
//! attributes. Hosts plug in their renderer; tests use [`RecordingHost`].

use async_trait::async_trait;
use sluice_content::NodeId;
use std::sync::Mutex;

/// Errors surfaced by a host implementation.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("render failed: {0}")]
    Render(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
}

/// Rendering and navigation operations the engine requests from its host.
#[async_trait]
pub trait RenderHost: Send + Sync {
    /// Continue rendering the remaining children of `unit`.
    async fn render_children(&self, unit: &NodeId) -> Result<(), HostError>;

    /// Render `unit` up to and including `target`.
    async fn render_to(&self, unit: &NodeId, target: &NodeId) -> Result<(), HostError>;

    /// Navigate to `target`, which may live in another unit.
    async fn navigate_to(&self, target: &NodeId) -> Result<(), HostError>;

    /// Scroll the viewport to `target` over `duration_ms`.
    async fn scroll_to(&self, target: &NodeId, duration_ms: u64) -> Result<(), HostError>;

    /// Move input focus to `target`.
    async fn focus(&self, target: &NodeId) -> Result<(), HostError>;
}

/// A host request captured by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    RenderChildren(NodeId),
    RenderTo(NodeId, NodeId),
    NavigateTo(NodeId),
    ScrollTo(NodeId, u64),
    Focus(NodeId),
}

/// An in-memory host that records every request, for tests and development.
#[derive(Debug, Default)]
pub struct RecordingHost {
    requests: Mutex<Vec<HostRequest>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<HostRequest> {
        self.requests.lock().expect("recording host lock").clone()
    }

    fn record(&self, request: HostRequest) {
        self.requests.lock().expect("recording host lock").push(request);
    }
}

#[async_trait]
impl RenderHost for RecordingHost {
    async fn render_children(&self, unit: &NodeId) -> Result<(), HostError> {
        self.record(HostRequest::RenderChildren(unit.clone()));
        Ok(())
    }

    async fn render_to(&self, unit: &NodeId, target: &NodeId) -> Result<(), HostError> {
        self.record(HostRequest::RenderTo(unit.clone(), target.clone()));
        Ok(())
    }

    async fn navigate_to(&self, target: &NodeId) -> Result<(), HostError> {
        self.record(HostRequest::NavigateTo(target.clone()));
        Ok(())
    }

    async fn scroll_to(&self, target: &NodeId, duration_ms: u64) -> Result<(), HostError> {
        self.record(HostRequest::ScrollTo(target.clone(), duration_ms));
        Ok(())
    }

    async fn focus(&self, target: &NodeId) -> Result<(), HostError> {
        self.record(HostRequest::Focus(target.clone()));
        Ok(())
    }
}
