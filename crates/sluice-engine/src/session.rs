//! Per-unit session state and orchestration.
//!
//! One [`UnitSession`] exists per entered unit, created on entry and
//! replaced wholesale on the next entry — session flags never live on tree
//! nodes. The [`SessionController`] wires the tree's change stream to the
//! debounced lock pass, gates rendering admission, and emits unit
//! lifecycle events.

use crate::button::{
    self, check_reset_on_revisit, inject_buttons, is_continue_button, refresh_button_states,
};
use crate::error::EngineError;
use crate::events::{GatingEvent, GatingEventEnvelope};
use crate::host::RenderHost;
use crate::locks::{self, LockSummary};
use sluice_config::resolver;
use sluice_content::{ContentTree, NodeId, TreeEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, RwLock};

/// Gating state for one top-level unit.
///
/// The accessor semantics are deliberate: a unit where gating never started
/// reads as finished and killed — there is nothing to wait for and nothing
/// to admit against.
#[derive(Debug, Clone)]
pub struct UnitSession {
    unit: NodeId,
    started: bool,
    finished: bool,
    killed: bool,
}

impl UnitSession {
    pub fn new(unit: NodeId) -> Self {
        Self {
            unit,
            started: false,
            finished: false,
            killed: false,
        }
    }

    pub fn unit(&self) -> &NodeId {
        &self.unit
    }

    /// Gating engaged for this unit at entry (something was locked).
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Finished, killed, or never started at all.
    pub fn is_finished(&self) -> bool {
        !self.started || self.finished || self.is_killed()
    }

    /// Killed, or never started at all.
    pub fn is_killed(&self) -> bool {
        !self.started || self.killed
    }

    /// The kill signal was actually received (regardless of `started`).
    pub fn was_killed(&self) -> bool {
        self.killed
    }
}

/// Decision for a child about to be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildAdmission {
    /// Render the child and keep going.
    Render,
    /// Stop expanding further content at this child.
    Stop,
}

/// Orchestrates gating for a content tree on behalf of one host.
pub struct SessionController {
    tree: Arc<RwLock<ContentTree>>,
    host: Arc<dyn RenderHost>,
    session: RwLock<Option<UnitSession>>,
    events: broadcast::Sender<GatingEventEnvelope>,
    debounce: Duration,
}

impl SessionController {
    pub fn new(tree: Arc<RwLock<ContentTree>>, host: Arc<dyn RenderHost>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            tree,
            host,
            session: RwLock::new(None),
            events,
            debounce: Duration::from_millis(1),
        }
    }

    /// Override the debounce window collapsing change bursts into one pass.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn tree(&self) -> Arc<RwLock<ContentTree>> {
        Arc::clone(&self.tree)
    }

    pub(crate) fn host(&self) -> &dyn RenderHost {
        self.host.as_ref()
    }

    /// Subscribe to unit lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<GatingEventEnvelope> {
        self.events.subscribe()
    }

    fn emit(&self, event: GatingEvent) {
        let _ = self.events.send(GatingEventEnvelope::new(event));
    }

    /// Snapshot of the current unit session, if any.
    pub async fn session(&self) -> Option<UnitSession> {
        self.session.read().await.clone()
    }

    fn killed_unit(session: &Option<UnitSession>) -> Option<NodeId> {
        session
            .as_ref()
            .filter(|session| session.was_killed())
            .map(|session| session.unit().clone())
    }

    /// The host's data is fully loaded: latch readiness, synthesize the
    /// continue buttons, run the first lock pass.
    pub async fn on_data_ready(&self) -> Result<(), EngineError> {
        let mut tree = self.tree.write().await;
        tree.mark_ready();
        inject_buttons(&mut tree)?;
        locks::apply_locks(&mut tree, None)?;
        refresh_button_states(&mut tree, None)?;
        Ok(())
    }

    /// Run one lock pass now and refresh button presentation.
    pub async fn apply_locks_now(&self) -> Result<LockSummary, EngineError> {
        let killed = Self::killed_unit(&*self.session.read().await);
        let mut tree = self.tree.write().await;
        let summary = locks::apply_locks(&mut tree, killed.as_ref())?;
        refresh_button_states(&mut tree, killed.as_ref())?;
        Ok(summary)
    }

    fn unit_is_gating(tree: &ContentTree, unit: &NodeId) -> bool {
        let descendants = tree.descendants(unit, false);
        let locked_somewhere = descendants.iter().any(|id| {
            tree.get(id)
                .map(|node| node.is_available && node.is_gated && node.is_locked)
                .unwrap_or(false)
        });
        // A container that may still request children is not done either.
        let awaiting_children = descendants.iter().any(|id| {
            tree.get(id)
                .map(|node| {
                    node.is_available && node.can_request_child && node.is_completion_blocked
                })
                .unwrap_or(false)
        });
        locked_somewhere || awaiting_children
    }

    /// True while the current unit still has gated, locked content.
    pub async fn is_gating(&self) -> bool {
        let session = self.session.read().await;
        let Some(session) = &*session else {
            return false;
        };
        let tree = self.tree.read().await;
        Self::unit_is_gating(&tree, session.unit())
    }

    /// A unit is about to render: start a fresh session, apply revisit
    /// resets, and recompute whether gating is engaged.
    pub async fn on_unit_enter(&self, unit: NodeId) -> Result<(), EngineError> {
        {
            let mut session = self.session.write().await;
            *session = Some(UnitSession::new(unit.clone()));
        }
        {
            let mut tree = self.tree.write().await;
            let buttons: Vec<NodeId> = tree
                .descendants(&unit, true)
                .into_iter()
                .filter(|id| is_continue_button(&tree, id))
                .collect();
            let mut changed = false;
            for button in buttons {
                changed |= check_reset_on_revisit(&mut tree, &button)?;
            }
            if changed {
                locks::apply_locks(&mut tree, None)?;
                refresh_button_states(&mut tree, None)?;
            }
        }
        let gating = {
            let tree = self.tree.read().await;
            Self::unit_is_gating(&tree, &unit)
        };
        {
            let mut session = self.session.write().await;
            if let Some(session) = session.as_mut() {
                session.started = gating;
                session.finished = false;
                session.killed = false;
            }
        }
        if gating {
            self.emit(GatingEvent::Started { unit });
        }
        Ok(())
    }

    /// Render-admission gate: called by the host before rendering each
    /// child into the visible tree. A killed (or never-started) unit admits
    /// everything; a child that arrived through a dynamic child request
    /// first re-runs the lock pass; a gated, locked child stops the render.
    pub async fn admit_child(
        &self,
        child: &NodeId,
        has_request: bool,
    ) -> Result<ChildAdmission, EngineError> {
        {
            let session = self.session.read().await;
            let killed = session
                .as_ref()
                .map(|session| session.is_killed())
                .unwrap_or(true);
            if killed {
                return Ok(ChildAdmission::Render);
            }
        }
        if has_request {
            self.apply_locks_now().await?;
        }
        let tree = self.tree.read().await;
        let blocked = tree
            .get(child)
            .map(|node| node.is_gated && node.is_locked)
            .unwrap_or(false);
        Ok(if blocked {
            ChildAdmission::Stop
        } else {
            ChildAdmission::Render
        })
    }

    /// Debounced recheck after lock changes: a started, un-killed unit with
    /// nothing locked any more is finished.
    pub async fn check_finished(&self) -> Result<(), EngineError> {
        let unit = {
            let session = self.session.read().await;
            let Some(session) = &*session else {
                return Ok(());
            };
            if !session.is_started() || session.is_killed() || session.is_finished() {
                return Ok(());
            }
            session.unit().clone()
        };
        {
            let tree = self.tree.read().await;
            if Self::unit_is_gating(&tree, &unit) {
                return Ok(());
            }
        }
        {
            let mut session = self.session.write().await;
            if let Some(session) = session.as_mut() {
                session.finished = true;
            }
        }
        self.emit(GatingEvent::Finished { unit });
        Ok(())
    }

    /// Ask the host to render the remaining children of the current unit,
    /// after a fresh lock pass.
    pub async fn continue_rendering(&self) -> Result<(), EngineError> {
        let unit = {
            let session = self.session.read().await;
            let Some(session) = &*session else {
                return Ok(());
            };
            session.unit().clone()
        };
        self.apply_locks_now().await?;
        self.host.render_children(&unit).await?;
        Ok(())
    }

    /// The learner clicked a continue button: complete it, re-run locks,
    /// continue rendering and scroll onward.
    pub async fn acknowledge(&self, button_id: &NodeId) -> Result<(), EngineError> {
        let site = {
            let mut tree = self.tree.write().await;
            if !is_continue_button(&tree, button_id) {
                return Ok(());
            }
            button::set_button_completion(&mut tree, button_id)?;
            tree.parent(button_id).cloned()
        };
        self.continue_rendering().await?;
        if let Some(site) = site {
            self.scroll_from(&site).await?;
        }
        Ok(())
    }

    /// Unilateral escape hatch: complete every button in the unit, clear
    /// every gated lock, mark the session killed and continue rendering.
    /// Fail-open by design — a broken configuration must never trap the
    /// learner.
    pub async fn kill(&self) -> Result<(), EngineError> {
        let unit = {
            let mut session = self.session.write().await;
            let Some(session) = session.as_mut() else {
                return Ok(());
            };
            session.killed = true;
            session.unit().clone()
        };
        {
            let mut tree = self.tree.write().await;
            for id in tree.descendants(&unit, false) {
                if is_continue_button(&tree, &id) {
                    button::set_button_completion(&mut tree, &id)?;
                }
                let gated = tree.get(&id).map(|node| node.is_gated).unwrap_or(false);
                if gated {
                    tree.set_locked(&id, false)?;
                }
            }
        }
        self.emit(GatingEvent::Killed { unit });
        self.continue_rendering().await
    }

    /// An external reset (e.g. assessment retry) invalidated completion
    /// state: re-run the lock pass.
    pub async fn on_assessment_reset(&self) -> Result<(), EngineError> {
        self.apply_locks_now().await.map(|_| ())
    }

    fn wants_relock(tree: &ContentTree, event: &TreeEvent) -> bool {
        if !tree.is_ready() {
            return false;
        }
        match event {
            TreeEvent::NodeAdded { .. }
            | TreeEvent::NodeRemoved { .. }
            | TreeEvent::AvailabilityChanged { .. } => true,
            TreeEvent::CompletionChanged { id, attribute, .. } => {
                resolver::completion_attribute(tree, id)
                    .map(|expected| expected == *attribute)
                    .unwrap_or(false)
            }
            TreeEvent::LockChanged { .. } => false,
        }
    }

    /// The reactor: consume the tree's change stream, collapse bursts
    /// within the debounce window, and run at most one lock pass (and one
    /// finished-check) per batch. Lock writes from a pass feed back through
    /// the stream and trigger only the finished-check, so re-entrant
    /// triggering terminates.
    pub async fn run(self: Arc<Self>, mut events: mpsc::UnboundedReceiver<TreeEvent>) {
        while let Some(first) = events.recv().await {
            let mut relock;
            let mut refinish = matches!(first, TreeEvent::LockChanged { .. });
            {
                let tree = self.tree.read().await;
                relock = Self::wants_relock(&tree, &first);
            }
            tokio::time::sleep(self.debounce).await;
            while let Ok(event) = events.try_recv() {
                refinish |= matches!(event, TreeEvent::LockChanged { .. });
                let tree = self.tree.read().await;
                relock |= Self::wants_relock(&tree, &event);
            }
            if relock {
                if let Err(error) = self.apply_locks_now().await {
                    tracing::error!(error = %error, "lock pass failed");
                }
            }
            if refinish {
                if let Err(error) = self.check_finished().await {
                    tracing::error!(error = %error, "finished check failed");
                }
            }
        }
    }
}
