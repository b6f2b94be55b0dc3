//! The Sluice gating engine.
//!
//! Sluice keeps a content tree's `is_locked` attributes consistent with its
//! completion state: every node with an enabled gating configuration (a
//! *site*) controls the succession of the nodes after it, up to the unit
//! boundary. The engine walks sites in document order, accumulates locks
//! forward through each site's succession list, cascades them down through
//! descendants, and writes only the deltas — so a repeated pass with
//! unchanged inputs is a no-op and re-entrant triggering settles.
//!
//! Alongside the lock pass the engine synthesizes one continue button per
//! site, maintains each button's presentation state, and runs a per-unit
//! session state machine (started / finished / killed) that gates rendering
//! admission and emits lifecycle events.

#![deny(unsafe_code)]

pub mod button;
pub mod error;
pub mod events;
pub mod host;
pub mod locks;
pub mod scroll;
pub mod session;
pub mod succession;

pub use button::{
    check_reset_on_revisit, compute_button_state, inject_buttons, is_continue_button,
    refresh_button_states, set_button_completion, CONTINUE_BUTTON_COMPONENT,
};
pub use error::EngineError;
pub use events::{GatingEvent, GatingEventEnvelope};
pub use host::{HostError, HostRequest, RecordingHost, RenderHost};
pub use locks::{apply_locks, compute_locks, is_site_locked, LockComputation, LockSummary};
pub use session::{ChildAdmission, SessionController, UnitSession};
pub use succession::subsequent_across_ancestors;
