//! Integration and property tests for the Sluice workspace.
//!
//! The suites live under `tests/`:
//!
//! - `scenario/` — end-to-end gating scenarios over realistic content trees
//! - `property/` — randomized invariants over generated trees
