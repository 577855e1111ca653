//! Controllers layer - orchestration and coordination.
//!
//! - Session: unsaved-changes guard for New/Open/Close and the save flows
//! - Terminal: pane visibility and shell lifecycle

pub mod session;
pub mod terminal;
