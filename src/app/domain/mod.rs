//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Document and its save outcome
//! - Application settings and view preferences
//! - Message types for the event system

pub mod document;
pub mod messages;
pub mod settings;

pub use document::{Document, SaveOutcome};
pub use messages::Message;
pub use settings::{AppSettings, ThemeMode, ViewPreferences};
