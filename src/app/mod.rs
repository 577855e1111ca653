//! Application layer.
//!
//! - `domain/` - the document, settings and the message enum
//! - `controllers/` - the unsaved-changes session and the terminal lifecycle
//! - `services/` - text helpers, file filters and the terminal emulator
//! - `infrastructure/` - errors, file IO and platform detection
//! - `state.rs` - wires the controllers to the widgets

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

pub use controllers::session::{Outcome, Prompter, Session, UnsavedChoice};
pub use domain::{AppSettings, Document, Message, ThemeMode};
pub use infrastructure::error::{AppError, Result};
pub use state::AppState;
