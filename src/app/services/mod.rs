//! Services layer - business operations and utilities.
//!
//! - Text operations (titles, status line, search)
//! - File chooser filters
//! - Terminal backend

pub mod file_filters;
pub mod terminal;
pub mod text_ops;
