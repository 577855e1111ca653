//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Whole-file I/O
//! - Platform-specific detection
//! - Error types

pub mod error;
pub mod file_io;
pub mod platform;
