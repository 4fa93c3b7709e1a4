//! Error handling module for export operations.
//!
//! This module provides error handling for the export pipeline with:
//! - A single top-level [`ExportError`] used by every fallible operation
//! - Specific kinds for encoding, configuration, and input failures
//! - Sink I/O errors passed through unchanged so callers can decide to abort
//!
//! # Example
//!
//! ```rust,no_run
//! use mongoexport::error::{ExportError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ExportError::Generic("nothing to export".to_string()))
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, EncodingError, ExportError, InputError, Result};
