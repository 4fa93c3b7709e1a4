//! mongoexport Library
//!
//! This library converts BSON documents into two text formats: CSV rows
//! built from dotted field paths, and MongoDB Extended JSON that keeps
//! non-JSON types (ObjectIds, dates, 64-bit integers, decimals, binary)
//! recoverable through single-key type tags.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `export`: Field path resolution and the CSV / Extended JSON writers
//! - `formatter`: BSON to Extended JSON and cell text conversion
//! - `input`: Newline-delimited Extended JSON document reader
//!
//! # Example
//!
//! ```no_run
//! use bson::{doc, oid::ObjectId};
//! use mongoexport::config::JsonMode;
//! use mongoexport::export::{ExportOutput, JsonExportOutput};
//!
//! fn main() -> mongoexport::Result<()> {
//!     let mut output = JsonExportOutput::new(false, false, JsonMode::Relaxed, Vec::new());
//!     output.write_header()?;
//!     output.export_document(&doc! { "_id": ObjectId::new() })?;
//!     output.write_footer()?;
//!     output.flush()?;
//!
//!     println!("{}", String::from_utf8_lossy(&output.into_inner()));
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod formatter;
pub mod input;

// Re-export commonly used types
pub use config::{Config, ExportConfig, ExportFormat, JsonMode};
pub use error::{ExportError, Result};
pub use export::{ExportOutput, FieldPath, create_output};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
