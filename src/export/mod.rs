//! Export module for writing documents as CSV or Extended JSON
//!
//! This module provides the export pipeline driven by callers:
//! - Field path resolution for CSV columns
//! - Format writers sharing one [`ExportOutput`] interface
//! - A factory that builds the writer for a validated [`ExportConfig`]
//!
//! # Lifecycle
//!
//! Every output is driven in the same order: `write_header` once,
//! `export_document` any number of times, `write_footer` once, then `flush`.
//! Documents are written in exactly the order they are exported.
//!
//! # Example
//!
//! ```no_run
//! use bson::doc;
//! use mongoexport::config::{ExportConfig, ExportFormat};
//! use mongoexport::export::create_output;
//!
//! # fn main() -> mongoexport::Result<()> {
//! let config = ExportConfig {
//!     format: ExportFormat::Csv,
//!     fields: vec!["name".to_string(), "addresses.0.city".to_string()],
//!     ..ExportConfig::default()
//! };
//! let mut output = create_output(&config, std::io::stdout())?;
//! output.write_header()?;
//! output.export_document(&doc! { "name": "Alice", "addresses": [{ "city": "Boston" }] })?;
//! output.write_footer()?;
//! output.flush()?;
//! # Ok(())
//! # }
//! ```

pub mod path;
pub mod writers;

use std::io::Write;

use bson::Document;
use tracing::debug;

use crate::config::{ExportConfig, ExportFormat};
use crate::error::{ExportError, Result};

pub use path::{FieldPath, parse_field_list, read_field_file};
pub use writers::{CsvExportOutput, JsonExportOutput};

/// Shared interface for all export formats
///
/// One instance serves one export run and is not shared between callers.
pub trait ExportOutput {
    /// Write whatever precedes the first document
    fn write_header(&mut self) -> Result<()>;

    /// Write a single document
    fn export_document(&mut self, doc: &Document) -> Result<()>;

    /// Write whatever follows the last document
    fn write_footer(&mut self) -> Result<()>;

    /// Push buffered output to the sink
    fn flush(&mut self) -> Result<()>;

    /// Number of documents exported so far
    fn num_exported(&self) -> u64;
}

/// Lifecycle position of an export output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    Fresh,
    HeaderWritten,
    Exporting,
    FooterWritten,
}

impl OutputState {
    /// Whether a header may still be written
    pub(crate) fn accepts_header(self) -> bool {
        self == OutputState::Fresh
    }

    /// Whether a footer may still be written
    pub(crate) fn accepts_footer(self) -> bool {
        self != OutputState::FooterWritten
    }

    /// Fail if documents can no longer be exported
    pub(crate) fn check_exportable(self) -> Result<()> {
        if self == OutputState::FooterWritten {
            return Err(ExportError::InvalidState(
                "cannot export a document after the footer was written".to_string(),
            ));
        }
        Ok(())
    }
}

/// Build the export output for a configuration
///
/// # Arguments
/// * `config` - Export configuration, validated here
/// * `out` - Byte sink the output writes to
///
/// # Returns
/// * `Result<Box<dyn ExportOutput + 'a>>` - Writer for the configured format
pub fn create_output<'a, W: Write + 'a>(
    config: &ExportConfig,
    out: W,
) -> Result<Box<dyn ExportOutput + 'a>> {
    config.validate()?;

    let output: Box<dyn ExportOutput + 'a> = match config.format {
        ExportFormat::Csv => Box::new(
            CsvExportOutput::new(&config.fields, config.no_header_line, out)
                .with_delimiter(config.delimiter)?
                .with_json_mode(config.json_mode),
        ),
        ExportFormat::Json => Box::new(JsonExportOutput::new(
            config.json_array,
            config.pretty,
            config.json_mode,
            out,
        )),
    };

    debug!("Created {:?} export output", config.format);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn run(config: &ExportConfig, docs: &[Document]) -> String {
        let mut buf = Vec::new();
        {
            let mut output = create_output(config, &mut buf).unwrap();
            output.write_header().unwrap();
            for doc in docs {
                output.export_document(doc).unwrap();
            }
            output.write_footer().unwrap();
            output.flush().unwrap();
            assert_eq!(output.num_exported(), docs.len() as u64);
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_create_csv_output() {
        let config = ExportConfig {
            format: ExportFormat::Csv,
            fields: vec!["name".to_string(), "tags".to_string()],
            ..ExportConfig::default()
        };
        let out = run(&config, &[doc! { "name": "Alice", "tags": ["a", "b"] }]);
        assert_eq!(out, "name,tags\nAlice,\"[\"\"a\"\",\"\"b\"\"]\"\n");
    }

    #[test]
    fn test_create_json_output() {
        let config = ExportConfig {
            json_array: true,
            ..ExportConfig::default()
        };
        let out = run(&config, &[doc! { "a": 1 }, doc! { "a": 2 }]);
        assert_eq!(out, "[{\"a\":1},{\"a\":2}]\n");
    }

    #[test]
    fn test_create_output_validates() {
        let config = ExportConfig {
            format: ExportFormat::Csv,
            ..ExportConfig::default()
        };
        assert!(create_output(&config, Vec::new()).is_err());
    }

    #[test]
    fn test_output_state_transitions() {
        assert!(OutputState::Fresh.accepts_header());
        assert!(!OutputState::Exporting.accepts_header());
        assert!(OutputState::Exporting.accepts_footer());
        assert!(!OutputState::FooterWritten.accepts_footer());
        assert!(OutputState::HeaderWritten.check_exportable().is_ok());
        assert!(OutputState::FooterWritten.check_exportable().is_err());
    }
}
