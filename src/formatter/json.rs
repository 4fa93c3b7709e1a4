//! Extended JSON text formatting for BSON documents
//!
//! This module turns documents into Extended JSON text:
//! - Compact single-line output
//! - Pretty output indented with one tab per nesting level
//! - Relaxed or canonical type tagging via [`ExtendedJsonConverter`]

use bson::Document;
use serde::Serialize;

use super::bson_utils::{BsonJsonConverter, ExtendedJsonConverter};
use crate::config::JsonMode;
use crate::error::EncodingError;

/// Extended JSON formatter with pretty printing support
#[derive(Debug, Clone, Copy)]
pub struct JsonFormatter {
    /// Enable pretty printing
    pretty: bool,

    /// Converter for BSON to Extended JSON
    converter: ExtendedJsonConverter,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    ///
    /// # Arguments
    /// * `pretty` - Enable tab-indented output
    /// * `mode` - Relaxed or canonical Extended JSON
    ///
    /// # Returns
    /// * `Self` - New formatter
    pub fn new(pretty: bool, mode: JsonMode) -> Self {
        Self {
            pretty,
            converter: ExtendedJsonConverter::new(mode),
        }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Format single document as an Extended JSON object
    ///
    /// # Arguments
    /// * `doc` - Document to format
    ///
    /// # Returns
    /// * `Result<String, EncodingError>` - JSON text without a trailing newline
    pub fn format_document(&self, doc: &Document) -> Result<String, EncodingError> {
        let json_value = self.converter.convert_document_to_json(doc)?;

        if self.pretty {
            to_tab_indented_string(&json_value)
        } else {
            Ok(serde_json::to_string(&json_value)?)
        }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(false, JsonMode::default())
    }
}

/// Serialize a value as JSON indented with one tab per nesting level
fn to_tab_indented_string<T: Serialize>(value: &T) -> Result<String, EncodingError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| EncodingError::Serialize(e.to_string()))
}
