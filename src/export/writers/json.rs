//! Extended JSON writer for export operations
//!
//! This module exports whole documents as Extended JSON, either one document
//! per line or as a single JSON array, optionally tab-indented.

use std::io::Write;

use bson::Document;
use tracing::{debug, trace};

use crate::config::JsonMode;
use crate::error::Result;
use crate::export::{ExportOutput, OutputState};
use crate::formatter::JsonFormatter;

/// Writer for Extended JSON format
///
/// Each document is fully encoded before any byte of it, or of the
/// separator in front of it, reaches the sink.
pub struct JsonExportOutput<W: Write> {
    /// Output sink
    out: W,
    /// Wrap every document in one JSON array
    array_output: bool,
    /// Formatter for converting BSON to Extended JSON text
    formatter: JsonFormatter,
    /// Number of documents written
    num_exported: u64,
    state: OutputState,
}

impl<W: Write> JsonExportOutput<W> {
    /// Create a new Extended JSON writer
    ///
    /// # Arguments
    /// * `array_output` - Wrap documents in `[` ... `]`
    /// * `pretty_output` - Tab-indent each document
    /// * `mode` - Relaxed or canonical Extended JSON
    /// * `out` - Byte sink
    pub fn new(array_output: bool, pretty_output: bool, mode: JsonMode, out: W) -> Self {
        debug!(
            "Created JSON writer (array: {}, pretty: {}, mode: {:?})",
            array_output, pretty_output, mode
        );

        Self {
            out,
            array_output,
            formatter: JsonFormatter::new(pretty_output, mode),
            num_exported: 0,
            state: OutputState::Fresh,
        }
    }

    fn pretty_output(&self) -> bool {
        self.formatter.is_pretty()
    }

    /// Return the underlying sink
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Bytes written ahead of the next document
    fn separator(&self) -> &'static [u8] {
        if self.num_exported == 0 {
            return b"";
        }
        match (self.array_output, self.pretty_output()) {
            (true, true) => b",\n",
            (true, false) => b",",
            (false, true) => b"\n",
            (false, false) => b"",
        }
    }
}

impl<W: Write> ExportOutput for JsonExportOutput<W> {
    fn write_header(&mut self) -> Result<()> {
        if !self.state.accepts_header() {
            debug!("JSON header already written, skipping");
            return Ok(());
        }

        if self.array_output {
            self.out.write_all(b"[")?;
        }
        self.state = OutputState::HeaderWritten;
        Ok(())
    }

    fn export_document(&mut self, doc: &Document) -> Result<()> {
        self.state.check_exportable()?;

        let json = self.formatter.format_document(doc)?;
        trace!("JSON document: {}", json);

        let mut chunk = Vec::with_capacity(json.len() + 2);
        chunk.extend_from_slice(self.separator());
        chunk.extend_from_slice(json.as_bytes());
        if !self.array_output && !self.pretty_output() {
            chunk.push(b'\n');
        }
        self.out.write_all(&chunk)?;

        self.num_exported += 1;
        self.state = OutputState::Exporting;
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        if !self.state.accepts_footer() {
            debug!("JSON footer already written, skipping");
            return Ok(());
        }

        if self.array_output {
            self.out.write_all(b"]\n")?;
        } else if self.pretty_output() {
            self.out.write_all(b"\n")?;
        }
        self.state = OutputState::FooterWritten;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        // unbuffered beyond the sink itself
        Ok(())
    }

    fn num_exported(&self) -> u64 {
        self.num_exported
    }
}
