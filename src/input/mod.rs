//! Input documents for the command-line exporter
//!
//! Reads newline-delimited Extended JSON (relaxed or canonical) and yields
//! one fully materialized BSON document per non-blank line.

use std::io::BufRead;

use bson::{Bson, Document};
use tracing::trace;

use crate::error::{InputError, Result};

/// Iterator over Extended JSON documents, one per line
pub struct DocumentReader<R: BufRead> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> DocumentReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Parse one line of Extended JSON into a document
    fn parse_line(&self, text: &str) -> Result<Document> {
        let json: serde_json::Value =
            serde_json::from_str(text).map_err(|e| InputError::InvalidJson {
                line: self.line,
                message: e.to_string(),
            })?;
        if !json.is_object() {
            return Err(InputError::NotADocument { line: self.line }.into());
        }

        match Bson::try_from(json) {
            Ok(Bson::Document(doc)) => Ok(doc),
            Ok(_) => Err(InputError::NotADocument { line: self.line }.into()),
            Err(e) => Err(InputError::InvalidJson {
                line: self.line,
                message: e.to_string(),
            }
            .into()),
        }
    }
}

impl<R: BufRead> Iterator for DocumentReader<R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            trace!("Read input line {}", self.line);
            return Some(self.parse_line(text));
        }
    }
}
