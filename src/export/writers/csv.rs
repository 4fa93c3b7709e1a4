//! CSV writer for export operations
//!
//! This module exports documents as delimited rows. Columns come from a
//! configured list of dotted field paths; each path is resolved per document
//! and rendered as a flat cell, with standard CSV quoting.

use std::io::{BufWriter, Write};

use bson::Document;
use tracing::{debug, trace};

use crate::config::{JsonMode, csv_delimiter};
use crate::error::Result;
use crate::export::path::FieldPath;
use crate::export::{ExportOutput, OutputState};
use crate::formatter::bson_utils::{BsonConverter, CellConverter};

/// Writer for CSV format
///
/// Missing fields become empty cells; compound and specialized values become
/// compact Extended JSON. Rows are buffered until [`ExportOutput::flush`].
pub struct CsvExportOutput<W: Write> {
    /// Buffered sink
    writer: BufWriter<W>,
    /// Column paths, in output order
    fields: Vec<FieldPath>,
    /// Skip the header row
    no_header_line: bool,
    /// Byte written between fields
    delimiter: u8,
    /// Converter for resolved values
    converter: CellConverter,
    /// Number of documents written
    num_exported: u64,
    state: OutputState,
}

impl<W: Write> CsvExportOutput<W> {
    /// Create a new CSV writer
    ///
    /// # Arguments
    /// * `fields` - Dotted field paths to extract, also used as column labels
    /// * `no_header_line` - Skip the header row
    /// * `out` - Byte sink
    pub fn new<S: AsRef<str>>(fields: &[S], no_header_line: bool, out: W) -> Self {
        let fields: Vec<FieldPath> = fields.iter().map(|f| FieldPath::parse(f.as_ref())).collect();
        debug!("Created CSV writer with {} fields", fields.len());

        Self {
            writer: BufWriter::new(out),
            fields,
            no_header_line,
            delimiter: b',',
            converter: CellConverter::default(),
            num_exported: 0,
            state: OutputState::Fresh,
        }
    }

    /// Use a different delimiter
    ///
    /// The delimiter must be a single ASCII character other than a quote or
    /// line break; anything else is rejected with a configuration error.
    pub fn with_delimiter(mut self, delimiter: char) -> Result<Self> {
        self.delimiter = csv_delimiter(delimiter)?;
        Ok(self)
    }

    /// Encode compound cells with the given Extended JSON flavour
    pub fn with_json_mode(mut self, mode: JsonMode) -> Self {
        self.converter = CellConverter::new(mode);
        self
    }

    /// Flush and return the underlying sink
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }

    /// Render one document as a list of cells
    fn document_row(&self, doc: &Document) -> Vec<String> {
        self.fields
            .iter()
            .map(|path| self.converter.convert_optional(path.resolve(doc)))
            .collect()
    }

    /// Write one record, quoting fields as needed, followed by a newline
    fn write_row<S: AsRef<str>>(&mut self, row: &[S]) -> Result<()> {
        let mut line = String::new();
        for (i, field) in row.iter().enumerate() {
            if i > 0 {
                line.push(char::from(self.delimiter));
            }
            line.push_str(&escape_csv_value(field.as_ref(), self.delimiter));
        }
        line.push('\n');

        self.writer.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// Escape a CSV value if necessary
///
/// A value is quoted when it contains the delimiter, a quote, or a line
/// break, or when it starts with whitespace. Embedded quotes are doubled.
fn escape_csv_value(value: &str, delimiter: u8) -> String {
    if needs_quotes(value, delimiter) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn needs_quotes(value: &str, delimiter: u8) -> bool {
    if value.is_empty() {
        return false;
    }
    value.starts_with([' ', '\t'])
        || value
            .bytes()
            .any(|b| b == delimiter || b == b'"' || b == b'\r' || b == b'\n')
}

impl<W: Write> ExportOutput for CsvExportOutput<W> {
    fn write_header(&mut self) -> Result<()> {
        if !self.state.accepts_header() {
            debug!("CSV header already written, skipping");
            return Ok(());
        }

        if !self.no_header_line {
            let labels: Vec<String> = self.fields.iter().map(FieldPath::to_string).collect();
            self.write_row(&labels)?;
            debug!("Wrote CSV header: {} fields", labels.len());
        }
        self.state = OutputState::HeaderWritten;
        Ok(())
    }

    fn export_document(&mut self, doc: &Document) -> Result<()> {
        self.state.check_exportable()?;

        let row = self.document_row(doc);
        trace!("CSV row: {:?}", row);
        self.write_row(&row)?;

        self.num_exported += 1;
        self.state = OutputState::Exporting;
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        // no CSV footer
        self.state = OutputState::FooterWritten;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        debug!("Flushed CSV output ({} documents)", self.num_exported);
        Ok(())
    }

    fn num_exported(&self) -> u64 {
        self.num_exported
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, ExportError};
    use bson::{Bson, doc, oid::ObjectId};
    use std::io;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn export(fields: &[&str], no_header_line: bool, docs: &[Document]) -> String {
        let mut writer = CsvExportOutput::new(fields, no_header_line, Vec::new());
        writer.write_header().unwrap();
        for doc in docs {
            writer.export_document(doc).unwrap();
        }
        writer.write_footer().unwrap();
        writer.flush().unwrap();
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_csv_writer_basic() {
        let docs = vec![
            doc! { "name": "Alice", "age": 30 },
            doc! { "name": "Bob", "age": 25 },
        ];
        let content = export(&["name", "age"], false, &docs);

        assert_eq!(content, "name,age\nAlice,30\nBob,25\n");
    }

    #[test]
    fn test_csv_line_count_with_header() {
        let docs: Vec<Document> = (0..5).map(|i| doc! { "i": i }).collect();
        let content = export(&["i", "missing"], false, &docs);

        assert_eq!(content.lines().count(), docs.len() + 1);
        assert_eq!(content.lines().next(), Some("i,missing"));
        assert_eq!(content.lines().nth(3), Some("2,"));
    }

    #[test]
    fn test_csv_no_header_line() {
        let content = export(&["name"], true, &[doc! { "name": "Alice" }]);
        assert_eq!(content, "Alice\n");
    }

    #[test]
    fn test_csv_nested_path() {
        let doc = doc! { "addresses": [{ "city": "Boston" }] };
        let content = export(&["addresses.0.city"], true, &[doc]);
        assert_eq!(content, "Boston\n");
    }

    #[test]
    fn test_csv_array_cell() {
        let content = export(&["tags"], true, &[doc! { "tags": ["a", "b"] }]);
        // ["a","b"] quoted because of the embedded quotes and comma
        assert_eq!(content, "\"[\"\"a\"\",\"\"b\"\"]\"\n");
    }

    #[test]
    fn test_csv_array_cell_with_tab_delimiter() {
        let mut writer = CsvExportOutput::new(&["tags", "n"], true, Vec::new())
            .with_delimiter('\t')
            .unwrap();
        writer
            .export_document(&doc! { "tags": ["a", "b"], "n": 1 })
            .unwrap();
        let content = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(content, "\"[\"\"a\"\",\"\"b\"\"]\"\t1\n");
    }

    #[test]
    fn test_csv_missing_vs_null() {
        let content = export(&["a", "b", "c"], true, &[doc! { "a": 1, "b": null }]);
        assert_eq!(content, "1,null,\n");
    }

    #[test]
    fn test_csv_object_id_cell() {
        let oid = ObjectId::parse_str("65705d84dfc3f3b5094e1f72").unwrap();
        let content = export(&["_id"], true, &[doc! { "_id": oid }]);
        assert_eq!(
            content,
            "\"{\"\"$oid\"\":\"\"65705d84dfc3f3b5094e1f72\"\"}\"\n"
        );
    }

    #[test]
    fn test_csv_nested_array_of_documents_and_empty_array() {
        let doc = doc! {
            "items": [{ "sku": "x1", "qty": 2 }, { "sku": "y2" }],
            "empty": [],
        };
        let mut writer = CsvExportOutput::new(&["items", "empty"], true, Vec::new());
        let row = writer.document_row(&doc);
        assert_eq!(row, vec![r#"[{"sku":"x1","qty":2},{"sku":"y2"}]"#, "[]"]);

        writer.export_document(&doc).unwrap();
        assert_eq!(writer.num_exported(), 1);
    }

    #[test]
    fn test_csv_header_is_verbatim_paths() {
        let content = export(&["addresses.0.city", "a,b"], false, &[]);
        assert_eq!(content, "addresses.0.city,\"a,b\"\n");
    }

    #[test]
    fn test_csv_escape_value() {
        assert_eq!(escape_csv_value("simple", b','), "simple");
        assert_eq!(escape_csv_value("", b','), "");
        assert_eq!(escape_csv_value("with,comma", b','), "\"with,comma\"");
        assert_eq!(escape_csv_value("with,comma", b';'), "with,comma");
        assert_eq!(escape_csv_value("with\"quote", b','), "\"with\"\"quote\"");
        assert_eq!(escape_csv_value("with\nnewline", b','), "\"with\nnewline\"");
        assert_eq!(escape_csv_value("with\rreturn", b','), "\"with\rreturn\"");
        assert_eq!(escape_csv_value(" leading", b','), "\" leading\"");
    }

    #[test]
    fn test_csv_writer_with_special_characters() {
        let docs = vec![
            doc! { "text": "Hello, world!" },
            doc! { "text": "Quote: \"test\"" },
        ];
        let content = export(&["text"], true, &docs);
        assert!(content.contains("\"Hello, world!\""));
        assert!(content.contains("\"Quote: \"\"test\"\"\""));
    }

    #[test]
    fn test_csv_export_after_footer_fails() {
        let mut writer = CsvExportOutput::new(&["a"], false, Vec::new());
        writer.write_header().unwrap();
        writer.write_footer().unwrap();
        let err = writer.export_document(&doc! { "a": 1 }).unwrap_err();
        assert!(matches!(err, ExportError::InvalidState(_)));
        assert_eq!(writer.num_exported(), 0);
    }

    #[test]
    fn test_csv_second_header_is_noop() {
        let mut writer = CsvExportOutput::new(&["a"], false, Vec::new());
        writer.write_header().unwrap();
        writer.write_header().unwrap();
        let content = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(content, "a\n");
    }

    #[test]
    fn test_csv_sink_failure_surfaces_on_flush() {
        let mut writer = CsvExportOutput::new(&["a"], false, FailingWriter);
        writer.write_header().unwrap();
        writer.export_document(&doc! { "a": Bson::Int32(1) }).unwrap();

        let err = writer.flush().unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }

    #[test]
    fn test_csv_rejects_non_ascii_delimiter() {
        for delimiter in ['\u{ff}', '\u{e9}', '"', '\n'] {
            let err = CsvExportOutput::new(&["a"], false, Vec::new())
                .with_delimiter(delimiter)
                .err()
                .unwrap();
            assert!(matches!(
                err,
                ExportError::Config(ConfigError::InvalidValue { .. })
            ));
        }
    }
}
