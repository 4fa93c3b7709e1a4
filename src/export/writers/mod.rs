//! Format writers for export operations
//!
//! Both writers implement [`ExportOutput`](super::ExportOutput) over any
//! `std::io::Write` sink.

pub mod csv;
pub mod json;

pub use csv::CsvExportOutput;
pub use json::JsonExportOutput;
