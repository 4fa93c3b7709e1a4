//! Value formatting for export output
//!
//! This module provides the conversions the export writers build on:
//! - Extended JSON encoding of whole documents (compact or tab-indented)
//! - Flat cell text for CSV columns
//! - The converter strategies both are built from

pub mod bson_utils;
pub mod json;

pub use bson_utils::{BsonConverter, CellConverter, ExtendedJsonConverter};
pub use json::JsonFormatter;
