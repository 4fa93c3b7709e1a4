//! Core converter traits for BSON value conversion
//!
//! This module defines the traits that all BSON converters must implement.

use bson::{
    Binary, Bson, DateTime, Decimal128, Document, JavaScriptCodeWithScope, Regex, Timestamp,
    oid::ObjectId,
};
use serde_json::{Map, Value as JsonValue, json};

use crate::error::EncodingError;

/// Deepest nesting of documents and arrays the JSON converters will encode.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Core trait for BSON value conversion
///
/// This trait allows different conversion strategies to be implemented
/// for various output formats (string, JSON, etc.)
pub trait BsonConverter {
    /// Output type of the conversion
    type Output;

    /// Convert a BSON value to the output type
    ///
    /// # Arguments
    /// * `value` - BSON value to convert
    ///
    /// # Returns
    /// Converted value in the target format
    fn convert(&self, value: &Bson) -> Self::Output;

    /// Convert an optional BSON value
    ///
    /// `None` is an absent value and maps to the output's default.
    ///
    /// # Arguments
    /// * `value` - Optional BSON value to convert
    ///
    /// # Returns
    /// Converted value or default for None
    fn convert_optional(&self, value: Option<&Bson>) -> Self::Output
    where
        Self::Output: Default,
    {
        value.map(|v| self.convert(v)).unwrap_or_default()
    }
}

/// Trait for string-based BSON converters
///
/// Bare primitives get their own formatting hook; every other value goes
/// through `format_encoded`.
pub trait BsonStringConverter {
    fn format_string(&self, s: &str) -> String;
    fn format_int32(&self, n: i32) -> String;
    fn format_int64(&self, n: i64) -> String;
    fn format_double(&self, f: f64) -> String;
    fn format_boolean(&self, b: bool) -> String;
    fn format_encoded(&self, value: &Bson) -> String;

    /// Convert BSON value to string (provided implementation)
    fn convert_to_string(&self, value: &Bson) -> String {
        match value {
            Bson::String(s) => self.format_string(s),
            Bson::Int32(n) => self.format_int32(*n),
            Bson::Int64(n) => self.format_int64(*n),
            Bson::Double(f) => self.format_double(*f),
            Bson::Boolean(b) => self.format_boolean(*b),
            _ => self.format_encoded(value),
        }
    }
}

/// Trait for JSON conversion
///
/// Implementors decide how each scalar is tagged; traversal of documents and
/// arrays, and the nesting limit, are shared.
pub trait BsonJsonConverter {
    fn convert_int32(&self, n: i32) -> JsonValue;
    fn convert_int64(&self, n: i64) -> JsonValue;
    fn convert_double(&self, f: f64) -> JsonValue;
    fn convert_object_id(&self, oid: &ObjectId) -> JsonValue;
    fn convert_datetime(&self, dt: &DateTime) -> JsonValue;
    fn convert_decimal128(&self, d: &Decimal128) -> JsonValue;
    fn convert_binary(&self, bin: &Binary) -> JsonValue;
    fn convert_regex(&self, regex: &Regex) -> JsonValue;
    fn convert_timestamp(&self, ts: &Timestamp) -> JsonValue;

    /// Values with no dedicated hook (undefined, keys, code, symbols, pointers)
    fn convert_other(&self, value: &Bson) -> JsonValue;

    /// Convert BSON value to JSON (provided implementation)
    fn convert_to_json(&self, value: &Bson) -> Result<JsonValue, EncodingError> {
        self.convert_at_depth(value, 0)
    }

    /// Convert a whole document to a JSON object
    fn convert_document_to_json(&self, doc: &Document) -> Result<JsonValue, EncodingError> {
        self.convert_document_at_depth(doc, 0)
    }

    fn convert_at_depth(&self, value: &Bson, depth: usize) -> Result<JsonValue, EncodingError> {
        let json = match value {
            Bson::String(s) => JsonValue::String(s.clone()),
            Bson::Boolean(b) => JsonValue::Bool(*b),
            Bson::Null => JsonValue::Null,
            Bson::Int32(n) => self.convert_int32(*n),
            Bson::Int64(n) => self.convert_int64(*n),
            Bson::Double(f) => self.convert_double(*f),
            Bson::ObjectId(oid) => self.convert_object_id(oid),
            Bson::DateTime(dt) => self.convert_datetime(dt),
            Bson::Decimal128(d) => self.convert_decimal128(d),
            Bson::Binary(bin) => self.convert_binary(bin),
            Bson::RegularExpression(regex) => self.convert_regex(regex),
            Bson::Timestamp(ts) => self.convert_timestamp(ts),
            Bson::Document(doc) => self.convert_document_at_depth(doc, depth)?,
            Bson::Array(arr) => {
                check_depth(depth)?;
                let items = arr
                    .iter()
                    .map(|v| self.convert_at_depth(v, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                JsonValue::Array(items)
            }
            Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope { code, scope }) => {
                json!({
                    "$code": code,
                    "$scope": self.convert_document_at_depth(scope, depth + 1)?,
                })
            }
            _ => self.convert_other(value),
        };
        Ok(json)
    }

    fn convert_document_at_depth(
        &self,
        doc: &Document,
        depth: usize,
    ) -> Result<JsonValue, EncodingError> {
        check_depth(depth)?;
        let mut map = Map::with_capacity(doc.len());
        for (key, value) in doc.iter() {
            map.insert(key.clone(), self.convert_at_depth(value, depth + 1)?);
        }
        Ok(JsonValue::Object(map))
    }
}

fn check_depth(depth: usize) -> Result<(), EncodingError> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(EncodingError::NestingTooDeep {
            depth: MAX_NESTING_DEPTH,
        });
    }
    Ok(())
}
