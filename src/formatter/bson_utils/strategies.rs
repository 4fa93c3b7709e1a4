//! Strategy implementations for BSON conversion
//!
//! This module provides concrete implementations of the converter traits:
//! - ExtendedJsonConverter: tagged Extended JSON values (relaxed or canonical)
//! - CellConverter: flat text for CSV cells

use bson::{Binary, Bson, DateTime, Decimal128, Regex, Timestamp, oid::ObjectId};
use serde_json::{Value as JsonValue, json};
use tracing::warn;

use super::converter::{BsonConverter, BsonJsonConverter, BsonStringConverter};
use super::helpers::*;
use crate::config::JsonMode;
use crate::error::EncodingError;

/// Extended JSON converter
///
/// Plain scalars become native JSON tokens; every type JSON cannot carry
/// losslessly becomes a single-key tagging object such as `{"$oid": "..."}`.
///
/// In relaxed mode 32-bit integers and finite doubles stay native while
/// 64-bit integers keep their `$numberLong` wrapper, so integer width
/// survives a round trip. Canonical mode wraps every number.
#[derive(Debug, Clone, Copy)]
pub struct ExtendedJsonConverter {
    mode: JsonMode,
}

impl ExtendedJsonConverter {
    /// Create a new converter for the given mode
    pub fn new(mode: JsonMode) -> Self {
        Self { mode }
    }

    /// Relaxed-mode converter
    pub fn relaxed() -> Self {
        Self::new(JsonMode::Relaxed)
    }

    /// Canonical-mode converter
    pub fn canonical() -> Self {
        Self::new(JsonMode::Canonical)
    }

    fn is_canonical(&self) -> bool {
        self.mode == JsonMode::Canonical
    }
}

impl Default for ExtendedJsonConverter {
    fn default() -> Self {
        Self::relaxed()
    }
}

impl BsonConverter for ExtendedJsonConverter {
    type Output = Result<JsonValue, EncodingError>;

    fn convert(&self, value: &Bson) -> Self::Output {
        self.convert_to_json(value)
    }
}

impl BsonJsonConverter for ExtendedJsonConverter {
    fn convert_int32(&self, n: i32) -> JsonValue {
        if self.is_canonical() {
            json!({ "$numberInt": n.to_string() })
        } else {
            JsonValue::Number(n.into())
        }
    }

    fn convert_int64(&self, n: i64) -> JsonValue {
        json!({ "$numberLong": n.to_string() })
    }

    fn convert_double(&self, f: f64) -> JsonValue {
        if !self.is_canonical() {
            if let Some(number) = serde_json::Number::from_f64(f) {
                return JsonValue::Number(number);
            }
        }
        json!({ "$numberDouble": canonical_double(f) })
    }

    fn convert_object_id(&self, oid: &ObjectId) -> JsonValue {
        json!({ "$oid": oid.to_hex() })
    }

    fn convert_datetime(&self, dt: &DateTime) -> JsonValue {
        if !self.is_canonical() {
            if let Some(iso) = datetime_to_iso_string(dt) {
                return json!({ "$date": iso });
            }
        }
        json!({ "$date": { "$numberLong": dt.timestamp_millis().to_string() } })
    }

    fn convert_decimal128(&self, d: &Decimal128) -> JsonValue {
        json!({ "$numberDecimal": d.to_string() })
    }

    fn convert_binary(&self, bin: &Binary) -> JsonValue {
        json!({
            "$binary": {
                "base64": binary_to_base64(bin),
                "subType": binary_subtype_hex(bin.subtype),
            }
        })
    }

    fn convert_regex(&self, regex: &Regex) -> JsonValue {
        json!({
            "$regularExpression": {
                "pattern": regex.pattern,
                "options": regex.options,
            }
        })
    }

    fn convert_timestamp(&self, ts: &Timestamp) -> JsonValue {
        json!({ "$timestamp": { "t": ts.time, "i": ts.increment } })
    }

    fn convert_other(&self, value: &Bson) -> JsonValue {
        match value {
            Bson::Symbol(s) => json!({ "$symbol": s }),
            Bson::JavaScriptCode(code) => json!({ "$code": code }),
            Bson::Undefined => json!({ "$undefined": true }),
            Bson::MinKey => json!({ "$minKey": 1 }),
            Bson::MaxKey => json!({ "$maxKey": 1 }),
            // DbPointer keeps its fields private; the bson crate spells it for us.
            other => other.clone().into_canonical_extjson(),
        }
    }
}

/// Converter for CSV cells
///
/// Strings, numbers and booleans print as themselves. Anything else,
/// including a present `null`, is re-encoded as compact Extended JSON so
/// the cell stays self-describing. A value that fails to encode yields an
/// empty cell rather than failing the row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellConverter {
    json: ExtendedJsonConverter,
}

impl CellConverter {
    /// Create a new cell converter that encodes compound values in `mode`
    pub fn new(mode: JsonMode) -> Self {
        Self {
            json: ExtendedJsonConverter::new(mode),
        }
    }
}

impl BsonConverter for CellConverter {
    type Output = String;

    fn convert(&self, value: &Bson) -> String {
        self.convert_to_string(value)
    }
}

impl BsonStringConverter for CellConverter {
    fn format_string(&self, s: &str) -> String {
        s.to_string()
    }

    fn format_int32(&self, n: i32) -> String {
        n.to_string()
    }

    fn format_int64(&self, n: i64) -> String {
        n.to_string()
    }

    fn format_double(&self, f: f64) -> String {
        f.to_string()
    }

    fn format_boolean(&self, b: bool) -> String {
        b.to_string()
    }

    fn format_encoded(&self, value: &Bson) -> String {
        match self.json.convert_to_json(value) {
            Ok(json) => json.to_string(),
            Err(e) => {
                warn!("Leaving CSV cell empty: {}", e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_cell_converter_primitives() {
        let converter = CellConverter::default();
        assert_eq!(converter.convert(&Bson::String("test".to_string())), "test");
        assert_eq!(converter.convert(&Bson::Int32(42)), "42");
        assert_eq!(converter.convert(&Bson::Int64(100)), "100");
        assert_eq!(converter.convert(&Bson::Double(42.0)), "42");
        assert_eq!(converter.convert(&Bson::Double(2.5)), "2.5");
        assert_eq!(converter.convert(&Bson::Boolean(true)), "true");
    }

    #[test]
    fn test_cell_converter_absent_vs_null() {
        let converter = CellConverter::default();
        assert_eq!(converter.convert_optional(None), "");
        assert_eq!(converter.convert_optional(Some(&Bson::Null)), "null");
    }

    #[test]
    fn test_cell_converter_compound() {
        let converter = CellConverter::default();
        let tags = Bson::Array(vec![Bson::from("a"), Bson::from("b")]);
        assert_eq!(converter.convert(&tags), r#"["a","b"]"#);

        let nested = Bson::Document(doc! { "city": "Boston", "zip": 2134 });
        assert_eq!(converter.convert(&nested), r#"{"city":"Boston","zip":2134}"#);
    }

    #[test]
    fn test_extended_json_relaxed_numbers() {
        let converter = ExtendedJsonConverter::relaxed();
        assert_eq!(converter.convert(&Bson::Int32(7)).unwrap(), json!(7));
        assert_eq!(
            converter.convert(&Bson::Int64(7)).unwrap(),
            json!({ "$numberLong": "7" })
        );
        assert_eq!(converter.convert(&Bson::Double(3.5)).unwrap(), json!(3.5));
    }

    #[test]
    fn test_extended_json_canonical_numbers() {
        let converter = ExtendedJsonConverter::canonical();
        assert_eq!(
            converter.convert(&Bson::Int32(7)).unwrap(),
            json!({ "$numberInt": "7" })
        );
        assert_eq!(
            converter.convert(&Bson::Double(1.0)).unwrap(),
            json!({ "$numberDouble": "1.0" })
        );
    }
}
