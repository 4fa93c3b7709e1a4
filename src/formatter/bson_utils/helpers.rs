//! Helper functions for BSON value conversion
//!
//! This module provides common utility functions used by various BSON converters.

use bson::{Binary, DateTime, spec::BinarySubtype};
use chrono::{Datelike, SecondsFormat, Utc};

/// Convert DateTime to an ISO 8601 string with millisecond precision
///
/// Only dates between 1970 and 9999 have an ISO form in relaxed Extended
/// JSON; anything else returns `None`.
///
/// # Arguments
/// * `dt` - BSON DateTime value
///
/// # Returns
/// ISO 8601 formatted string, e.g. `2023-12-06T11:39:48.373Z`
pub fn datetime_to_iso_string(dt: &DateTime) -> Option<String> {
    let millis = dt.timestamp_millis();
    if millis < 0 {
        return None;
    }
    let utc = chrono::DateTime::<Utc>::from_timestamp_millis(millis)?;
    if utc.year() > 9999 {
        return None;
    }
    Some(utc.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Convert Binary data to Base64 string
///
/// # Arguments
/// * `bin` - BSON Binary value
///
/// # Returns
/// Base64 encoded string
pub fn binary_to_base64(bin: &Binary) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(&bin.bytes)
}

/// Convert BinarySubtype to its two-digit hex form (`"00"`, `"04"`, `"80"`)
pub fn binary_subtype_hex(subtype: BinarySubtype) -> String {
    hex::encode([u8::from(subtype)])
}

/// Format a double the way canonical Extended JSON spells it
///
/// Integral values keep a `.0` suffix so they never read back as integers.
pub fn canonical_double(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{f:?}")
    }
}
