//! Dotted field paths
//!
//! A path such as `addresses.0.city` is split on `.` and resolved strictly
//! left to right. Each segment is a field name when the current value is a
//! document and an index when it is an array. Any miss resolves to `None`
//! (absent), which is distinct from a present `Bson::Null`.

use std::fmt;
use std::fs;
use std::path::Path;

use bson::{Bson, Document};

use crate::error::{ConfigError, Result};

/// Immutable sequence of path segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Split a dotted path into segments
    pub fn parse(path: &str) -> Self {
        Self {
            raw: path.to_string(),
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolve this path against a document
    ///
    /// # Returns
    /// * `Option<&Bson>` - Addressed value, or `None` when any segment misses
    pub fn resolve<'a>(&self, doc: &'a Document) -> Option<&'a Bson> {
        let (first, rest) = self.segments.split_first()?;
        let start = doc.get(first)?;
        walk(start, rest)
    }

    /// Resolve this path against an arbitrary value
    pub fn resolve_value<'a>(&self, value: &'a Bson) -> Option<&'a Bson> {
        walk(value, &self.segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

fn walk<'a>(mut current: &'a Bson, segments: &[String]) -> Option<&'a Bson> {
    for segment in segments {
        current = step(current, segment)?;
    }
    Some(current)
}

/// Descend one segment
///
/// Documents are ordered name/value sequences, so a named lookup is the
/// only way into them. Arrays are positional. Scalars cannot be entered.
fn step<'a>(current: &'a Bson, segment: &str) -> Option<&'a Bson> {
    match current {
        Bson::Document(doc) => doc.get(segment),
        Bson::Array(items) => {
            let index: usize = segment.parse().ok()?;
            items.get(index)
        }
        _ => None,
    }
}

/// Split a comma-separated field list, trimming whitespace and dropping empties
pub fn parse_field_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read one field path per line from a file
///
/// Blank lines and lines starting with `#` are skipped.
pub fn read_field_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
    Ok(field_file_lines(&content))
}

fn field_file_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
