//! Configuration management for mongoexport
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration files (TOML format)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values
//!
//! An [`ExportConfig`] is read-only once an export output has been built from it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Export-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format (csv, json)
    #[serde(default = "default_format")]
    pub format: ExportFormat,

    /// Dotted field paths to extract, in column order (CSV only)
    #[serde(default)]
    pub fields: Vec<String>,

    /// Skip the header row (CSV only)
    #[serde(default)]
    pub no_header_line: bool,

    /// Wrap all documents in a single JSON array (JSON only)
    #[serde(default)]
    pub json_array: bool,

    /// Tab-indent each document (JSON only)
    #[serde(default)]
    pub pretty: bool,

    /// Extended JSON flavour used for documents and CSV compound cells
    #[serde(default)]
    pub json_mode: JsonMode,

    /// Column delimiter (CSV only)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

/// Output format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Delimited rows, one per document, with columns chosen by field path
    Csv,

    /// Extended JSON, one document per line or wrapped in an array
    Json,
}

/// Extended JSON flavours
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JsonMode {
    /// Native JSON numbers and ISO dates where no precision is lost
    ///
    /// Example: `{"n": 1, "l": {"$numberLong": "1"}, "d": {"$date": "2024-01-01T00:00:00.000Z"}}`
    #[default]
    Relaxed,

    /// Every number and date wrapped in its type tag
    ///
    /// Example: `{"n": {"$numberInt": "1"}}`
    Canonical,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_format() -> ExportFormat {
    ExportFormat::Json
}

fn default_delimiter() -> char {
    ','
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            fields: Vec::new(),
            no_header_line: false,
            json_array: false,
            pretty: false,
            json_mode: JsonMode::default(),
            delimiter: default_delimiter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        debug!("Loaded config file: {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Load the configuration file at `path`, or the default location
    ///
    /// A missing file at the default location is not an error; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mongoexport")
            .join("config.toml")
    }
}

impl ExportConfig {
    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        match self.format {
            ExportFormat::Csv => {
                if self.fields.is_empty() {
                    return Err(ConfigError::MissingField(
                        "fields (CSV export requires a field list)".to_string(),
                    )
                    .into());
                }
                csv_delimiter(self.delimiter)?;
                if self.json_array || self.pretty {
                    warn!("json_array and pretty have no effect on CSV output");
                }
            }
            ExportFormat::Json => {
                if !self.fields.is_empty() {
                    debug!("Field list ignored for JSON output; whole documents are exported");
                }
            }
        }
        Ok(())
    }
}

/// Check a CSV delimiter and return it as the single byte written between fields
///
/// Only ASCII characters other than `"`, `\r` and `\n` are accepted.
pub fn csv_delimiter(delimiter: char) -> Result<u8> {
    match u8::try_from(delimiter) {
        Ok(byte) if byte.is_ascii() && !matches!(byte, b'"' | b'\r' | b'\n') => Ok(byte),
        _ => Err(ConfigError::InvalidValue {
            field: "delimiter".to_string(),
            value: delimiter.escape_default().to_string(),
        }
        .into()),
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.export.format, ExportFormat::Json);
        assert_eq!(config.export.json_mode, JsonMode::Relaxed);
        assert_eq!(config.export.delimiter, ',');
        assert!(!config.export.json_array);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_from_toml_str() {
        let config = Config::from_toml_str(
            r#"
            [export]
            format = "csv"
            fields = ["name", "addresses.0.city"]
            no_header_line = true
            delimiter = ";"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.export.format, ExportFormat::Csv);
        assert_eq!(config.export.fields, vec!["name", "addresses.0.city"]);
        assert!(config.export.no_header_line);
        assert_eq!(csv_delimiter(config.export.delimiter).unwrap(), b';');
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.export.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[export]\nformat = \"xml\"").unwrap_err();
        assert!(matches!(err, ExportError::Config(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/mongoexport.toml").unwrap_err();
        assert!(matches!(err, ExportError::Config(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_requires_fields() {
        let config = ExportConfig {
            format: ExportFormat::Csv,
            ..ExportConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ExportError::Config(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_csv_rejects_quote_delimiter() {
        let config = ExportConfig {
            format: ExportFormat::Csv,
            fields: vec!["a".to_string()],
            delimiter: '"',
            ..ExportConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ExportConfig {
            delimiter: 'é',
            ..config
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
    }
}
