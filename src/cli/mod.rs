//! Command-line interface for mongoexport
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and merging with arguments
//! - Opening the input and output streams the exporter runs over

use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, ExportFormat, JsonMode, LogLevel};
use crate::error::{ConfigError, Result};
use crate::export::{parse_field_list, read_field_file};

/// Export BSON documents as CSV or Extended JSON
#[derive(Parser, Debug)]
#[command(
    name = "mongoexport",
    version,
    about = "Export documents to CSV or MongoDB Extended JSON",
    long_about = "Reads newline-delimited Extended JSON documents and writes them as CSV rows
(one column per dotted field path) or as Extended JSON, one document per line or
wrapped in a single array."
)]
pub struct CliArgs {
    /// Output format (csv, json)
    #[arg(long = "type", value_name = "FORMAT")]
    pub export_type: Option<String>,

    /// Comma-separated field paths, e.g. name,addresses.0.city
    #[arg(short = 'f', long, value_name = "FIELDS")]
    pub fields: Option<String>,

    /// File with one field path per line
    #[arg(long, value_name = "FILE")]
    pub field_file: Option<PathBuf>,

    /// Export CSV without a header row
    #[arg(long)]
    pub no_header_line: bool,

    /// Wrap JSON output in a single array
    #[arg(long)]
    pub json_array: bool,

    /// Tab-indent JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Extended JSON flavour (relaxed, canonical)
    #[arg(long, value_name = "MODE")]
    pub json_format: Option<String>,

    /// CSV column delimiter
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Input file of newline-delimited Extended JSON (default: stdin)
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Effective configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already-parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Effective configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load(args.config_file.as_deref())?;
        Self::apply_args_to_config(&mut config, args)?;
        Ok(config)
    }

    /// Apply CLI arguments on top of configuration values
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) -> Result<()> {
        Self::apply_export_args(config, args)?;
        Self::apply_logging_args(config, args);
        Ok(())
    }

    /// Apply export-related CLI arguments to configuration
    fn apply_export_args(config: &mut Config, args: &CliArgs) -> Result<()> {
        let export = &mut config.export;

        if let Some(format_str) = &args.export_type {
            export.format = Self::parse_export_format(format_str)?;
        }
        if let Some(mode_str) = &args.json_format {
            export.json_mode = Self::parse_json_mode(mode_str)?;
        }

        if let Some(fields) = &args.fields {
            export.fields = parse_field_list(fields);
        } else if let Some(path) = &args.field_file {
            export.fields = read_field_file(path)?;
        }

        if let Some(delimiter) = args.delimiter {
            export.delimiter = delimiter;
        }

        export.no_header_line |= args.no_header_line;
        export.json_array |= args.json_array;
        export.pretty |= args.pretty;
        Ok(())
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Parse output format string
    fn parse_export_format(format_str: &str) -> Result<ExportFormat> {
        match format_str.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ConfigError::InvalidValue {
                field: "type".to_string(),
                value: other.to_string(),
            }
            .into()),
        }
    }

    /// Parse Extended JSON mode string
    fn parse_json_mode(mode_str: &str) -> Result<JsonMode> {
        match mode_str.to_lowercase().as_str() {
            "relaxed" => Ok(JsonMode::Relaxed),
            "canonical" => Ok(JsonMode::Canonical),
            other => Err(ConfigError::InvalidValue {
                field: "json-format".to_string(),
                value: other.to_string(),
            }
            .into()),
        }
    }

    /// Open the document source
    pub fn open_input(&self) -> Result<Box<dyn BufRead>> {
        match &self.args.input {
            Some(path) => Ok(Box::new(BufReader::new(open_file(path)?))),
            None => Ok(Box::new(io::stdin().lock())),
        }
    }

    /// Open the byte sink
    pub fn open_output(&self) -> Result<Box<dyn Write>> {
        match &self.args.output {
            Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
            None => Ok(Box::new(io::stdout().lock())),
        }
    }
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        crate::error::ExportError::Generic(format!(
            "Failed to open input file {}: {}",
            path.display(),
            e
        ))
    })
}
