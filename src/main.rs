//! mongoexport - Rust Edition
//!
//! Exports BSON documents to CSV or MongoDB Extended JSON.
//!
//! # Usage
//!
//! ```bash
//! # Extended JSON array, tab-indented
//! mongoexport --json-array --pretty -i docs.json -o out.json
//!
//! # CSV with selected (possibly nested) fields
//! mongoexport --type csv -f name,addresses.0.city < docs.json
//! ```

use std::io::Write;

use tracing::{debug, info};

use mongoexport::cli::CliInterface;
use mongoexport::error::Result;
use mongoexport::export::create_output;
use mongoexport::input::DocumentReader;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// This function orchestrates the export:
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Stream documents from the input through the export output
///
/// # Returns
/// * `Result<()>` - Success or error
fn run() -> Result<()> {
    let cli = CliInterface::new()?;
    initialize_logging(&cli);
    debug!("Effective configuration: {:?}", cli.config());

    let input = cli.open_input()?;
    let mut sink = cli.open_output()?;

    let exported = {
        let mut output = create_output(&cli.config().export, &mut sink)?;
        output.write_header()?;
        for doc in DocumentReader::new(input) {
            output.export_document(&doc?)?;
        }
        output.write_footer()?;
        output.flush()?;
        output.num_exported()
    };
    sink.flush()?;

    info!("exported {} record(s)", exported);
    Ok(())
}

/// Initialize logging on stderr so stdout carries only exported data
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
