//! CLI logic for the track scheme layout tool.
//!
//! Reads a lineage file, lays it out and writes the SVG drawing, plus an
//! optional TOML report of the layout tables.

pub mod error_adapter;
pub mod input;
pub mod report;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use trackscheme::{SchemeBuilder, TrackSchemeError};

/// Run the TrackScheme CLI application
///
/// Loads the configuration and the lineage, lays the lineage out and writes
/// the resulting SVG (and report, if requested).
///
/// # Errors
///
/// Returns `TrackSchemeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed or invalid lineages
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), TrackSchemeError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing lineage"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let model = input::load_lineage(&args.input)?;

    let builder = SchemeBuilder::new(app_config);
    let scheme = builder.layout(&model)?;
    let svg = builder.render_svg(&scheme)?;

    fs::write(&args.output, svg)?;
    info!(output_file = args.output; "SVG exported successfully");

    if let Some(report_path) = &args.report {
        report::write_report(&scheme, report_path)?;
    }

    Ok(())
}
