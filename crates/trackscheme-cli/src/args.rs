//! Command-line argument definitions for the TrackScheme CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the optional layout
//! report, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the track scheme layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input lineage file (TOML)
    #[arg(help = "Path to the input lineage file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path of a TOML report listing every placement and the layout tables
    #[arg(short, long)]
    pub report: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
