//! Error types for track scheme operations.
//!
//! [`TrackSchemeError`] wraps every failure the facade can report: invalid
//! lineage models, failed layout passes, export failures and configuration
//! problems.

use std::io;

use thiserror::Error;

use trackscheme_core::ModelError;

use crate::{export, layout::LayoutError};

/// The main error type for track scheme operations.
#[derive(Debug, Error)]
pub enum TrackSchemeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid lineage: {0}")]
    Model(#[from] ModelError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Export error: {0}")]
    Export(#[from] export::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
