//! Export of laid-out track schemes.
//!
//! The [`Exporter`] trait turns a [`Scheme`] into an output document. It is
//! the last stage of the pipeline:
//!
//! ```text
//! Lineage model
//!     ↓ layout
//! Scheme (placements + lane tables)
//!     ↓ export (this module)
//! Output document
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] — SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]

/// SVG export backend.
pub mod svg;

use thiserror::Error;

use crate::Scheme;

/// Abstraction for scheme export backends.
pub trait Exporter {
    /// Renders `scheme` to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the scheme cannot be converted, for
    /// instance when a spot has no placement.
    fn export_scheme(&mut self, scheme: &Scheme<'_>) -> Result<String, Error>;
}

/// Errors that can occur during export.
///
/// Converted into [`TrackSchemeError::Export`](crate::TrackSchemeError::Export)
/// at the crate boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Render error: {0}")]
    Render(String),
}
