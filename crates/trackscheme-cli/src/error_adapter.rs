//! Error adapter for converting TrackSchemeError to miette diagnostics.
//!
//! This module provides the bridge between the library's error type and
//! miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use trackscheme::{ModelError, TrackSchemeError};

/// Adapter giving a [`TrackSchemeError`] a diagnostic code and help text.
pub struct ErrorAdapter<'a>(pub &'a TrackSchemeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TrackSchemeError::Io(_) => "trackscheme::io",
            TrackSchemeError::Model(_) => "trackscheme::model",
            TrackSchemeError::Layout(_) => "trackscheme::layout",
            TrackSchemeError::Export(_) => "trackscheme::export",
            TrackSchemeError::Config(_) => "trackscheme::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            TrackSchemeError::Model(ModelError::NotTimeOriented { .. }) => {
                "edges must link spots in different frames"
            }
            TrackSchemeError::Model(ModelError::FrameOutOfRange { .. }) => {
                "frames are counted from 0 and must stay within the supported range"
            }
            TrackSchemeError::Model(
                ModelError::EdgeCrossesTracks { .. }
                | ModelError::DisconnectedTrack(_)
                | ModelError::SpotInTwoTracks { .. },
            ) => "every `[[tracks]]` entry must list exactly one connected lineage",
            TrackSchemeError::Model(_) => {
                "every spot needs a unique ID and every pair of spots at most one edge"
            }
            TrackSchemeError::Config(_) => {
                "geometry values are pixels and must be positive numbers"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Wraps a [`TrackSchemeError`] for rendering by miette.
pub fn to_reportable(err: &TrackSchemeError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}

#[cfg(test)]
mod tests {
    use trackscheme::identifier::SpotId;

    use super::*;

    #[test]
    fn test_model_error_has_code_and_help() {
        let err = TrackSchemeError::Model(ModelError::UnknownSpot(SpotId::new(7)));
        let reportable = to_reportable(&err);

        assert_eq!(reportable.to_string(), "Invalid lineage: spot #7 is not defined");
        assert_eq!(reportable.code().unwrap().to_string(), "trackscheme::model");
        assert!(reportable.help().is_some());
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = TrackSchemeError::Io(std::io::Error::other("disk full"));
        let reportable = to_reportable(&err);

        assert_eq!(reportable.code().unwrap().to_string(), "trackscheme::io");
        assert!(reportable.help().is_none());
    }

    #[test]
    fn test_renders_with_graphical_handler() {
        let err = TrackSchemeError::Config("Validation error: bad".to_string());
        let mut out = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &to_reportable(&err))
            .unwrap();

        assert!(out.contains("trackscheme::config"));
        assert!(out.contains("bad"));
    }
}
