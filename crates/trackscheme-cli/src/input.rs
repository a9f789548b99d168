//! Lineage input files.
//!
//! A lineage file is TOML with three optional arrays of tables:
//!
//! ```toml
//! [[spots]]
//! id = 1
//! name = "mother"
//! frame = 0
//!
//! [[edges]]
//! source = 1
//! target = 2
//! weight = 1.0
//!
//! [[tracks]]
//! name = "Track_A"
//! spots = [1, 2]
//! ```
//!
//! Spots without a name are named after their ID. Connected spots that no
//! `[[tracks]]` entry claims are grouped into inferred tracks.

use std::{collections::BTreeMap, fs, io, path::Path};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use trackscheme::{
    TrackSchemeError,
    identifier::SpotId,
    lineage::LineageGraph,
    model::TrackModel,
    spot::Spot,
};

/// Errors reading a lineage file.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to parse lineage file: {0}")]
    Parse(String),
}

impl From<InputError> for TrackSchemeError {
    fn from(err: InputError) -> Self {
        TrackSchemeError::Io(io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LineageFile {
    #[serde(default)]
    spots: Vec<SpotEntry>,
    #[serde(default)]
    edges: Vec<EdgeEntry>,
    #[serde(default)]
    tracks: Vec<TrackEntry>,
}

#[derive(Debug, Deserialize)]
struct SpotEntry {
    id: u64,
    name: Option<String>,
    frame: usize,
    #[serde(default)]
    features: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct EdgeEntry {
    source: u64,
    target: u64,
    #[serde(default = "default_weight")]
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct TrackEntry {
    name: String,
    spots: Vec<u64>,
}

fn default_weight() -> f64 {
    1.0
}

/// Reads and validates the lineage file at `path`.
///
/// # Errors
///
/// Returns [`TrackSchemeError::Io`] if the file cannot be read or is not a
/// valid lineage file, and [`TrackSchemeError::Model`] if the lineage breaks
/// a model rule.
pub fn load_lineage(path: impl AsRef<Path>) -> Result<TrackModel, TrackSchemeError> {
    let path = path.as_ref();
    info!(path = path.display().to_string(); "Reading lineage");
    let content = fs::read_to_string(path)?;
    parse_lineage(&content)
}

/// Parses a lineage from TOML text.
///
/// # Errors
///
/// See [`load_lineage`].
pub fn parse_lineage(content: &str) -> Result<TrackModel, TrackSchemeError> {
    let file: LineageFile =
        toml::from_str(content).map_err(|e| InputError::Parse(e.to_string()))?;

    let mut builder = TrackModel::builder();
    for entry in file.spots {
        let id = SpotId::new(entry.id);
        let name = entry.name.unwrap_or_else(|| entry.id.to_string());
        let spot = entry
            .features
            .into_iter()
            .fold(Spot::new(id, name, entry.frame), |spot, (key, value)| {
                spot.with_feature(key, value)
            });
        builder.add_spot(spot)?;
    }
    for edge in file.edges {
        builder.add_edge(SpotId::new(edge.source), SpotId::new(edge.target), edge.weight)?;
    }
    for track in file.tracks {
        builder.add_track(track.name, track.spots.into_iter().map(SpotId::new))?;
    }

    let model = builder.build()?;
    debug!(
        spots = model.spot_count(),
        edges = model.edges().len(),
        tracks = model.track_count();
        "Lineage loaded"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use trackscheme::{ModelError, identifier::TrackId};

    use super::*;

    #[test]
    fn test_parse_full_lineage() {
        let model = parse_lineage(
            r#"
            [[spots]]
            id = 1
            name = "mother"
            frame = 0
            features = { area = 12.5 }

            [[spots]]
            id = 2
            frame = 1

            [[spots]]
            id = 3
            frame = 1

            [[edges]]
            source = 2
            target = 1

            [[tracks]]
            name = "Track_A"
            spots = [1, 2]
            "#,
        )
        .unwrap();

        assert_eq!(model.spot_count(), 3);
        assert_eq!(model.spot(SpotId::new(2)).unwrap().name(), "2");
        assert_eq!(model.spot(SpotId::new(1)).unwrap().feature("area"), Some(12.5));
        assert_eq!(model.edges()[0].source(), SpotId::new(1));
        assert_eq!(model.edges()[0].weight(), 1.0);
        assert_eq!(model.track_of(SpotId::new(2)), Some(TrackId::new(0)));
        assert_eq!(model.track_of(SpotId::new(3)), None);
    }

    #[test]
    fn test_empty_file_is_empty_lineage() {
        let model = parse_lineage("").unwrap();
        assert_eq!(model.spot_count(), 0);
    }

    #[test]
    fn test_malformed_file_rejected() {
        let err = parse_lineage("[[spots]]\nid = \"one\"\nframe = 0\n").unwrap_err();
        assert!(matches!(err, TrackSchemeError::Io(_)));
    }

    #[test]
    fn test_model_rule_violation_rejected() {
        let err = parse_lineage(
            r#"
            [[spots]]
            id = 1
            frame = 0

            [[spots]]
            id = 2
            frame = 0

            [[edges]]
            source = 1
            target = 2
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TrackSchemeError::Model(ModelError::NotTimeOriented { .. })
        ));
    }

    #[test]
    fn test_huge_frame_rejected() {
        let err =
            parse_lineage("[[spots]]\nid = 1\nframe = 9000000000000000000\n").unwrap_err();
        assert!(matches!(
            err,
            TrackSchemeError::Model(ModelError::FrameOutOfRange {
                frame: 9_000_000_000_000_000_000,
                ..
            })
        ));
    }
}
