//! Layout report written next to the SVG output.

use std::{fs, path::Path};

use log::info;
use serde::Serialize;

use trackscheme::{Scheme, TrackSchemeError, export, lineage::LineageGraph};

#[derive(Debug, Serialize)]
struct LayoutReport {
    processing_time_ms: f64,
    row_lengths: Vec<usize>,
    column_widths: Vec<usize>,
    column_track_ids: Vec<u32>,
    lanes: Vec<LaneEntry>,
    placements: Vec<PlacementEntry>,
}

#[derive(Debug, Serialize)]
struct LaneEntry {
    track: u32,
    name: String,
    first_column: usize,
    width: usize,
}

#[derive(Debug, Serialize)]
struct PlacementEntry {
    spot: u64,
    name: String,
    column: usize,
    row: usize,
    x: f32,
    y: f32,
}

/// Renders the layout tables and every placement of `scheme` as TOML.
///
/// # Errors
///
/// Returns [`TrackSchemeError::Export`] if the report cannot be serialized.
pub fn render_report(scheme: &Scheme<'_>) -> Result<String, TrackSchemeError> {
    let model = scheme.model();
    let outcome = scheme.outcome();

    let lanes = scheme
        .lane_bounds()
        .into_iter()
        .map(|lane| LaneEntry {
            track: lane.track().get(),
            name: model
                .track(lane.track())
                .map(|track| track.name().to_string())
                .unwrap_or_default(),
            first_column: lane.first_column(),
            width: lane.width(),
        })
        .collect();

    let placements = scheme
        .positions()
        .placements()
        .map(|(spot, placement)| PlacementEntry {
            spot: spot.get(),
            name: model
                .spot(spot)
                .map(|spot| spot.name().to_string())
                .unwrap_or_default(),
            column: placement.column(),
            row: placement.row(),
            x: placement.origin().x(),
            y: placement.origin().y(),
        })
        .collect();

    let report = LayoutReport {
        processing_time_ms: outcome.elapsed().as_secs_f64() * 1000.0,
        row_lengths: outcome.row_lengths().to_vec(),
        column_widths: outcome.column_widths().to_vec(),
        column_track_ids: outcome.column_track_ids().iter().map(|id| id.get()).collect(),
        lanes,
        placements,
    };

    toml::to_string(&report)
        .map_err(|err| export::Error::Render(format!("layout report: {err}")).into())
}

/// Writes the report of `scheme` to `path`.
///
/// # Errors
///
/// Returns [`TrackSchemeError::Io`] if the file cannot be written.
pub fn write_report(scheme: &Scheme<'_>, path: impl AsRef<Path>) -> Result<(), TrackSchemeError> {
    let path = path.as_ref();
    fs::write(path, render_report(scheme)?)?;
    info!(report_file = path.display().to_string(); "Layout report written");
    Ok(())
}
