//! TrackScheme - lane layout of cell-tracking lineages.
//!
//! Every spot of a lineage is assigned a column and a row: rows are frames,
//! and each track gets its own band of columns. The layout can be consumed
//! as a [`adapter::PositionTable`] or rendered to SVG.

pub mod adapter;
pub mod branches;
pub mod config;
pub mod export;
pub mod layout;
pub mod neighbors;
pub mod width;

mod error;

pub use trackscheme_core::{ModelError, geometry, identifier, lineage, model, spot};

pub use error::TrackSchemeError;

use std::ops::Range;

use log::{debug, info, trace};

use trackscheme_core::{
    geometry::GridGeometry,
    identifier::{SpotId, TrackId},
    lineage::LineageGraph,
    model::TrackModel,
};

use adapter::{Placement, PositionTable};
use config::AppConfig;
use export::Exporter;
use layout::{LayoutOutcome, START_COLUMN, SchemeLayout};

/// Builder for laying out and rendering track schemes.
///
/// # Examples
///
/// ```
/// use trackscheme::{SchemeBuilder, identifier::SpotId, model::TrackModel, spot::Spot};
///
/// let mut lineage = TrackModel::builder();
/// lineage.add_spot(Spot::new(SpotId::new(1), "A", 0)).unwrap();
/// lineage.add_spot(Spot::new(SpotId::new(2), "B", 1)).unwrap();
/// lineage.add_edge(SpotId::new(1), SpotId::new(2), 1.0).unwrap();
/// let model = lineage.build().unwrap();
///
/// let builder = SchemeBuilder::default();
/// let scheme = builder.layout(&model).unwrap();
/// assert_eq!(scheme.outcome().column_widths(), &[1]);
///
/// let svg = builder.render_svg(&scheme).unwrap();
/// assert!(svg.contains("<svg"));
/// ```
#[derive(Debug, Default)]
pub struct SchemeBuilder {
    config: AppConfig,
}

impl SchemeBuilder {
    /// Creates a builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs one layout pass over `model`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackSchemeError::Config`] for an unusable geometry and
    /// [`TrackSchemeError::Layout`] if the pass fails.
    pub fn layout<'m>(&self, model: &'m TrackModel) -> Result<Scheme<'m>, TrackSchemeError> {
        self.config
            .geometry()
            .validate()
            .map_err(TrackSchemeError::Config)?;
        let geometry = self.config.geometry().to_grid();

        info!(
            spots = model.spot_count(),
            tracks = model.track_count();
            "Laying out track scheme"
        );
        let mut positions = PositionTable::new();
        let outcome = SchemeLayout::new(geometry).run(model, &mut positions)?;
        debug!(
            placed = positions.len(),
            elapsed_us = outcome.elapsed().as_micros() as u64;
            "Layout calculated"
        );
        trace!(outcome:?; "Layout tables");

        Ok(Scheme {
            model,
            positions,
            outcome,
            geometry,
        })
    }

    /// Renders a laid-out scheme to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`TrackSchemeError::Export`] if a spot of the model has no
    /// placement.
    pub fn render_svg(&self, scheme: &Scheme<'_>) -> Result<String, TrackSchemeError> {
        let mut exporter = export::svg::SvgBuilder::new()
            .with_config(self.config.export())
            .build();
        let svg = exporter.export_scheme(scheme)?;

        info!(bytes = svg.len(); "SVG rendered successfully");
        Ok(svg)
    }
}

/// Result of laying out one lineage model.
#[derive(Debug)]
pub struct Scheme<'m> {
    model: &'m TrackModel,
    positions: PositionTable,
    outcome: LayoutOutcome,
    geometry: GridGeometry,
}

impl<'m> Scheme<'m> {
    pub fn model(&self) -> &'m TrackModel {
        self.model
    }

    pub fn positions(&self) -> &PositionTable {
        &self.positions
    }

    pub fn outcome(&self) -> &LayoutOutcome {
        &self.outcome
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn placement(&self, spot: SpotId) -> Option<Placement> {
        self.positions.placement(spot)
    }

    /// Column bands of the tracks, in layout order.
    ///
    /// Lanes tile the grid from [`START_COLUMN`] without gaps. Every lane
    /// after the first opens with the empty column that separates it from the
    /// previous track.
    pub fn lane_bounds(&self) -> Vec<Lane> {
        let mut first_column = START_COLUMN;
        self.outcome
            .column_track_ids()
            .iter()
            .zip(self.outcome.column_widths())
            .map(|(&track, &width)| {
                let lane = Lane {
                    track,
                    first_column,
                    width,
                };
                first_column += width;
                lane
            })
            .collect()
    }

    /// Number of columns needed to show every placed spot and every lane.
    pub fn column_count(&self) -> usize {
        let lanes_end = self
            .lane_bounds()
            .last()
            .map_or(START_COLUMN, |lane| lane.columns().end);
        let rows_end = self
            .outcome
            .row_lengths()
            .iter()
            .copied()
            .max()
            .unwrap_or(START_COLUMN);
        lanes_end.max(rows_end)
    }
}

/// Column band of one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lane {
    track: TrackId,
    first_column: usize,
    width: usize,
}

impl Lane {
    pub fn track(&self) -> TrackId {
        self.track
    }

    pub fn first_column(&self) -> usize {
        self.first_column
    }

    /// Width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn columns(&self) -> Range<usize> {
        self.first_column..self.first_column + self.width
    }

    /// Left edge of the lane, in pixels.
    pub fn x(&self, geometry: &GridGeometry) -> f32 {
        geometry.column_left(self.first_column)
    }

    /// Width of the lane, in pixels.
    pub fn pixel_width(&self, geometry: &GridGeometry) -> f32 {
        self.width as f32 * geometry.column_width()
    }
}
