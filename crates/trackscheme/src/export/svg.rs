//! SVG rendering of track schemes.
//!
//! The drawing has three layers, bottom to top: lane bands with the track
//! names, edges as straight lines between cell centers, and cells labeled
//! with their spot names. Cells are emitted in the position table's z-order.

use log::debug;
use svg::{self, node::element as svg_element};

use trackscheme_core::{geometry::GridGeometry, identifier::SpotId, lineage::LineageGraph};

use super::{Error, Exporter};
use crate::{Scheme, adapter::Placement, config::ExportConfig, layout::START_COLUMN};

const BACKGROUND_COLOR: &str = "white";
const LANE_COLORS: [&str; 2] = ["#f2f4f8", "#e6eaf2"];
const CELL_FILL: &str = "white";
const CELL_STROKE: &str = "#3b4a6b";
const EDGE_STROKE: &str = "#8a94a6";
const TEXT_COLOR: &str = "#1f2733";
const FONT_FAMILY: &str = "sans-serif";
const CELL_FONT_SIZE: f32 = 12.0;
const LANE_FONT_SIZE: f32 = 11.0;

/// Builder for [`Svg`].
#[derive(Debug, Default)]
pub struct SvgBuilder {
    config: ExportConfig,
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: &ExportConfig) -> Self {
        self.config = *config;
        self
    }

    pub fn build(self) -> Svg {
        Svg {
            config: self.config,
        }
    }
}

/// SVG exporter.
#[derive(Debug)]
pub struct Svg {
    config: ExportConfig,
}

impl Svg {
    /// Renders `scheme` to an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if a spot or an edge endpoint has no
    /// placement.
    pub fn render_scheme(&self, scheme: &Scheme<'_>) -> Result<svg::Document, Error> {
        let geometry = scheme.geometry();
        let margin = self.config.margin();

        let columns = scheme.column_count();
        let rows = scheme.outcome().row_lengths().len();
        let min_x = geometry.column_left(START_COLUMN);
        let content_width = geometry.column_left(columns) - min_x;
        let content_height = geometry.rows_height(rows);

        let width = content_width + 2.0 * margin;
        let height = content_height + 2.0 * margin;

        let doc = svg::Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);
        let background = svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", width)
            .set("height", height)
            .set("fill", BACKGROUND_COLOR);
        let doc = doc.add(background);

        let mut main_group = svg_element::Group::new().set(
            "transform",
            format!("translate({}, {})", margin - min_x, margin),
        );

        if self.config.show_lanes() {
            main_group = main_group.add(self.render_lanes(scheme, content_height));
        }
        main_group = main_group.add(self.render_edges(scheme)?);
        main_group = main_group.add(self.render_cells(scheme, geometry)?);

        debug!(columns, rows, width, height; "SVG document rendered");
        Ok(doc.add(main_group))
    }

    fn render_lanes(&self, scheme: &Scheme<'_>, height: f32) -> svg_element::Group {
        let geometry = scheme.geometry();
        let mut group = svg_element::Group::new().set("class", "lanes");

        for (idx, lane) in scheme.lane_bounds().iter().enumerate() {
            let x = lane.x(geometry);
            let lane_width = lane.pixel_width(geometry);
            let band = svg_element::Rectangle::new()
                .set("x", x)
                .set("y", 0)
                .set("width", lane_width)
                .set("height", height)
                .set("fill", LANE_COLORS[idx % LANE_COLORS.len()]);
            group = group.add(band);

            let Some(track) = scheme.model().track(lane.track()) else {
                continue;
            };
            let label = svg_element::Text::new(track.name())
                .set("x", x + lane_width / 2.0)
                .set("y", LANE_FONT_SIZE + 2.0)
                .set("text-anchor", "middle")
                .set("font-family", FONT_FAMILY)
                .set("font-size", LANE_FONT_SIZE)
                .set("fill", TEXT_COLOR);
            group = group.add(label);
        }

        group
    }

    fn render_edges(&self, scheme: &Scheme<'_>) -> Result<svg_element::Group, Error> {
        let geometry = scheme.geometry();
        let mut group = svg_element::Group::new()
            .set("class", "edges")
            .set("stroke", EDGE_STROKE)
            .set("stroke-width", 1.5);

        for edge in scheme.model().edges() {
            let (source, target) = edge.endpoints();
            let from = geometry.cell_center(placement_of(scheme, source)?.grid());
            let to = geometry.cell_center(placement_of(scheme, target)?.grid());
            let line = svg_element::Line::new()
                .set("x1", from.x())
                .set("y1", from.y())
                .set("x2", to.x())
                .set("y2", to.y());
            group = group.add(line);
        }

        Ok(group)
    }

    fn render_cells(
        &self,
        scheme: &Scheme<'_>,
        geometry: &GridGeometry,
    ) -> Result<svg_element::Group, Error> {
        let mut group = svg_element::Group::new().set("class", "cells");

        for spot_id in scheme.positions().z_order() {
            let placement = placement_of(scheme, spot_id)?;
            let origin = placement.origin();
            let mut cell = svg_element::Group::new().set("id", format!("spot-{}", spot_id.get()));

            let rect = svg_element::Rectangle::new()
                .set("x", origin.x())
                .set("y", origin.y())
                .set("width", geometry.cell_width())
                .set("height", geometry.cell_height())
                .set("rx", 6)
                .set("fill", CELL_FILL)
                .set("stroke", CELL_STROKE);
            cell = cell.add(rect);

            let label = scheme
                .model()
                .spot(spot_id)
                .filter(|_| self.config.show_names());
            if let Some(spot) = label {
                let center = geometry.cell_center(placement.grid());
                let text = svg_element::Text::new(spot.name())
                    .set("x", center.x())
                    .set("y", center.y())
                    .set("text-anchor", "middle")
                    .set("dominant-baseline", "middle")
                    .set("font-family", FONT_FAMILY)
                    .set("font-size", CELL_FONT_SIZE)
                    .set("fill", TEXT_COLOR);
                cell = cell.add(text);
            }

            group = group.add(cell);
        }

        Ok(group)
    }
}

impl Exporter for Svg {
    fn export_scheme(&mut self, scheme: &Scheme<'_>) -> Result<String, Error> {
        let spots = scheme.model().spot_count();
        let placed = scheme.positions().placements().count();
        if placed < spots {
            return Err(Error::Render(format!(
                "{} of {spots} spots have no placement",
                spots - placed
            )));
        }
        Ok(self.render_scheme(scheme)?.to_string())
    }
}

fn placement_of(scheme: &Scheme<'_>, spot: SpotId) -> Result<Placement, Error> {
    scheme
        .placement(spot)
        .ok_or_else(|| Error::Render(format!("spot {spot} has no placement")))
}
