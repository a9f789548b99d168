//! Configuration types for track scheme layout and export.
//!
//! All types implement [`serde::Deserialize`] so the CLI can load them from a
//! TOML file. Every field is optional and falls back to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining geometry and export settings.
//! - [`GeometryConfig`] - Column and row pitch and cell size, in pixels.
//! - [`ExportConfig`] - Options of the SVG output.
//!
//! # Example
//!
//! ```
//! # use trackscheme::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.geometry().to_grid().column_width(), 160.0);
//! ```

use serde::Deserialize;

use trackscheme_core::geometry::GridGeometry;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Grid geometry section.
    #[serde(default)]
    geometry: GeometryConfig,

    /// Export section.
    #[serde(default)]
    export: ExportConfig,
}

impl AppConfig {
    pub fn new(geometry: GeometryConfig, export: ExportConfig) -> Self {
        Self { geometry, export }
    }

    /// Returns the geometry configuration.
    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    /// Returns the export configuration.
    pub fn export(&self) -> &ExportConfig {
        &self.export
    }
}

/// Pixel geometry of the grid.
///
/// Converted into a [`GridGeometry`] before layout. Unset fields take the
/// values of [`GridGeometry::default`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    column_width: f32,
    row_height: f32,
    cell_width: f32,
    cell_height: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        let grid = GridGeometry::default();
        Self {
            column_width: grid.column_width(),
            row_height: grid.row_height(),
            cell_width: grid.cell_width(),
            cell_height: grid.cell_height(),
        }
    }
}

impl GeometryConfig {
    pub fn new(column_width: f32, row_height: f32, cell_width: f32, cell_height: f32) -> Self {
        Self {
            column_width,
            row_height,
            cell_width,
            cell_height,
        }
    }

    /// Checks that every dimension is finite and strictly positive.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("column_width", self.column_width),
            ("row_height", self.row_height),
            ("cell_width", self.cell_width),
            ("cell_height", self.cell_height),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!(
                    "Invalid geometry in config: `{name}` must be a positive number, got {value}"
                ));
            }
        }
        Ok(())
    }

    /// Returns the grid geometry used by the layout engine.
    pub fn to_grid(&self) -> GridGeometry {
        GridGeometry::new(
            self.column_width,
            self.row_height,
            self.cell_width,
            self.cell_height,
        )
    }
}

/// SVG export options.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Blank border around the drawing, in pixels.
    margin: f32,

    /// Whether lanes get an alternating background band.
    show_lanes: bool,

    /// Whether cells are labeled with the spot name.
    show_names: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            margin: 20.0,
            show_lanes: true,
            show_names: true,
        }
    }
}

impl ExportConfig {
    pub fn new(margin: f32, show_lanes: bool, show_names: bool) -> Self {
        Self {
            margin,
            show_lanes,
            show_names,
        }
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn show_lanes(&self) -> bool {
        self.show_lanes
    }

    pub fn show_names(&self) -> bool {
        self.show_names
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_default_geometry_matches_grid_default() {
        let config = GeometryConfig::default();
        assert_eq!(config.to_grid(), GridGeometry::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        let config = GeometryConfig::new(160.0, 0.0, 128.0, 40.0);
        let err = config.validate().unwrap_err();
        assert!(err.contains("row_height"));

        let config = GeometryConfig::new(f32::NAN, 120.0, 128.0, 40.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_defaults() {
        let export = ExportConfig::default();
        assert_approx_eq!(f32, export.margin(), 20.0);
        assert!(export.show_lanes());
        assert!(export.show_names());
    }
}
