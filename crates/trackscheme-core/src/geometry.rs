//! Grid coordinates and their mapping to drawing coordinates.
//!
//! Layout works purely on the logical grid: a [`GridPosition`] is a column
//! (lane) and a row (frame). [`GridGeometry`] is the single place where grid
//! positions become [`Point`]s.
//!
//! # Coordinate System
//!
//! ```text
//!   (0,0) ────────► +X   (columns)
//!     │
//!     ▼
//!    +Y                  (rows = frames)
//! ```
//!
//! Column `c` is centered on `x = c * column_width`; row `r` is centered on
//! `y = (r + 0.5) * row_height`.

use serde::{Deserialize, Serialize};

use crate::identifier::Frame;

/// A cell position on the logical grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    column: usize,
    row: Frame,
}

impl GridPosition {
    pub fn new(column: usize, row: Frame) -> Self {
        Self { column, row }
    }

    pub fn column(self) -> usize {
        self.column
    }

    pub fn row(self) -> Frame {
        self.row
    }
}

/// A 2D point in drawing coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns a new point translated by the given offsets.
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Cell and lane dimensions of a track scheme.
///
/// # Examples
///
/// ```
/// use trackscheme_core::geometry::{GridGeometry, GridPosition};
///
/// let geometry = GridGeometry::default();
/// let origin = geometry.cell_origin(GridPosition::new(1, 0));
/// assert_eq!(origin.x(), 160.0 - 64.0);
/// assert_eq!(origin.y(), 60.0 - 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    column_width: f32,
    row_height: f32,
    cell_width: f32,
    cell_height: f32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            column_width: 160.0,
            row_height: 120.0,
            cell_width: 128.0,
            cell_height: 40.0,
        }
    }
}

impl GridGeometry {
    pub fn new(column_width: f32, row_height: f32, cell_width: f32, cell_height: f32) -> Self {
        Self {
            column_width,
            row_height,
            cell_width,
            cell_height,
        }
    }

    pub fn column_width(&self) -> f32 {
        self.column_width
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Top-left corner of the cell drawn at `position`.
    pub fn cell_origin(&self, position: GridPosition) -> Point {
        self.cell_center(position)
            .translate(-self.cell_width / 2.0, -self.cell_height / 2.0)
    }

    /// Center of the cell drawn at `position`.
    pub fn cell_center(&self, position: GridPosition) -> Point {
        Point::new(
            position.column() as f32 * self.column_width,
            (0.5 + position.row() as f32) * self.row_height,
        )
    }

    /// Horizontal offset of the left edge of `column`'s lane slot.
    pub fn column_left(&self, column: usize) -> f32 {
        (column as f32 - 0.5) * self.column_width
    }

    /// Total height of `rows` rows.
    pub fn rows_height(&self, rows: usize) -> f32 {
        rows as f32 * self.row_height
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn geometry_strategy() -> impl Strategy<Value = GridGeometry> {
        (10.0f32..400.0, 10.0f32..400.0, 1.0f32..200.0, 1.0f32..200.0)
            .prop_map(|(cw, rh, w, h)| GridGeometry::new(cw, rh, w, h))
    }

    proptest! {
        #[test]
        fn origin_is_center_minus_half_cell(
            geometry in geometry_strategy(),
            column in 0usize..200,
            row in 0usize..200,
        ) {
            let position = GridPosition::new(column, row);
            let origin = geometry.cell_origin(position);
            let center = geometry.cell_center(position);

            prop_assert!(approx_eq!(f32, origin.x() + geometry.cell_width() / 2.0, center.x(), epsilon = 1e-2));
            prop_assert!(approx_eq!(f32, origin.y() + geometry.cell_height() / 2.0, center.y(), epsilon = 1e-2));
        }

        #[test]
        fn later_rows_are_lower(
            geometry in geometry_strategy(),
            column in 0usize..50,
            row in 0usize..200,
        ) {
            let upper = geometry.cell_origin(GridPosition::new(column, row));
            let lower = geometry.cell_origin(GridPosition::new(column, row + 1));
            prop_assert!(lower.y() > upper.y());
        }
    }
}
