//! Cell adapter contract and the versioned position table.
//!
//! Layout never touches drawing state directly. It asks a [`CellAdapter`] for
//! one cell per spot and stages a [`Placement`] for each cell inside a batch;
//! the adapter publishes all staged placements at once when the batch ends.

use std::{collections::HashSet, fmt::Debug, hash::Hash};

use indexmap::IndexMap;
use log::{trace, warn};

use trackscheme_core::{
    geometry::{GridPosition, Point},
    identifier::SpotId,
};

/// Where a cell sits, on the grid and in drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    grid: GridPosition,
    origin: Point,
}

impl Placement {
    pub fn new(grid: GridPosition, origin: Point) -> Self {
        Self { grid, origin }
    }

    /// Logical grid position.
    pub fn grid(&self) -> GridPosition {
        self.grid
    }

    /// Top-left corner of the cell in drawing coordinates.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn column(&self) -> usize {
        self.grid.column()
    }

    pub fn row(&self) -> usize {
        self.grid.row()
    }
}

/// Maps spots to visual cells and applies placements transactionally.
pub trait CellAdapter {
    /// Handle of a visual cell.
    type Cell: Copy + Eq + Hash + Debug;

    /// Returns the cell of `spot`, creating it on first reference.
    fn cell_for(&mut self, spot: SpotId) -> Self::Cell;

    /// Reverse lookup of the spot behind a cell.
    fn spot_for(&self, cell: Self::Cell) -> Option<SpotId>;

    /// All cells, in the adapter's enumeration order.
    fn vertices(&self) -> Vec<Self::Cell>;

    /// Stages a placement for `cell`.
    fn set_position(&mut self, cell: Self::Cell, placement: Placement);

    /// Opens a batch. Batches nest.
    fn begin_batch(&mut self);

    /// Closes a batch. Closing the outermost batch publishes every staged
    /// placement at once.
    fn end_batch(&mut self);

    /// Closes a batch without publishing. Closing the outermost batch this
    /// way drops every staged placement.
    fn discard_batch(&mut self);

    /// Moves `cells` to the top of the drawing order, keeping their relative
    /// order.
    fn bring_to_front(&mut self, cells: &[Self::Cell]);
}

/// Handle of a cell in a [`PositionTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellHandle(usize);

/// A versioned table of placements keyed by spot.
///
/// Cells are enumerated in creation order. Readers only ever see committed
/// placements: writes staged inside a batch become visible together when the
/// outermost batch ends, and each commit bumps [`version`](Self::version).
///
/// # Examples
///
/// ```
/// use trackscheme::adapter::{CellAdapter, Placement, PositionTable};
/// use trackscheme_core::{
///     geometry::{GridPosition, Point},
///     identifier::SpotId,
/// };
///
/// let mut table = PositionTable::new();
/// let cell = table.cell_for(SpotId::new(1));
///
/// table.begin_batch();
/// table.set_position(cell, Placement::new(GridPosition::new(1, 0), Point::new(0.0, 0.0)));
/// assert!(table.placement(SpotId::new(1)).is_none());
/// table.end_batch();
///
/// assert_eq!(table.placement(SpotId::new(1)).map(|p| p.column()), Some(1));
/// assert_eq!(table.version(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct PositionTable {
    cells: IndexMap<SpotId, Option<Placement>>,
    staged: Vec<(CellHandle, Placement)>,
    depth: usize,
    version: u64,
    z_order: Vec<CellHandle>,
}

impl PositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commits so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns `true` while a batch is open.
    pub fn in_batch(&self) -> bool {
        self.depth > 0
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Committed placement of `spot`.
    pub fn placement(&self, spot: SpotId) -> Option<Placement> {
        self.cells.get(&spot).copied().flatten()
    }

    /// Committed placements, in cell creation order.
    pub fn placements(&self) -> impl Iterator<Item = (SpotId, Placement)> + '_ {
        self.cells
            .iter()
            .filter_map(|(&spot, placement)| placement.map(|p| (spot, p)))
    }

    /// Spots in drawing order, bottom first.
    pub fn z_order(&self) -> Vec<SpotId> {
        self.z_order
            .iter()
            .filter_map(|&cell| self.spot_for(cell))
            .collect()
    }

    fn apply(&mut self, cell: CellHandle, placement: Placement) {
        if let Some((_, slot)) = self.cells.get_index_mut(cell.0) {
            *slot = Some(placement);
        }
    }
}

impl CellAdapter for PositionTable {
    type Cell = CellHandle;

    fn cell_for(&mut self, spot: SpotId) -> CellHandle {
        if let Some(idx) = self.cells.get_index_of(&spot) {
            return CellHandle(idx);
        }
        let (idx, _) = self.cells.insert_full(spot, None);
        let cell = CellHandle(idx);
        self.z_order.push(cell);
        cell
    }

    fn spot_for(&self, cell: CellHandle) -> Option<SpotId> {
        self.cells.get_index(cell.0).map(|(&spot, _)| spot)
    }

    fn vertices(&self) -> Vec<CellHandle> {
        (0..self.cells.len()).map(CellHandle).collect()
    }

    fn set_position(&mut self, cell: CellHandle, placement: Placement) {
        if self.depth == 0 {
            self.apply(cell, placement);
            self.version += 1;
        } else {
            self.staged.push((cell, placement));
        }
    }

    fn begin_batch(&mut self) {
        self.depth += 1;
    }

    fn end_batch(&mut self) {
        if self.depth == 0 {
            warn!("end_batch called without an open batch");
            return;
        }
        self.depth -= 1;
        if self.depth > 0 {
            return;
        }

        let staged = std::mem::take(&mut self.staged);
        let count = staged.len();
        for (cell, placement) in staged {
            self.apply(cell, placement);
        }
        self.version += 1;
        trace!(placements = count, version = self.version; "Position table committed");
    }

    fn discard_batch(&mut self) {
        if self.depth == 0 {
            warn!("discard_batch called without an open batch");
            return;
        }
        self.depth -= 1;
        if self.depth == 0 {
            let dropped = self.staged.len();
            self.staged.clear();
            trace!(placements = dropped; "Staged placements discarded");
        }
    }

    fn bring_to_front(&mut self, cells: &[CellHandle]) {
        let moved: HashSet<CellHandle> = cells.iter().copied().collect();
        self.z_order.retain(|cell| !moved.contains(cell));
        self.z_order.extend_from_slice(cells);
    }
}
