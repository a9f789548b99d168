//! The track scheme layout engine.

use std::{
    cmp::Ordering,
    collections::HashSet,
    fmt,
    time::{Duration, Instant},
};

use log::{debug, info, trace};
use thiserror::Error;

use trackscheme_core::{
    geometry::{GridGeometry, GridPosition},
    identifier::{Frame, SpotId, TrackId},
    lineage::LineageGraph,
    spot::Spot,
};

use super::{
    cursor::{ColumnCursors, START_COLUMN},
    shape::TrackShape,
};
use crate::{
    adapter::{CellAdapter, Placement},
    branches::BranchError,
    neighbors::NeighborIndex,
    width::SubtreeWidths,
};

/// Ordering applied to sibling spots during the tree walk.
pub type SiblingOrder = dyn Fn(&Spot, &Spot) -> Ordering;

/// Default sibling ordering: display name, then spot ID.
pub fn by_name(a: &Spot, b: &Spot) -> Ordering {
    a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id()))
}

/// Errors a layout pass can return.
///
/// The engine has no failure mode of its own; collaborator errors are passed
/// through unchanged.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Branch(#[from] BranchError),
}

/// Bookkeeping tables produced by one layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOutcome {
    row_lengths: Vec<usize>,
    column_widths: Vec<usize>,
    column_track_ids: Vec<TrackId>,
    elapsed: Duration,
}

impl LayoutOutcome {
    /// Columns in use per frame: the largest column placed on the row plus
    /// one, or [`START_COLUMN`] for an empty row.
    pub fn row_lengths(&self) -> &[usize] {
        &self.row_lengths
    }

    /// Row length of one frame.
    pub fn row_length(&self, frame: Frame) -> Option<usize> {
        self.row_lengths.get(frame).copied()
    }

    /// Columns consumed by each track, in layout order.
    pub fn column_widths(&self) -> &[usize] {
        &self.column_widths
    }

    /// Track laid out in each lane, in layout order.
    pub fn column_track_ids(&self) -> &[TrackId] {
        &self.column_track_ids
    }

    /// Wall-clock duration of the pass.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Assigns every spot of a lineage graph a column and a row.
///
/// Tracks are laid out left to right in the graph's track order, each in its
/// own band of columns. Rows are frames.
///
/// # Examples
///
/// ```
/// use trackscheme::{adapter::PositionTable, layout::SchemeLayout};
/// use trackscheme_core::{identifier::SpotId, model::TrackModel, spot::Spot};
///
/// let mut builder = TrackModel::builder();
/// builder.add_spot(Spot::new(SpotId::new(1), "A", 0)).unwrap();
/// builder.add_spot(Spot::new(SpotId::new(2), "B", 1)).unwrap();
/// builder.add_edge(SpotId::new(1), SpotId::new(2), 1.0).unwrap();
/// let model = builder.build().unwrap();
///
/// let mut table = PositionTable::new();
/// let outcome = SchemeLayout::default().run(&model, &mut table).unwrap();
///
/// assert_eq!(outcome.column_widths(), &[1]);
/// assert_eq!(table.placement(SpotId::new(2)).unwrap().column(), 1);
/// ```
pub struct SchemeLayout {
    geometry: GridGeometry,
    sibling_order: Box<SiblingOrder>,
}

impl Default for SchemeLayout {
    fn default() -> Self {
        Self::new(GridGeometry::default())
    }
}

impl fmt::Debug for SchemeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeLayout")
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}

impl SchemeLayout {
    /// Creates an engine drawing cells with `geometry`.
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            geometry,
            sibling_order: Box::new(by_name),
        }
    }

    /// Replaces the sibling ordering used in tree tracks.
    pub fn with_sibling_order<F>(mut self, order: F) -> Self
    where
        F: Fn(&Spot, &Spot) -> Ordering + 'static,
    {
        self.sibling_order = Box::new(order);
        self
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Lays out `graph`, writing one placement per spot through `adapter`.
    ///
    /// All placements are written inside a single adapter batch. A failed
    /// pass discards the batch, leaving the adapter's committed placements
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Branch`] if a branching track cannot be
    /// decomposed.
    pub fn run<G, A>(&self, graph: &G, adapter: &mut A) -> Result<LayoutOutcome, LayoutError>
    where
        G: LineageGraph,
        A: CellAdapter,
    {
        let start = Instant::now();
        info!(
            spots = graph.spot_count(),
            tracks = graph.track_count();
            "Starting track scheme layout"
        );

        let index = NeighborIndex::new(graph);
        let widths = SubtreeWidths::compute(graph, &index);
        let frames = graph.max_frame().map_or(0, |max| max + 1);

        // Every spot gets a cell up front so lonely spots are enumerated too.
        for spot in graph.spots() {
            adapter.cell_for(spot.id());
        }

        adapter.begin_batch();
        let tables = {
            let mut pass = Pass {
                graph,
                adapter: &mut *adapter,
                index,
                widths,
                cursors: ColumnCursors::new(frames),
                geometry: self.geometry,
                sibling_order: self.sibling_order.as_ref(),
                placed: HashSet::with_capacity(graph.spot_count()),
                row_max: vec![None; frames],
            };
            pass.execute()
        };
        let (column_widths, column_track_ids, row_lengths) = match tables {
            Ok(tables) => {
                adapter.end_batch();
                tables
            }
            Err(err) => {
                adapter.discard_batch();
                return Err(err);
            }
        };
        let elapsed = start.elapsed();
        info!(
            lanes = column_widths.len(),
            elapsed_ms = elapsed.as_millis() as u64;
            "Track scheme layout finished"
        );

        Ok(LayoutOutcome {
            row_lengths,
            column_widths,
            column_track_ids,
            elapsed,
        })
    }
}

type PassTables = (Vec<usize>, Vec<TrackId>, Vec<usize>);

/// State of a single layout pass.
pub(super) struct Pass<'p, G, A> {
    pub(super) graph: &'p G,
    pub(super) adapter: &'p mut A,
    pub(super) index: NeighborIndex,
    pub(super) widths: SubtreeWidths,
    pub(super) cursors: ColumnCursors,
    pub(super) geometry: GridGeometry,
    pub(super) sibling_order: &'p SiblingOrder,
    pub(super) placed: HashSet<SpotId>,
    pub(super) row_max: Vec<Option<usize>>,
}

impl<G, A> Pass<'_, G, A>
where
    G: LineageGraph,
    A: CellAdapter,
{
    fn execute(&mut self) -> Result<PassTables, LayoutError> {
        let graph = self.graph;
        let track_ids = graph.track_ids();
        let mut column_widths = Vec::with_capacity(track_ids.len());
        let mut column_track_ids = Vec::with_capacity(track_ids.len());
        let mut consumed = START_COLUMN;

        for track_id in track_ids {
            let Some(track) = graph.track(track_id) else {
                continue;
            };

            let shape = TrackShape::classify(&self.index, track);
            debug!(track = track.name(), shape:?; "Placing track");
            match shape {
                Some(TrackShape::Tree { root }) => self.place_tree(root),
                Some(TrackShape::Branching) => self.place_branches(track_id)?,
                None => {}
            }

            let max_column = self.cursors.open_band();
            let width = max_column.saturating_sub(consumed);
            consumed += width;
            column_widths.push(width);
            column_track_ids.push(track_id);
        }

        self.place_lonely();

        let vertices = self.adapter.vertices();
        self.adapter.bring_to_front(&vertices);

        let row_lengths = self
            .row_max
            .iter()
            .map(|max| max.map_or(START_COLUMN, |column| column + 1))
            .collect();

        Ok((column_widths, column_track_ids, row_lengths))
    }

    /// Places every spot that no track claimed, in the adapter's enumeration
    /// order.
    fn place_lonely(&mut self) {
        for cell in self.adapter.vertices() {
            let Some(spot) = self.adapter.spot_for(cell) else {
                continue;
            };
            if self.placed.contains(&spot) {
                continue;
            }
            let Some(frame) = self.graph.frame_of(spot) else {
                continue;
            };
            let column = self.cursors.take(frame);
            self.place(spot, frame, column);
        }
    }

    /// Writes the placement of `spot` through the adapter.
    pub(super) fn place(&mut self, spot: SpotId, frame: Frame, column: usize) {
        let grid = GridPosition::new(column, frame);
        let cell = self.adapter.cell_for(spot);
        self.adapter
            .set_position(cell, Placement::new(grid, self.geometry.cell_origin(grid)));
        self.placed.insert(spot);

        let row_max = &mut self.row_max[frame];
        *row_max = Some(row_max.map_or(column, |max| max.max(column)));

        trace!(spot = spot.get(), column, frame; "Spot placed");
    }
}
