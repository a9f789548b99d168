//! The lineage graph contract consumed by layout.
//!
//! [`LineageGraph`] is the read-only view layout needs: stable track
//! enumeration, track membership, incident edges and spot frames.
//! [`TrackModel`](crate::model::TrackModel) is the implementation shipped with
//! this crate.

use crate::{
    identifier::{Frame, SpotId, TrackId},
    spot::{Edge, Spot},
};

/// A maximal connected lineage with a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    id: TrackId,
    name: String,
    spots: Vec<SpotId>,
}

impl Track {
    /// Creates a track. Member spots are expected in frame order; the model
    /// sorts them before constructing the track.
    pub fn new(id: TrackId, name: impl Into<String>, spots: Vec<SpotId>) -> Self {
        Self {
            id,
            name: name.into(),
            spots,
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member spots ordered by frame, ties broken by spot ID.
    pub fn spots(&self) -> &[SpotId] {
        &self.spots
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}

/// Read access to an acyclic, time-oriented graph of spots grouped into
/// disjoint tracks.
pub trait LineageGraph {
    /// Track IDs in the order tracks are laid out from left to right.
    ///
    /// The order must be total and stable across calls for an unmodified
    /// graph.
    fn track_ids(&self) -> Vec<TrackId>;

    /// Returns a track by ID.
    fn track(&self, id: TrackId) -> Option<&Track>;

    /// Returns a spot by ID.
    fn spot(&self, id: SpotId) -> Option<&Spot>;

    /// All spots of the graph, in a stable order.
    fn spots(&self) -> impl Iterator<Item = &Spot>;

    /// Edges incident to `spot`, in either direction.
    fn edges_of(&self, spot: SpotId) -> impl Iterator<Item = &Edge>;

    /// The track `spot` belongs to, or `None` for a lonely spot.
    fn track_of(&self, spot: SpotId) -> Option<TrackId>;

    /// The largest frame present, or `None` for an empty graph.
    fn max_frame(&self) -> Option<Frame>;

    /// Number of spots in the graph.
    fn spot_count(&self) -> usize {
        self.spots().count()
    }

    /// Number of tracks in the graph.
    fn track_count(&self) -> usize {
        self.track_ids().len()
    }

    /// Member spots of a track; empty for an unknown track.
    fn track_spots(&self, id: TrackId) -> &[SpotId] {
        self.track(id).map(Track::spots).unwrap_or_default()
    }

    /// Frame of a spot, if the spot exists.
    fn frame_of(&self, spot: SpotId) -> Option<Frame> {
        self.spot(spot).map(Spot::frame)
    }
}
