//! In-memory lineage model and its validating builder.

use std::collections::{BTreeMap, HashMap, HashSet};

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::unionfind::UnionFind;

use crate::{
    error::ModelError,
    identifier::{Frame, SpotId, TrackId},
    lineage::{LineageGraph, Track},
    spot::{Edge, Spot},
};

/// Name prefix used for tracks inferred from connected components.
pub const INFERRED_TRACK_PREFIX: &str = "Track_";

/// Largest frame a spot may sit on. Layout keeps one table entry per frame.
pub const MAX_FRAME: Frame = 1 << 20;

/// A validated lineage graph.
///
/// Built with [`TrackModelBuilder`]. Spots are stored by ID, tracks in layout
/// order (display name, then ID).
///
/// # Examples
///
/// ```
/// use trackscheme_core::{
///     identifier::SpotId,
///     lineage::LineageGraph,
///     model::TrackModel,
///     spot::Spot,
/// };
///
/// let mut builder = TrackModel::builder();
/// builder.add_spot(Spot::new(SpotId::new(1), "A", 0)).unwrap();
/// builder.add_spot(Spot::new(SpotId::new(2), "B", 1)).unwrap();
/// builder.add_edge(SpotId::new(1), SpotId::new(2), 1.0).unwrap();
/// let model = builder.build().unwrap();
///
/// assert_eq!(model.track_count(), 1);
/// assert_eq!(model.max_frame(), Some(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TrackModel {
    spots: BTreeMap<SpotId, Spot>,
    edges: Vec<Edge>,
    incident: HashMap<SpotId, Vec<usize>>,
    tracks: IndexMap<TrackId, Track>,
    spot_tracks: HashMap<SpotId, TrackId>,
    max_frame: Option<Frame>,
}

impl TrackModel {
    /// Starts building a model.
    pub fn builder() -> TrackModelBuilder {
        TrackModelBuilder::default()
    }

    /// All edges, time-oriented, in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Tracks in layout order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }
}

impl LineageGraph for TrackModel {
    fn track_ids(&self) -> Vec<TrackId> {
        self.tracks.keys().copied().collect()
    }

    fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    fn spot(&self, id: SpotId) -> Option<&Spot> {
        self.spots.get(&id)
    }

    fn spots(&self) -> impl Iterator<Item = &Spot> {
        self.spots.values()
    }

    fn edges_of(&self, spot: SpotId) -> impl Iterator<Item = &Edge> {
        self.incident
            .get(&spot)
            .into_iter()
            .flatten()
            .map(|&idx| &self.edges[idx])
    }

    fn track_of(&self, spot: SpotId) -> Option<TrackId> {
        self.spot_tracks.get(&spot).copied()
    }

    fn max_frame(&self) -> Option<Frame> {
        self.max_frame
    }

    fn spot_count(&self) -> usize {
        self.spots.len()
    }

    fn track_count(&self) -> usize {
        self.tracks.len()
    }
}

/// Builder enforcing the lineage graph contract.
///
/// Spots must be added before the edges and tracks that reference them.
/// Untracked spots that end up connected by edges are grouped into inferred
/// tracks when the model is built.
#[derive(Debug, Default)]
pub struct TrackModelBuilder {
    spots: BTreeMap<SpotId, Spot>,
    edges: Vec<Edge>,
    linked: HashSet<(SpotId, SpotId)>,
    tracks: Vec<(String, Vec<SpotId>)>,
    spot_tracks: HashMap<SpotId, TrackId>,
}

impl TrackModelBuilder {
    /// Adds a spot.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateSpot`] if the ID is already in use, and
    /// [`ModelError::FrameOutOfRange`] if the spot lies past [`MAX_FRAME`].
    pub fn add_spot(&mut self, spot: Spot) -> Result<&mut Self, ModelError> {
        if spot.frame() > MAX_FRAME {
            return Err(ModelError::FrameOutOfRange {
                spot: spot.id(),
                frame: spot.frame(),
                max: MAX_FRAME,
            });
        }
        if self.spots.contains_key(&spot.id()) {
            return Err(ModelError::DuplicateSpot(spot.id()));
        }
        self.spots.insert(spot.id(), spot);
        Ok(self)
    }

    /// Links two spots. Endpoints in reverse time order are swapped.
    ///
    /// # Errors
    ///
    /// Returns an error if either spot is unknown, both spots share a frame,
    /// or the two spots are already linked.
    pub fn add_edge(&mut self, a: SpotId, b: SpotId, weight: f64) -> Result<&mut Self, ModelError> {
        let spot_a = self.spots.get(&a).ok_or(ModelError::UnknownSpot(a))?;
        let spot_b = self.spots.get(&b).ok_or(ModelError::UnknownSpot(b))?;

        if spot_a.frame() == spot_b.frame() {
            return Err(ModelError::NotTimeOriented {
                source_spot: a,
                target: b,
                frame: spot_a.frame(),
            });
        }

        let edge = Edge::oriented(spot_a, spot_b, weight);
        if !self.linked.insert(edge.endpoints()) {
            return Err(ModelError::DuplicateEdge(edge.source(), edge.target()));
        }

        trace!(source = edge.source().get(), target = edge.target().get(); "Edge added");
        self.edges.push(edge);
        Ok(self)
    }

    /// Declares a track made of the given spots and returns its ID.
    ///
    /// Listing a spot twice in the same track is harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if a spot is unknown or already belongs to another
    /// track.
    pub fn add_track(
        &mut self,
        name: impl Into<String>,
        spots: impl IntoIterator<Item = SpotId>,
    ) -> Result<TrackId, ModelError> {
        let id = track_id(self.tracks.len())?;
        let mut members = Vec::new();
        let mut seen = HashSet::new();

        for spot in spots {
            if !self.spots.contains_key(&spot) {
                return Err(ModelError::UnknownSpot(spot));
            }
            if !seen.insert(spot) {
                continue;
            }
            if let Some(&owner) = self.spot_tracks.get(&spot) {
                return Err(ModelError::SpotInTwoTracks {
                    spot,
                    first: owner,
                    second: id,
                });
            }
            members.push(spot);
        }

        // Only commit membership once every spot has been checked.
        for &spot in &members {
            self.spot_tracks.insert(spot, id);
        }
        self.tracks.push((name.into(), members));
        Ok(id)
    }

    /// Validates track boundaries, infers the remaining tracks and builds the
    /// model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EdgeCrossesTracks`] for an edge joining two
    /// different tracks, or a tracked spot to an untracked one, and
    /// [`ModelError::DisconnectedTrack`] for a declared track whose spots do
    /// not form a single connected component.
    pub fn build(self) -> Result<TrackModel, ModelError> {
        let Self {
            spots,
            edges,
            tracks: declared,
            mut spot_tracks,
            ..
        } = self;

        for edge in &edges {
            let source_track = spot_tracks.get(&edge.source());
            let target_track = spot_tracks.get(&edge.target());
            let crosses = match (source_track, target_track) {
                (None, None) => false,
                (Some(a), Some(b)) => a != b,
                _ => true,
            };
            if crosses {
                return Err(ModelError::EdgeCrossesTracks {
                    source_spot: edge.source(),
                    target: edge.target(),
                });
            }
        }

        check_connected(&declared, &edges)?;

        let mut track_members: Vec<(TrackId, String, Vec<SpotId>)> = declared
            .into_iter()
            .enumerate()
            .map(|(idx, (name, members))| Ok((track_id(idx)?, name, members)))
            .collect::<Result<_, ModelError>>()?;

        let inferred = infer_components(&spots, &edges, &spot_tracks);
        for members in inferred {
            let id = track_id(track_members.len())?;
            for &spot in &members {
                spot_tracks.insert(spot, id);
            }
            let name = format!("{INFERRED_TRACK_PREFIX}{}", id.get());
            track_members.push((id, name, members));
        }

        let mut tracks: Vec<Track> = track_members
            .into_iter()
            .map(|(id, name, mut members)| {
                members.sort_by_key(|spot| (spots[spot].frame(), *spot));
                Track::new(id, name, members)
            })
            .collect();
        tracks.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));

        let mut incident: HashMap<SpotId, Vec<usize>> = HashMap::new();
        for (idx, edge) in edges.iter().enumerate() {
            incident.entry(edge.source()).or_default().push(idx);
            incident.entry(edge.target()).or_default().push(idx);
        }

        let max_frame = spots.values().map(Spot::frame).max();

        debug!(
            spots = spots.len(),
            edges = edges.len(),
            tracks = tracks.len();
            "Track model built"
        );

        Ok(TrackModel {
            spots,
            edges,
            incident,
            tracks: tracks.into_iter().map(|track| (track.id(), track)).collect(),
            spot_tracks,
            max_frame,
        })
    }
}

fn track_id(idx: usize) -> Result<TrackId, ModelError> {
    u32::try_from(idx)
        .map(TrackId::new)
        .map_err(|_| ModelError::TooManyTracks(idx))
}

/// Checks that the spots of every declared track are linked together.
///
/// Edges never cross track boundaries at this point, so one union-find over
/// all tracked spots is enough.
fn check_connected(declared: &[(String, Vec<SpotId>)], edges: &[Edge]) -> Result<(), ModelError> {
    let index: HashMap<SpotId, usize> = declared
        .iter()
        .flat_map(|(_, members)| members.iter().copied())
        .enumerate()
        .map(|(idx, spot)| (spot, idx))
        .collect();

    let mut components = UnionFind::<usize>::new(index.len());
    for edge in edges {
        if let (Some(&a), Some(&b)) = (index.get(&edge.source()), index.get(&edge.target())) {
            components.union(a, b);
        }
    }

    for (idx, (_, members)) in declared.iter().enumerate() {
        let mut roots = members.iter().map(|spot| components.find(index[spot]));
        let Some(first) = roots.next() else {
            continue;
        };
        if roots.any(|root| root != first) {
            return Err(ModelError::DisconnectedTrack(track_id(idx)?));
        }
    }
    Ok(())
}

/// Groups untracked spots connected by at least one edge into components.
///
/// Components come out ordered by their smallest spot ID; isolated untracked
/// spots are left out and stay lonely.
fn infer_components(
    spots: &BTreeMap<SpotId, Spot>,
    edges: &[Edge],
    spot_tracks: &HashMap<SpotId, TrackId>,
) -> Vec<Vec<SpotId>> {
    let endpoints: HashSet<SpotId> = edges
        .iter()
        .flat_map(|edge| [edge.source(), edge.target()])
        .collect();
    let linked: Vec<SpotId> = spots
        .keys()
        .copied()
        .filter(|spot| !spot_tracks.contains_key(spot) && endpoints.contains(spot))
        .collect();
    if linked.is_empty() {
        return Vec::new();
    }

    let index: HashMap<SpotId, usize> = linked
        .iter()
        .enumerate()
        .map(|(idx, &spot)| (spot, idx))
        .collect();

    let mut components = UnionFind::<usize>::new(linked.len());
    for edge in edges {
        if let (Some(&a), Some(&b)) = (index.get(&edge.source()), index.get(&edge.target())) {
            components.union(a, b);
        }
    }

    let mut groups: IndexMap<usize, Vec<SpotId>> = IndexMap::new();
    for (idx, &spot) in linked.iter().enumerate() {
        groups.entry(components.find(idx)).or_default().push(spot);
    }
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(id: u64, name: &str, frame: Frame) -> Spot {
        Spot::new(SpotId::new(id), name, frame)
    }

    fn id(raw: u64) -> SpotId {
        SpotId::new(raw)
    }

    fn chain_builder() -> TrackModelBuilder {
        let mut builder = TrackModel::builder();
        builder
            .add_spot(spot(1, "A", 0))
            .unwrap()
            .add_spot(spot(2, "B", 1))
            .unwrap()
            .add_spot(spot(3, "C", 2))
            .unwrap();
        builder
    }

    #[test]
    fn test_frame_past_limit_rejected() {
        let mut builder = chain_builder();
        builder.add_spot(spot(4, "last", MAX_FRAME)).unwrap();

        let err = builder.add_spot(spot(5, "far", usize::MAX)).unwrap_err();
        assert_eq!(
            err,
            ModelError::FrameOutOfRange {
                spot: id(5),
                frame: usize::MAX,
                max: MAX_FRAME,
            }
        );
    }

    #[test]
    fn test_track_id_range() {
        assert_eq!(track_id(7), Ok(TrackId::new(7)));
        assert_eq!(track_id(u32::MAX as usize), Ok(TrackId::new(u32::MAX)));
        let too_many = u32::MAX as usize + 1;
        assert_eq!(track_id(too_many), Err(ModelError::TooManyTracks(too_many)));
    }

    #[test]
    fn test_duplicate_spot_rejected() {
        let mut builder = chain_builder();
        let err = builder.add_spot(spot(2, "again", 4)).unwrap_err();
        assert_eq!(err, ModelError::DuplicateSpot(id(2)));
    }

    #[test]
    fn test_reverse_edge_is_normalized() {
        let mut builder = chain_builder();
        builder.add_edge(id(2), id(1), 1.0).unwrap();
        let model = builder.build().unwrap();

        let edge = model.edges()[0];
        assert_eq!(edge.endpoints(), (id(1), id(2)));
    }

    #[test]
    fn test_same_frame_edge_rejected() {
        let mut builder = chain_builder();
        builder.add_spot(spot(4, "B'", 1)).unwrap();
        let err = builder.add_edge(id(2), id(4), 1.0).unwrap_err();
        assert!(matches!(err, ModelError::NotTimeOriented { frame: 1, .. }));
    }

    #[test]
    fn test_duplicate_edge_rejected_in_either_direction() {
        let mut builder = chain_builder();
        builder.add_edge(id(1), id(2), 1.0).unwrap();
        let err = builder.add_edge(id(2), id(1), 1.0).unwrap_err();
        assert_eq!(err, ModelError::DuplicateEdge(id(1), id(2)));
    }

    #[test]
    fn test_edge_to_unknown_spot_rejected() {
        let mut builder = chain_builder();
        let err = builder.add_edge(id(1), id(99), 1.0).unwrap_err();
        assert_eq!(err, ModelError::UnknownSpot(id(99)));
    }

    #[test]
    fn test_spot_in_two_tracks_rejected() {
        let mut builder = chain_builder();
        let first = builder.add_track("first", [id(1), id(2)]).unwrap();
        let err = builder.add_track("second", [id(3), id(2)]).unwrap_err();
        assert_eq!(
            err,
            ModelError::SpotInTwoTracks {
                spot: id(2),
                first,
                second: TrackId::new(1),
            }
        );
    }

    #[test]
    fn test_edge_crossing_tracks_rejected() {
        let mut builder = chain_builder();
        builder.add_track("first", [id(1)]).unwrap();
        builder.add_track("second", [id(2)]).unwrap();
        builder.add_edge(id(1), id(2), 1.0).unwrap();
        let err = builder.build().unwrap_err();
        assert!(matches!(err, ModelError::EdgeCrossesTracks { .. }));
    }

    #[test]
    fn test_components_become_inferred_tracks() {
        let mut builder = chain_builder();
        builder
            .add_spot(spot(10, "X", 0))
            .unwrap()
            .add_spot(spot(11, "Y", 1))
            .unwrap()
            .add_spot(spot(20, "lonely", 1))
            .unwrap();
        builder.add_edge(id(1), id(2), 1.0).unwrap();
        builder.add_edge(id(2), id(3), 1.0).unwrap();
        builder.add_edge(id(10), id(11), 1.0).unwrap();
        let model = builder.build().unwrap();

        assert_eq!(model.track_count(), 2);
        let names: Vec<_> = model.tracks().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["Track_0", "Track_1"]);
        assert_eq!(model.track_spots(TrackId::new(0)), &[id(1), id(2), id(3)]);
        assert_eq!(model.track_of(id(11)), Some(TrackId::new(1)));
        assert_eq!(model.track_of(id(20)), None);
    }

    #[test]
    fn test_tracks_enumerated_by_name() {
        let mut builder = chain_builder();
        builder.add_track("zebra", [id(1)]).unwrap();
        builder.add_track("ant", [id(2)]).unwrap();
        builder.add_track("Track_10", [id(3)]).unwrap();
        let model = builder.build().unwrap();

        let names: Vec<_> = model
            .track_ids()
            .into_iter()
            .map(|t| model.track(t).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["Track_10", "ant", "zebra"]);
    }

    #[test]
    fn test_track_spots_sorted_by_frame() {
        let mut builder = chain_builder();
        let track = builder.add_track("t", [id(3), id(1), id(2)]).unwrap();
        builder.add_edge(id(1), id(2), 1.0).unwrap();
        builder.add_edge(id(2), id(3), 1.0).unwrap();
        let model = builder.build().unwrap();

        assert_eq!(model.track_spots(track), &[id(1), id(2), id(3)]);
        assert_eq!(model.edges_of(id(2)).count(), 2);
        assert_eq!(model.frame_of(id(3)), Some(2));
    }

    #[test]
    fn test_disconnected_track_rejected() {
        let mut builder = chain_builder();
        builder.add_edge(id(1), id(2), 1.0).unwrap();
        builder.add_track("split", [id(1), id(2), id(3)]).unwrap();
        let err = builder.build().unwrap_err();
        assert_eq!(err, ModelError::DisconnectedTrack(TrackId::new(0)));
    }

    #[test]
    fn test_repeated_track_member_is_ignored() {
        let mut builder = chain_builder();
        builder.add_edge(id(1), id(2), 1.0).unwrap();
        builder.add_track("pair", [id(1), id(2), id(1)]).unwrap();
        let model = builder.build().unwrap();
        assert_eq!(model.track_spots(TrackId::new(0)), &[id(1), id(2)]);
    }

    #[test]
    fn test_empty_model() {
        let model = TrackModel::builder().build().unwrap();
        assert_eq!(model.max_frame(), None);
        assert_eq!(model.spot_count(), 0);
        assert!(model.track_ids().is_empty());
    }
}
