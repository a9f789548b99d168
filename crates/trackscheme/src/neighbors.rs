//! Time-directed neighbor lookup.
//!
//! Edges are stored undirected in the lineage graph; this index orients each
//! one by frame so that layout can ask for the predecessors and successors of
//! a spot directly.

use std::collections::HashMap;

use trackscheme_core::{identifier::SpotId, lineage::LineageGraph};

#[derive(Debug, Default, Clone)]
struct Neighbors {
    predecessors: Vec<SpotId>,
    successors: Vec<SpotId>,
}

/// Direct temporal predecessors and successors of every spot.
///
/// Built once per layout pass. Neighbor lists are sorted by spot ID.
#[derive(Debug, Default, Clone)]
pub struct NeighborIndex {
    neighbors: HashMap<SpotId, Neighbors>,
}

impl NeighborIndex {
    /// Indexes every spot of `graph`.
    pub fn new<G: LineageGraph>(graph: &G) -> Self {
        let mut neighbors = HashMap::with_capacity(graph.spot_count());

        for spot in graph.spots() {
            let mut entry = Neighbors::default();
            for edge in graph.edges_of(spot.id()) {
                let Some(other) = edge.opposite(spot.id()) else {
                    continue;
                };
                let Some(other_frame) = graph.frame_of(other) else {
                    continue;
                };
                if other_frame < spot.frame() {
                    entry.predecessors.push(other);
                } else if other_frame > spot.frame() {
                    entry.successors.push(other);
                }
            }
            entry.predecessors.sort_unstable();
            entry.successors.sort_unstable();
            neighbors.insert(spot.id(), entry);
        }

        Self { neighbors }
    }

    /// Spots linked to `spot` at an earlier frame.
    pub fn predecessors_of(&self, spot: SpotId) -> &[SpotId] {
        self.neighbors
            .get(&spot)
            .map(|n| n.predecessors.as_slice())
            .unwrap_or_default()
    }

    /// Spots linked to `spot` at a later frame.
    pub fn successors_of(&self, spot: SpotId) -> &[SpotId] {
        self.neighbors
            .get(&spot)
            .map(|n| n.successors.as_slice())
            .unwrap_or_default()
    }

    /// Returns `true` if `spot` has no successor.
    pub fn is_leaf(&self, spot: SpotId) -> bool {
        self.successors_of(spot).is_empty()
    }
}
