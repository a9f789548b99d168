//! Decomposition of a track into branches.
//!
//! A branch is a maximal chain of spots with no branching or merging inside
//! it. Branches are linked wherever one ends and another starts at a division
//! or merge point, which turns a track into a small DAG of branches.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use log::trace;
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
};
use thiserror::Error;

use trackscheme_core::{
    identifier::{Frame, SpotId, TrackId},
    lineage::LineageGraph,
};

use crate::neighbors::NeighborIndex;

/// Errors raised while decomposing a track.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BranchError {
    #[error("track {0} does not exist")]
    UnknownTrack(TrackId),

    #[error("spot {0} is not part of the lineage graph")]
    UnknownSpot(SpotId),

    #[error("spot {spot} of {track} is not covered by exactly one branch")]
    Inconsistent { track: TrackId, spot: SpotId },
}

/// A maximal non-branching chain of spots, ordered by frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    spots: Vec<SpotId>,
    first_frame: Frame,
    last_frame: Frame,
}

impl Branch {
    pub fn spots(&self) -> &[SpotId] {
        &self.spots
    }

    pub fn first(&self) -> SpotId {
        self.spots[0]
    }

    pub fn last(&self) -> SpotId {
        self.spots[self.spots.len() - 1]
    }

    pub fn first_frame(&self) -> Frame {
        self.first_frame
    }

    pub fn last_frame(&self) -> Frame {
        self.last_frame
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}

/// The branches of one track and the links between them.
///
/// Branches are ordered by their first spot: frame, then display name, then
/// ID. Links are pairs of branch indices, `(from, to)`.
#[derive(Debug, Clone)]
pub struct BranchDecomposition {
    track: TrackId,
    branches: Vec<Branch>,
    links: Vec<(usize, usize)>,
}

impl BranchDecomposition {
    /// Splits `track` into branches.
    ///
    /// A spot starts a branch unless it has exactly one predecessor and that
    /// predecessor has exactly one successor. Frame gaps inside a branch are
    /// allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the track is unknown, or if the neighbor index and
    /// the track membership disagree.
    pub fn of_track<G: LineageGraph>(
        graph: &G,
        index: &NeighborIndex,
        track: TrackId,
    ) -> Result<Self, BranchError> {
        let members: HashSet<SpotId> = graph
            .track(track)
            .ok_or(BranchError::UnknownTrack(track))?
            .spots()
            .iter()
            .copied()
            .collect();

        let mut starts: Vec<SpotId> = graph
            .track_spots(track)
            .iter()
            .copied()
            .filter(|&spot| starts_branch(index, spot))
            .collect();
        starts.sort_by(|&a, &b| spot_order(graph, a, b));

        let mut owners: HashMap<SpotId, usize> = HashMap::with_capacity(members.len());
        let mut branches = Vec::with_capacity(starts.len());

        for start in starts {
            let mut spots = vec![start];
            let mut current = start;
            while let [next] = index.successors_of(current) {
                if index.predecessors_of(*next).len() != 1 {
                    break;
                }
                spots.push(*next);
                current = *next;
            }

            let branch_idx = branches.len();
            for &spot in &spots {
                if !members.contains(&spot) || owners.insert(spot, branch_idx).is_some() {
                    return Err(BranchError::Inconsistent { track, spot });
                }
            }

            let first_frame = graph.frame_of(start).ok_or(BranchError::UnknownSpot(start))?;
            let last_frame = graph.frame_of(current).ok_or(BranchError::UnknownSpot(current))?;
            branches.push(Branch {
                spots,
                first_frame,
                last_frame,
            });
        }

        if let Some(&spot) = members.iter().find(|spot| !owners.contains_key(spot)) {
            return Err(BranchError::Inconsistent { track, spot });
        }

        let mut links = Vec::new();
        for (from, branch) in branches.iter().enumerate() {
            for successor in index.successors_of(branch.last()) {
                let &to = owners.get(successor).ok_or(BranchError::Inconsistent {
                    track,
                    spot: *successor,
                })?;
                links.push((from, to));
            }
        }

        trace!(
            track = track.get(),
            branches = branches.len(),
            links = links.len();
            "Track decomposed into branches"
        );

        Ok(Self {
            track,
            branches,
            links,
        })
    }

    pub fn track(&self) -> TrackId {
        self.track
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }
}

/// Returns `true` if `spot` cannot continue its predecessor's branch.
fn starts_branch(index: &NeighborIndex, spot: SpotId) -> bool {
    match index.predecessors_of(spot) {
        [predecessor] => index.successors_of(*predecessor).len() != 1,
        _ => true,
    }
}

/// Orders spots by frame, then display name, then ID.
fn spot_order<G: LineageGraph>(graph: &G, a: SpotId, b: SpotId) -> Ordering {
    match (graph.spot(a), graph.spot(b)) {
        (Some(sa), Some(sb)) => sa
            .frame()
            .cmp(&sb.frame())
            .then_with(|| sa.name().cmp(sb.name()))
            .then_with(|| a.cmp(&b)),
        _ => a.cmp(&b),
    }
}

/// Directed acyclic graph over the branches of one decomposition.
pub struct BranchGraph<'a> {
    decomposition: &'a BranchDecomposition,
    graph: DiGraph<usize, ()>,
    nodes: Vec<NodeIndex>,
}

impl<'a> BranchGraph<'a> {
    /// Builds the branch graph, one node per branch and one edge per link.
    pub fn new(decomposition: &'a BranchDecomposition) -> Self {
        let mut graph = DiGraph::with_capacity(
            decomposition.branches.len(),
            decomposition.links.len(),
        );
        let nodes: Vec<NodeIndex> = (0..decomposition.branches.len())
            .map(|idx| graph.add_node(idx))
            .collect();
        for &(from, to) in &decomposition.links {
            graph.add_edge(nodes[from], nodes[to], ());
        }

        Self {
            decomposition,
            graph,
            nodes,
        }
    }

    /// Indices of the branches that directly follow branch `idx`, in branch
    /// order.
    pub fn successors(&self, idx: usize) -> Vec<usize> {
        let mut successors: Vec<usize> = self
            .graph
            .neighbors_directed(self.nodes[idx], Direction::Outgoing)
            .map(|node| self.graph[node])
            .collect();
        successors.sort_unstable();
        successors.dedup();
        successors
    }

    /// Every branch exactly once, in depth-first order.
    ///
    /// Branches are tried as starting points in branch order; from each
    /// unvisited start the walk follows successor branches in branch order.
    pub fn depth_first(&self) -> Vec<&'a Branch> {
        let decomposition: &'a BranchDecomposition = self.decomposition;
        let branches = &decomposition.branches;
        let mut visited = vec![false; branches.len()];
        let mut order = Vec::with_capacity(branches.len());

        for start in 0..branches.len() {
            let mut stack = vec![start];
            while let Some(idx) = stack.pop() {
                if visited[idx] {
                    continue;
                }
                visited[idx] = true;
                order.push(&branches[idx]);

                let successors = self.successors(idx);
                stack.extend(successors.into_iter().rev().filter(|&next| !visited[next]));
            }
        }

        order
    }
}
