//! Placement of tracks with merge points.

use trackscheme_core::{identifier::TrackId, lineage::LineageGraph};

use super::engine::Pass;
use crate::{
    adapter::CellAdapter,
    branches::{BranchDecomposition, BranchError, BranchGraph},
};

impl<G, A> Pass<'_, G, A>
where
    G: LineageGraph,
    A: CellAdapter,
{
    /// Places each branch of the track in a single column, clear of every
    /// row the branch spans.
    pub(super) fn place_branches(&mut self, track: TrackId) -> Result<(), BranchError> {
        let graph = self.graph;
        let decomposition = BranchDecomposition::of_track(graph, &self.index, track)?;
        let branch_graph = BranchGraph::new(&decomposition);

        for branch in branch_graph.depth_first() {
            let span = branch.first_frame()..=branch.last_frame();
            let column = self.cursors.max_over(span.clone());

            for &spot in branch.spots() {
                let frame = graph.frame_of(spot).ok_or(BranchError::UnknownSpot(spot))?;
                self.place(spot, frame, column);
            }

            self.cursors.raise_span(span, column + 1);
        }

        Ok(())
    }
}
