//! Placement of tracks without merges.

use trackscheme_core::{identifier::SpotId, lineage::LineageGraph, spot::Spot};

use super::engine::Pass;
use crate::adapter::CellAdapter;

impl<G, A> Pass<'_, G, A>
where
    G: LineageGraph,
    A: CellAdapter,
{
    /// Walks the tree depth-first from `root`, siblings in sibling order.
    ///
    /// Each spot is centered over the columns its subtree reserves on its
    /// row. Reaching a leaf pushes every row's cursor past the leaf, so a
    /// later sibling subtree cannot slide under columns already taken by this
    /// one on rows the leaf never reached.
    pub(super) fn place_tree(&mut self, root: SpotId) {
        let graph = self.graph;
        let mut stack = vec![root];

        while let Some(spot) = stack.pop() {
            if self.placed.contains(&spot) {
                continue;
            }
            let Some(frame) = graph.frame_of(spot) else {
                continue;
            };

            let width = self.widths.width(spot);
            let column = self.cursors.get(frame) + width / 2;
            self.place(spot, frame, column);
            self.cursors.advance(frame, width);

            if self.index.is_leaf(spot) {
                let reached = self.cursors.get(frame);
                self.cursors.raise_all(reached);
                continue;
            }

            let mut children: Vec<&Spot> = self
                .index
                .successors_of(spot)
                .iter()
                .filter_map(|&child| graph.spot(child))
                .collect();
            children.sort_by(|a, b| (self.sibling_order)(a, b));
            stack.extend(children.iter().rev().map(|child| child.id()));
        }
    }
}
