//! Subtree width estimation.
//!
//! The width of a spot is the number of columns its descendants need: a leaf
//! takes one column, any other spot takes the sum of its successors' widths.

use std::collections::HashMap;

use trackscheme_core::{identifier::SpotId, lineage::LineageGraph};

use crate::neighbors::NeighborIndex;

/// Precomputed subtree width of every spot.
#[derive(Debug, Default, Clone)]
pub struct SubtreeWidths {
    widths: HashMap<SpotId, usize>,
}

impl SubtreeWidths {
    /// Computes widths for the whole graph.
    ///
    /// Spots are visited from the last frame to the first so every successor
    /// is resolved before its predecessors.
    pub fn compute<G: LineageGraph>(graph: &G, index: &NeighborIndex) -> Self {
        let mut order: Vec<_> = graph.spots().map(|s| (s.frame(), s.id())).collect();
        order.sort_unstable_by(|a, b| b.cmp(a));

        let mut widths = HashMap::with_capacity(order.len());
        for (_, spot) in order {
            let successors = index.successors_of(spot);
            let width = if successors.is_empty() {
                1
            } else {
                successors
                    .iter()
                    .map(|succ| widths.get(succ).copied().unwrap_or(1))
                    .sum()
            };
            widths.insert(spot, width);
        }

        Self { widths }
    }

    /// Number of columns the subtree rooted at `spot` occupies. Always at
    /// least one.
    pub fn width(&self, spot: SpotId) -> usize {
        self.widths.get(&spot).copied().unwrap_or(1)
    }
}
