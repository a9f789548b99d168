//! Tree / branching classification of a track.

use trackscheme_core::{identifier::SpotId, lineage::Track};

use crate::neighbors::NeighborIndex;

/// How a track is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackShape {
    /// No spot has more than one predecessor. Laid out by a depth-first walk
    /// from `root`, the earliest spot of the track.
    Tree { root: SpotId },
    /// At least one merge. Laid out branch by branch.
    Branching,
}

impl TrackShape {
    /// Classifies `track`, or returns `None` for a track without spots.
    pub fn classify(index: &NeighborIndex, track: &Track) -> Option<Self> {
        let &root = track.spots().first()?;
        let is_tree = track
            .spots()
            .iter()
            .all(|&spot| index.predecessors_of(spot).len() <= 1);

        Some(if is_tree {
            Self::Tree { root }
        } else {
            Self::Branching
        })
    }
}
