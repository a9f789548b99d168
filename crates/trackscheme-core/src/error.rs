//! Errors raised while assembling a lineage model.

use thiserror::Error;

use crate::identifier::{Frame, SpotId, TrackId};

/// A violation of the lineage graph contract, detected by
/// [`TrackModelBuilder`](crate::model::TrackModelBuilder).
///
/// A model that builds successfully is acyclic, time-oriented and has every
/// spot in at most one track, so layout never has to deal with these cases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("spot {spot} is at frame {frame}, past the last supported frame {max}")]
    FrameOutOfRange {
        spot: SpotId,
        frame: Frame,
        max: Frame,
    },

    #[error("spot {0} is defined more than once")]
    DuplicateSpot(SpotId),

    #[error("spot {0} is not defined")]
    UnknownSpot(SpotId),

    #[error("edge {source_spot} - {target} links spots in the same frame {frame}")]
    NotTimeOriented {
        source_spot: SpotId,
        target: SpotId,
        frame: Frame,
    },

    #[error("spots {0} and {1} are already linked")]
    DuplicateEdge(SpotId, SpotId),

    #[error("spot {spot} is claimed by both {first} and {second}")]
    SpotInTwoTracks {
        spot: SpotId,
        first: TrackId,
        second: TrackId,
    },

    #[error("edge {source_spot} - {target} crosses track boundaries")]
    EdgeCrossesTracks { source_spot: SpotId, target: SpotId },

    #[error("spots of {0} are not all linked together")]
    DisconnectedTrack(TrackId),

    #[error("too many tracks: {0} exceeds the track ID range")]
    TooManyTracks(usize),
}
