//! Identifier types for spots and tracks.
//!
//! Both identifiers are small `Copy` newtypes so they can be used freely as
//! map keys without borrowing from the model that issued them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A discrete time index. Frames run from `0` to the largest frame present in
/// the lineage graph.
pub type Frame = usize;

/// Unique identifier of a spot.
///
/// # Examples
///
/// ```
/// use trackscheme_core::identifier::SpotId;
///
/// let id = SpotId::new(42);
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.to_string(), "#42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpotId(u64);

impl SpotId {
    /// Creates a spot identifier from its raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for SpotId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable identifier of a track.
///
/// Track IDs are issued by the model in declaration order. They identify a
/// track; they do not decide its left-to-right position in a scheme, which
/// follows the track's display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(u32);

impl TrackId {
    /// Creates a track identifier from its raw value.
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Track#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_id_ordering_follows_raw_value() {
        assert!(SpotId::new(3) < SpotId::new(10));
        assert_eq!(SpotId::from(7), SpotId::new(7));
    }

    #[test]
    fn test_track_id_display() {
        assert_eq!(TrackId::new(5).to_string(), "Track#5");
    }
}
