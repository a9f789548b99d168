//! Spots and the edges linking them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::identifier::{Frame, SpotId};

/// A tracked object instance at one frame.
///
/// Only the identifier and the frame matter to layout. The display name is
/// the secondary key for sibling ordering; feature values are carried along
/// for consumers of the model.
///
/// # Examples
///
/// ```
/// use trackscheme_core::{identifier::SpotId, spot::Spot};
///
/// let spot = Spot::new(SpotId::new(1), "A", 0).with_feature("QUALITY", 0.8);
/// assert_eq!(spot.frame(), 0);
/// assert_eq!(spot.feature("QUALITY"), Some(0.8));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    id: SpotId,
    name: String,
    frame: Frame,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    features: IndexMap<String, f64>,
}

impl Spot {
    /// Creates a spot without feature values.
    pub fn new(id: SpotId, name: impl Into<String>, frame: Frame) -> Self {
        Self {
            id,
            name: name.into(),
            frame,
            features: IndexMap::new(),
        }
    }

    /// Adds a feature value (builder style).
    pub fn with_feature(mut self, key: impl Into<String>, value: f64) -> Self {
        self.features.insert(key.into(), value);
        self
    }

    pub fn id(&self) -> SpotId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Returns a feature value, if present.
    pub fn feature(&self, key: &str) -> Option<f64> {
        self.features.get(key).copied()
    }

    /// Returns all feature values in insertion order.
    pub fn features(&self) -> &IndexMap<String, f64> {
        &self.features
    }
}

/// A weighted link between two spots.
///
/// Edges are stored time-oriented: `source` is always the spot with the
/// smaller frame. [`Edge::oriented`] performs the swap for endpoints given in
/// reverse time order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    source: SpotId,
    target: SpotId,
    weight: f64,
}

impl Edge {
    /// Creates an edge oriented from the earlier spot to the later one.
    ///
    /// Endpoints are swapped when `a` is later than `b`. Equal frames keep the
    /// given order; the model rejects such edges before they are stored.
    pub fn oriented(a: &Spot, b: &Spot, weight: f64) -> Self {
        if a.frame() <= b.frame() {
            Self {
                source: a.id(),
                target: b.id(),
                weight,
            }
        } else {
            Self {
                source: b.id(),
                target: a.id(),
                weight,
            }
        }
    }

    pub fn source(&self) -> SpotId {
        self.source
    }

    pub fn target(&self) -> SpotId {
        self.target
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns both endpoints as `(source, target)`.
    pub fn endpoints(&self) -> (SpotId, SpotId) {
        (self.source, self.target)
    }

    /// Returns the endpoint opposite to `spot`, or `None` if `spot` is not an
    /// endpoint of this edge.
    pub fn opposite(&self, spot: SpotId) -> Option<SpotId> {
        if spot == self.source {
            Some(self.target)
        } else if spot == self.target {
            Some(self.source)
        } else {
            None
        }
    }
}
