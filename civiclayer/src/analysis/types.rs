//! Analysis types

use crate::layer::LayerId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier of an analysis point.
///
/// Allocated from a per-session monotonic counter, so two probes can never
/// collide regardless of clock resolution. Comparable and stable for the
/// session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PointId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One feature found by a range query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeMatch {
    /// Layer the feature came from
    pub layer_id: LayerId,
    /// Display name of that layer
    pub layer_name: String,
    /// Feature identity: property `id`, falling back to `name`, then a
    /// sentinel
    pub feature_id: String,
    /// Display name: property `name`, falling back to `id`, then a sentinel
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Distance from the query center, rounded to whole meters
    pub distance_m: u64,
    /// Full property mapping of the matched feature
    pub properties: Map<String, Value>,
}

/// What a probe reported back to its caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    /// Id of the analysis point that was created
    pub point_id: PointId,
    /// Matches within the radius, ascending by distance
    pub matches: Vec<RangeMatch>,
    /// Match count per layer name, in first-encountered order
    pub layer_counts: IndexMap<String, usize>,
}
