//! Layer type definitions

use crate::feature::FeatureCollection;
use crate::loader::LayerLoader;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Unique layer identifier, stable for the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// Creates a layer id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// What kind of geometry a layer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Point features (facilities, stations, stores)
    Point,
    /// Polygon features (village boundaries, statistical areas)
    Polygon,
    /// The synthetic analysis layer (mixed points and circles)
    Analysis,
}

/// Load lifecycle of a layer's dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// Never shown, dataset not fetched
    NotLoaded,
    /// A load is in flight; further toggles must not start another
    Loading,
    /// Dataset fetched and populated
    Loaded,
    /// Loader failed; visibility was reverted
    Failed,
}

/// One row of a layer's tabular projection.
///
/// Rows are open-ended property maps because each dataset carries its own
/// columns.
pub type TableRow = Map<String, Value>;

/// Aggregate metadata for a layer, recomputed whenever its geometry
/// collection changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSummary {
    /// Number of primary features (analysis circles are excluded)
    pub total_count: usize,
    /// Human-readable description of the layer contents
    pub description: String,
    /// When the summary was last recomputed
    pub last_updated: DateTime<Utc>,
    /// Total covered area in square kilometers (analysis layer only)
    pub coverage_km2: Option<f64>,
}

/// Legend statistics for polygon stat layers: the numeric range of the
/// configured field, used by the rendering side for its color ramp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendData {
    /// Property the statistics were computed over
    pub field: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// How many features carried a numeric value for the field
    pub sample_count: usize,
}

/// One togglable dataset layer.
///
/// All layer records are owned exclusively by the
/// [`LayerRegistry`](super::LayerRegistry); nothing else holds a mutable
/// reference to them.
pub struct Layer {
    /// Unique identifier, stable for the session
    pub id: LayerId,
    /// Display name
    pub name: String,
    /// Manifest group this layer belongs to
    pub group: String,
    /// Geometry kind
    pub kind: LayerKind,
    /// Rendering color hint carried from the manifest
    pub color: String,
    /// User-controlled visibility
    pub visible: bool,
    /// Dataset load lifecycle
    pub load_state: LoadState,
    /// Feature geometry; empty until loaded
    pub features: FeatureCollection,
    /// Tabular projection of the features
    pub table: Vec<TableRow>,
    /// Aggregate metadata
    pub summary: Option<LayerSummary>,
    /// Legend statistics (polygon stat layers)
    pub legend: Option<LegendData>,
    /// Stat field for polygon layers, carried for the rendering side
    pub stat_field: Option<String>,
    /// Dataset loader; `None` for the analysis layer
    pub(crate) loader: Option<Arc<dyn LayerLoader>>,
}

impl Layer {
    /// Whether this is the synthetic analysis layer.
    pub fn is_analysis(&self) -> bool {
        self.kind == LayerKind::Analysis
    }

    /// Number of features currently held.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("group", &self.group)
            .field("kind", &self.kind)
            .field("visible", &self.visible)
            .field("load_state", &self.load_state)
            .field("features", &self.features.len())
            .field("has_loader", &self.loader.is_some())
            .finish()
    }
}
