//! Layer registry
//!
//! A layer is a named, independently toggled dataset rendered on the map.
//! The [`LayerRegistry`] owns every layer record for the session: it is
//! built once from a fixed [`LayerManifest`], answers lookups for the
//! rendering side, and performs lazy dataset loading when a layer is first
//! shown.
//!
//! # Architecture
//!
//! ```text
//! LayerRegistry
//! ├── Group: "analysis"
//! │   └── Layer "analysis" (kind Analysis, always Loaded)
//! ├── Group: "infrastructure"
//! │   ├── Layer "hospitals"  (kind Point, lazy CSV loader)
//! │   └── Layer "clinics"    (kind Point, lazy CSV loader)
//! └── Group: "statistics"
//!     └── Layer "income-median" (kind Polygon, lazy GeoJSON loader)
//! ```
//!
//! Visibility toggles are the only mutation the registry performs on its
//! own; the analysis layer's geometry is mutated exclusively through
//! [`crate::analysis::AnalysisLayerManager`].

mod manifest;
mod registry;
mod types;

pub use manifest::{LayerDescriptor, LayerManifest, ManifestError, ManifestGroup};
pub use registry::{LayerGroup, LayerRegistry, ToggleOutcome};
pub use types::{Layer, LayerId, LayerKind, LayerSummary, LegendData, LoadState, TableRow};
