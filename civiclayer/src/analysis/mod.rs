//! Spatial analysis core
//!
//! Two pieces sit on top of the layer registry:
//!
//! - the range query ([`points_within_range`]): a brute-force scan of every
//!   visible, loaded point layer for features within a radius of a center,
//!   sorted by distance. Pure read, deterministic for a given registry
//!   state.
//! - the [`AnalysisLayerManager`]: owns the synthetic analysis layer's
//!   contents. Each user probe runs a range query, stores the result as a
//!   paired point + circle feature, and recomputes the layer's summary and
//!   table projections.

mod manager;
mod range;
mod types;

pub use manager::AnalysisLayerManager;
pub use range::{group_by_layer, points_within_range};
pub use types::{PointId, ProbeReport, RangeMatch};
