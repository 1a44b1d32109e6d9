//! Dataset loader abstraction
//!
//! This module provides the trait and implementations for loading layer
//! datasets from various local file formats (WKT-bearing CSV exports,
//! GeoJSON feature collections).
//!
//! A loader produces a normalized [`LayerBundle`] - geometry, tabular
//! projection, summary, and optional legend - which the layer registry
//! stores on the layer when it is first shown. Loaders never mutate
//! registry state themselves.

mod csv_points;
mod geojson;
mod types;

pub use csv_points::CsvPointLoader;
pub use geojson::GeoJsonLoader;
pub use types::{LayerBundle, LayerLoader, LoadError};
