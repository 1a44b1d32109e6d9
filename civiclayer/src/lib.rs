//! CivicLayer - Layer registry and spatial analysis for civic map data
//!
//! This library provides the core functionality of a municipal map viewer:
//! a registry of togglable dataset layers (long-term-care facilities, health
//! infrastructure, population and income statistics) loaded lazily from
//! CSV/GeoJSON files, and an analysis layer where user-placed probes report
//! the facilities within a fixed radius.
//!
//! # High-Level API
//!
//! ```ignore
//! use civiclayer::analysis::AnalysisLayerManager;
//! use civiclayer::config::Settings;
//! use civiclayer::layer::{LayerId, LayerRegistry};
//!
//! let settings = Settings::default();
//! let mut registry = LayerRegistry::from_manifest(manifest, &settings)?;
//!
//! // Show a layer; its dataset is fetched on first show
//! registry.set_visibility(&LayerId::new("clinics"), true).await;
//!
//! // Drop an analysis probe and inspect what is within 2 km
//! let mut manager = AnalysisLayerManager::new(LayerId::new("analysis"));
//! let report = manager.add_point(&mut registry, 25.0330, 121.5654);
//! ```

pub mod analysis;
pub mod config;
pub mod feature;
pub mod geo;
pub mod layer;
pub mod loader;
pub mod logging;
pub mod persist;
pub mod selection;
pub mod wkt;

/// Version of the CivicLayer library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
