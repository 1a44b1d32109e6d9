//! Loader trait and bundle types

use crate::feature::FeatureCollection;
use crate::layer::{LayerSummary, LegendData, TableRow};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Dataset file could not be read
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing failed
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// File parsed but is not a GeoJSON FeatureCollection
    #[error("Invalid GeoJSON: {0}")]
    InvalidCollection(String),

    /// A required CSV column is missing
    #[error("Missing column '{column}' in {path}")]
    MissingColumn { column: String, path: String },

    /// The configured stat field held no numeric values
    #[error("No numeric values found for field '{field}'")]
    NoNumericField { field: String },

    /// Load exceeded the configured timeout
    #[error("Load timed out after {0} seconds")]
    Timeout(u64),

    /// Load was cancelled by session shutdown
    #[error("Load cancelled")]
    Cancelled,

    /// The layer has no loader configured
    #[error("No loader configured for this layer")]
    NotConfigured,
}

/// The normalized result of loading one layer's dataset.
#[derive(Debug, Clone)]
pub struct LayerBundle {
    /// Parsed geometry
    pub features: FeatureCollection,
    /// Row records projected from the feature properties
    pub table: Vec<TableRow>,
    /// Aggregate metadata
    pub summary: LayerSummary,
    /// Optional legend statistics (polygon stat layers)
    pub legend: Option<LegendData>,
}

/// Trait for dataset loaders.
///
/// Implementors fetch and normalize one layer's dataset. The future is
/// boxed so loaders can be stored as trait objects in layer descriptors.
///
/// # Example
///
/// ```ignore
/// use civiclayer::loader::{CsvPointLoader, LayerLoader};
///
/// let loader = CsvPointLoader::new("data/csv/clinics.csv");
/// let bundle = loader.load().await?;
/// println!("{} features", bundle.features.len());
/// ```
pub trait LayerLoader: Send + Sync {
    /// Loads and normalizes the dataset.
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<LayerBundle, LoadError>> + Send + '_>>;

    /// Returns the loader's name for logging and identification.
    fn name(&self) -> &str;
}
