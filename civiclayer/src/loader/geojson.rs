//! GeoJSON dataset loader
//!
//! Loads a FeatureCollection file. Polygon statistic layers (population,
//! income) configure a stat field; the loader computes its numeric range
//! into [`LegendData`](crate::layer::LegendData) for the rendering side's
//! color ramp.
//!
//! Parsing is lenient at the feature level: a feature whose geometry is
//! missing or of an unmodeled kind keeps its properties with
//! `geometry: None` and is simply invisible to point queries.

use super::types::{LayerBundle, LayerLoader, LoadError};
use crate::feature::{Feature, FeatureCollection, Geometry};
use crate::layer::{LayerSummary, LegendData, TableRow};
use chrono::Utc;
use serde_json::{json, Value};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tracing::{debug, info};

/// Loads a layer from a GeoJSON FeatureCollection file.
#[derive(Debug, Clone)]
pub struct GeoJsonLoader {
    path: PathBuf,
    stat_field: Option<String>,
    id_property: String,
    name_property: String,
}

impl GeoJsonLoader {
    /// Creates a loader for the given GeoJSON file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            stat_field: None,
            id_property: "id".to_string(),
            name_property: "name".to_string(),
        }
    }

    /// Computes legend statistics over the given numeric property.
    pub fn with_stat_field(mut self, field: impl Into<String>) -> Self {
        self.stat_field = Some(field.into());
        self
    }

    /// Overrides the property used as row id (e.g. a village code).
    pub fn with_id_property(mut self, property: impl Into<String>) -> Self {
        self.id_property = property.into();
        self
    }

    /// Overrides the property used as row name.
    pub fn with_name_property(mut self, property: impl Into<String>) -> Self {
        self.name_property = property.into();
        self
    }
}

impl LayerLoader for GeoJsonLoader {
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<LayerBundle, LoadError>> + Send + '_>> {
        Box::pin(async move {
            let text = tokio::fs::read_to_string(&self.path).await?;
            let root: Value = serde_json::from_str(&text)?;

            let object = root
                .as_object()
                .ok_or_else(|| LoadError::InvalidCollection("root is not an object".to_string()))?;
            if object.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
                return Err(LoadError::InvalidCollection(
                    "type must be 'FeatureCollection'".to_string(),
                ));
            }
            let raw_features = object
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    LoadError::InvalidCollection("missing 'features' array".to_string())
                })?;

            let mut features = Vec::with_capacity(raw_features.len());
            let mut malformed = 0usize;
            for raw in raw_features {
                let properties = raw
                    .get("properties")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                let geometry = raw
                    .get("geometry")
                    .and_then(|g| serde_json::from_value::<Geometry>(g.clone()).ok());
                if geometry.is_none() {
                    malformed += 1;
                }
                features.push(Feature {
                    geometry,
                    properties,
                });
            }
            if malformed > 0 {
                debug!(
                    path = %self.path.display(),
                    malformed,
                    "Features kept without usable geometry"
                );
            }

            let legend = match &self.stat_field {
                Some(field) => Some(compute_legend(&features, field)?),
                None => None,
            };

            let table: Vec<TableRow> = features
                .iter()
                .map(|feature| {
                    let mut row = TableRow::new();
                    row.insert(
                        "id".to_string(),
                        json!(feature.property_display(&self.id_property).unwrap_or_default()),
                    );
                    row.insert(
                        "name".to_string(),
                        json!(feature
                            .property_display(&self.name_property)
                            .unwrap_or_default()),
                    );
                    let count = self
                        .stat_field
                        .as_ref()
                        .and_then(|field| feature.properties.get(field))
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0);
                    row.insert("count".to_string(), json!(count));
                    for (key, value) in &feature.properties {
                        if !row.contains_key(key) {
                            row.insert(key.clone(), value.clone());
                        }
                    }
                    row
                })
                .collect();

            let summary = LayerSummary {
                total_count: features.len(),
                description: format!("{} features from GeoJSON", features.len()),
                last_updated: Utc::now(),
                coverage_km2: None,
            };

            info!(
                path = %self.path.display(),
                feature_count = features.len(),
                has_legend = legend.is_some(),
                "GeoJSON dataset loaded"
            );

            Ok(LayerBundle {
                features: FeatureCollection { features },
                table,
                summary,
                legend,
            })
        })
    }

    fn name(&self) -> &str {
        "geojson"
    }
}

/// Min/max/mean of the configured field across all features that carry a
/// finite numeric value for it.
fn compute_legend(features: &[Feature], field: &str) -> Result<LegendData, LoadError> {
    let values: Vec<f64> = features
        .iter()
        .filter_map(|f| f.properties.get(field).and_then(Value::as_f64))
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() {
        return Err(LoadError::NoNumericField {
            field: field.to_string(),
        });
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    Ok(LegendData {
        field: field.to_string(),
        min,
        max,
        mean,
        sample_count: values.len(),
    })
}
