//! CSV point dataset loader
//!
//! The municipal facility datasets are CSV exports with a WKT column
//! (`POINT (lng lat)`) and free-form attribute columns. Rows whose WKT
//! cell is missing or unparseable are skipped and counted, never fatal:
//! one bad row must not lose the rest of the dataset.

use super::types::{LayerBundle, LayerLoader, LoadError};
use crate::feature::{Feature, FeatureCollection};
use crate::layer::{LayerSummary, TableRow};
use crate::wkt;
use chrono::Utc;
use serde_json::{json, Map};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tracing::{debug, info, warn};

/// Default name of the WKT coordinate column.
const DEFAULT_WKT_COLUMN: &str = "WKT";

/// Default name of the column promoted to the `name` property.
const DEFAULT_NAME_COLUMN: &str = "name";

/// Loads a point layer from a WKT-bearing CSV file.
#[derive(Debug, Clone)]
pub struct CsvPointLoader {
    path: PathBuf,
    wkt_column: String,
    name_column: String,
}

impl CsvPointLoader {
    /// Creates a loader for the given CSV file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            wkt_column: DEFAULT_WKT_COLUMN.to_string(),
            name_column: DEFAULT_NAME_COLUMN.to_string(),
        }
    }

    /// Overrides the column holding WKT coordinates.
    pub fn with_wkt_column(mut self, column: impl Into<String>) -> Self {
        self.wkt_column = column.into();
        self
    }

    /// Overrides the column promoted to the `name` property. Datasets name
    /// their facility column differently (`institution`, `store_name`, ...).
    pub fn with_name_column(mut self, column: impl Into<String>) -> Self {
        self.name_column = column.into();
        self
    }
}

impl LayerLoader for CsvPointLoader {
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<LayerBundle, LoadError>> + Send + '_>> {
        Box::pin(async move {
            let text = tokio::fs::read_to_string(&self.path).await?;

            let mut reader = csv::ReaderBuilder::new()
                .has_headers(true)
                .trim(csv::Trim::All)
                .from_reader(text.as_bytes());

            let headers = reader.headers()?.clone();
            let wkt_index = headers
                .iter()
                .position(|h| h == self.wkt_column)
                .ok_or_else(|| LoadError::MissingColumn {
                    column: self.wkt_column.clone(),
                    path: self.path.display().to_string(),
                })?;

            let mut features = Vec::new();
            let mut skipped = 0usize;

            for (row, record) in reader.records().enumerate() {
                let record = record?;

                let position = match record.get(wkt_index).map(wkt::parse_point) {
                    Some(Ok(position)) => position,
                    Some(Err(e)) => {
                        // Header is row 1, data starts at row 2
                        debug!(row = row + 2, error = %e, "Skipping row with invalid WKT");
                        skipped += 1;
                        continue;
                    }
                    None => {
                        skipped += 1;
                        continue;
                    }
                };

                let mut properties = Map::new();
                for (header, cell) in headers.iter().zip(record.iter()) {
                    if header == self.wkt_column {
                        continue;
                    }
                    properties.insert(header.to_string(), json!(cell));
                }
                // Promote the configured column so downstream name lookups
                // work without knowing each dataset's schema
                if self.name_column != DEFAULT_NAME_COLUMN && !properties.contains_key("name") {
                    if let Some(value) = properties.get(&self.name_column).cloned() {
                        properties.insert("name".to_string(), value);
                    }
                }

                features.push(Feature::point(position, properties));
            }

            if skipped > 0 {
                warn!(
                    path = %self.path.display(),
                    skipped,
                    "Rows skipped for missing or invalid WKT"
                );
            }

            let table: Vec<TableRow> = features
                .iter()
                .map(|feature| {
                    let (id, name) = feature.identity();
                    let mut row = TableRow::new();
                    row.insert("id".to_string(), json!(id));
                    row.insert("name".to_string(), json!(name));
                    row.insert("count".to_string(), json!(1));
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
                description: format!("{} point records converted from CSV", features.len()),
                last_updated: Utc::now(),
                coverage_km2: None,
            };

            info!(
                path = %self.path.display(),
                feature_count = features.len(),
                skipped,
                "CSV dataset loaded"
            );

            Ok(LayerBundle {
                features: FeatureCollection { features },
                table,
                summary,
                legend: None,
            })
        })
    }

    fn name(&self) -> &str {
        "csv-points"
    }
}
