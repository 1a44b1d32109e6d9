//! Visibility persistence
//!
//! Only the `visible` flag per layer is worth persisting across sessions:
//! geometry and derived data are always re-fetched or re-derived, never
//! stored, so a stale file cannot resurrect stale data. After applying a
//! snapshot, call
//! [`LayerRegistry::load_visible_layers`](crate::layer::LayerRegistry::load_visible_layers)
//! to fetch the datasets the flags now point at.

use crate::layer::{LayerId, LayerRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while saving or loading a snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Snapshot file could not be read or written
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid JSON
    #[error("Snapshot parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-layer visibility, the only persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityEntry {
    pub layer_id: LayerId,
    pub visible: bool,
}

/// A visibility snapshot of every layer in manifest order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisibilitySnapshot {
    pub layers: Vec<VisibilityEntry>,
}

impl VisibilitySnapshot {
    /// Captures the current visibility of every layer.
    pub fn capture(registry: &LayerRegistry) -> Self {
        Self {
            layers: registry
                .all_layers()
                .map(|layer| VisibilityEntry {
                    layer_id: layer.id.clone(),
                    visible: layer.visible,
                })
                .collect(),
        }
    }

    /// Applies the snapshot's flags to the registry.
    ///
    /// Only flags change - no loads are triggered here. Entries for ids the
    /// manifest no longer knows are logged and skipped.
    pub fn apply(&self, registry: &mut LayerRegistry) {
        for entry in &self.layers {
            match registry.find_layer_mut(&entry.layer_id) {
                Some(layer) => layer.visible = entry.visible,
                None => {
                    warn!(layer_id = %entry.layer_id, "Snapshot entry for unknown layer skipped")
                }
            }
        }
        debug!(entry_count = self.layers.len(), "Visibility snapshot applied");
    }

    /// Writes the snapshot as JSON.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path.as_ref(), json).await?;
        Ok(())
    }

    /// Reads a snapshot from JSON.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        Ok(serde_json::from_str(&text)?)
    }
}
