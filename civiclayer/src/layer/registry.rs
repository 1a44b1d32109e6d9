//! Layer registry and lazy loading
//!
//! The registry owns all layer records and performs dataset loads when a
//! layer is first shown. A load is the only suspend point in the core:
//! it is bounded by the configured timeout and raced against the session
//! cancellation token, so a hung loader ends in `Failed` rather than a
//! layer stuck in `Loading` forever.

use super::manifest::{LayerManifest, ManifestError};
use super::types::{Layer, LayerId, LayerKind, LoadState};
use crate::config::Settings;
use crate::feature::FeatureCollection;
use crate::loader::LoadError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// A materialized manifest group.
#[derive(Debug)]
pub struct LayerGroup {
    pub name: String,
    pub layers: Vec<Layer>,
}

/// Result of a visibility change.
///
/// Failures never propagate as errors - one bad layer must not break the
/// rest of the map - but they are reported here so callers can tell a
/// failed load apart from an empty dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Layer is now hidden
    Hidden,
    /// Layer is now visible and its data was already present
    Shown,
    /// Layer is now visible and its dataset was loaded on this call
    Loaded { feature_count: usize },
    /// Load failed; visibility was reverted to hidden
    LoadFailed { reason: String },
    /// A load was already in flight; no second load was dispatched
    AlreadyLoading,
    /// No layer has this id; nothing was changed
    NotFound,
}

/// Owner of all layer state for one session.
pub struct LayerRegistry {
    groups: Vec<LayerGroup>,
    analysis_layer_id: Option<LayerId>,
    load_timeout: Duration,
    cancel: CancellationToken,
}

impl LayerRegistry {
    /// Builds the registry from a manifest.
    ///
    /// The analysis layer (at most one) starts `Loaded` with an empty
    /// collection; every other layer starts `NotLoaded` until first shown.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] on duplicate layer ids or more than one
    /// analysis layer.
    pub fn from_manifest(manifest: LayerManifest, settings: &Settings) -> Result<Self, ManifestError> {
        let mut analysis_layer_id: Option<LayerId> = None;
        let mut seen: Vec<LayerId> = Vec::new();
        let mut groups = Vec::with_capacity(manifest.groups.len());

        for group in manifest.groups {
            let mut layers = Vec::with_capacity(group.layers.len());
            for desc in group.layers {
                if seen.contains(&desc.id) {
                    return Err(ManifestError::DuplicateLayerId(desc.id));
                }
                seen.push(desc.id.clone());

                let is_analysis = desc.kind == LayerKind::Analysis;
                if is_analysis {
                    if let Some(existing) = &analysis_layer_id {
                        return Err(ManifestError::MultipleAnalysisLayers(
                            existing.clone(),
                            desc.id,
                        ));
                    }
                    analysis_layer_id = Some(desc.id.clone());
                }

                layers.push(Layer {
                    id: desc.id,
                    name: desc.name,
                    group: group.name.clone(),
                    kind: desc.kind,
                    color: desc.color,
                    visible: desc.visible,
                    // The analysis layer never loads from a dataset
                    load_state: if is_analysis {
                        LoadState::Loaded
                    } else {
                        LoadState::NotLoaded
                    },
                    features: FeatureCollection::new(),
                    table: Vec::new(),
                    summary: None,
                    legend: None,
                    stat_field: desc.stat_field,
                    loader: desc.loader,
                });
            }
            groups.push(LayerGroup {
                name: group.name,
                layers,
            });
        }

        info!(
            layer_count = seen.len(),
            group_count = groups.len(),
            has_analysis_layer = analysis_layer_id.is_some(),
            "Layer registry initialized"
        );

        Ok(Self {
            groups,
            analysis_layer_id,
            load_timeout: settings.load_timeout,
            cancel: CancellationToken::new(),
        })
    }

    /// The materialized groups, in manifest order.
    pub fn groups(&self) -> &[LayerGroup] {
        &self.groups
    }

    /// Id of the analysis layer, if the manifest declared one.
    pub fn analysis_layer_id(&self) -> Option<&LayerId> {
        self.analysis_layer_id.as_ref()
    }

    /// Token that aborts in-flight loads when cancelled (session shutdown).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Finds a layer by id, scanning across all groups.
    pub fn find_layer(&self, id: &LayerId) -> Option<&Layer> {
        self.all_layers().find(|layer| &layer.id == id)
    }

    /// Mutable lookup by id.
    pub fn find_layer_mut(&mut self, id: &LayerId) -> Option<&mut Layer> {
        self.groups
            .iter_mut()
            .flat_map(|g| g.layers.iter_mut())
            .find(|layer| &layer.id == id)
    }

    /// All layers flattened in manifest order.
    pub fn all_layers(&self) -> impl Iterator<Item = &Layer> {
        self.groups.iter().flat_map(|g| g.layers.iter())
    }

    /// Layers currently shown.
    pub fn visible_layers(&self) -> impl Iterator<Item = &Layer> {
        self.all_layers().filter(|layer| layer.visible)
    }

    /// Layers with a load in flight.
    pub fn loading_layers(&self) -> impl Iterator<Item = &Layer> {
        self.all_layers()
            .filter(|layer| layer.load_state == LoadState::Loading)
    }

    /// Shows or hides a layer, lazily loading its dataset on first show.
    ///
    /// Exactly one load is dispatched per transition to visible while the
    /// dataset is absent; a layer already `Loading` is left alone. On
    /// loader failure, timeout, or cancellation the layer's visibility is
    /// reverted so a failed layer never appears "on".
    ///
    /// Unknown ids and failures are reported through the returned
    /// [`ToggleOutcome`], never as errors.
    pub async fn set_visibility(&mut self, id: &LayerId, visible: bool) -> ToggleOutcome {
        let (loader, layer_name) = {
            let Some(layer) = self.find_layer_mut(id) else {
                warn!(layer_id = %id, "Visibility change for unknown layer ignored");
                return ToggleOutcome::NotFound;
            };

            layer.visible = visible;
            debug!(layer_id = %id, visible, "Layer visibility changed");

            if !visible {
                return ToggleOutcome::Hidden;
            }
            if layer.is_analysis() || layer.load_state == LoadState::Loaded {
                return ToggleOutcome::Shown;
            }
            if layer.load_state == LoadState::Loading {
                // Request coalescing: one load in flight per layer
                debug!(layer_id = %id, "Load already in flight, not dispatching another");
                return ToggleOutcome::AlreadyLoading;
            }

            layer.load_state = LoadState::Loading;
            (layer.loader.clone(), layer.name.clone())
        };

        let result = match loader {
            Some(loader) => {
                info!(layer_id = %id, layer = %layer_name, loader = loader.name(), "Loading layer dataset");
                let cancel = self.cancel.clone();
                tokio::select! {
                    _ = cancel.cancelled() => Err(LoadError::Cancelled),
                    loaded = tokio::time::timeout(self.load_timeout, loader.load()) => {
                        match loaded {
                            Ok(result) => result,
                            Err(_) => Err(LoadError::Timeout(self.load_timeout.as_secs())),
                        }
                    }
                }
            }
            None => Err(LoadError::NotConfigured),
        };

        // The layer cannot disappear between the two lookups; if it somehow
        // did, there is nothing left to update.
        let Some(layer) = self.find_layer_mut(id) else {
            return ToggleOutcome::NotFound;
        };

        match result {
            Ok(bundle) => {
                let feature_count = bundle.features.len();
                layer.features = bundle.features;
                layer.table = bundle.table;
                layer.summary = Some(bundle.summary);
                layer.legend = bundle.legend;
                layer.load_state = LoadState::Loaded;

                info!(
                    layer_id = %id,
                    layer = %layer_name,
                    feature_count,
                    "Layer dataset loaded"
                );
                ToggleOutcome::Loaded { feature_count }
            }
            Err(e) => {
                error!(layer_id = %id, layer = %layer_name, error = %e, "Layer load failed");
                layer.load_state = LoadState::Failed;
                // A failed layer must never appear "on"
                layer.visible = false;
                ToggleOutcome::LoadFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Flips a layer's visibility.
    pub async fn toggle_visibility(&mut self, id: &LayerId) -> ToggleOutcome {
        let Some(currently_visible) = self.find_layer(id).map(|layer| layer.visible) else {
            warn!(layer_id = %id, "Toggle for unknown layer ignored");
            return ToggleOutcome::NotFound;
        };
        self.set_visibility(id, !currently_visible).await
    }

    /// Loads every layer that is visible but still `NotLoaded`.
    ///
    /// Used after restoring a persisted visibility snapshot, where flags
    /// are set without fetching any data.
    pub async fn load_visible_layers(&mut self) -> Vec<(LayerId, ToggleOutcome)> {
        let pending: Vec<LayerId> = self
            .all_layers()
            .filter(|layer| layer.visible && layer.load_state == LoadState::NotLoaded)
            .map(|layer| layer.id.clone())
            .collect();

        let mut outcomes = Vec::with_capacity(pending.len());
        for id in pending {
            let outcome = self.set_visibility(&id, true).await;
            outcomes.push((id, outcome));
        }
        outcomes
    }
}
