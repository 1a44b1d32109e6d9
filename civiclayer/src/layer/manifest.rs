//! Layer manifest
//!
//! The manifest is the fixed, session-start description of every layer the
//! application knows about, grouped the way the layer panel presents them.
//! Layers are not user-extensible at runtime: the registry is built from
//! the manifest once and only visibility changes afterwards.

use super::types::{LayerId, LayerKind};
use crate::loader::LayerLoader;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors detected while turning a manifest into a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// Two descriptors share a layer id
    #[error("Duplicate layer id '{0}' in manifest")]
    DuplicateLayerId(LayerId),

    /// More than one descriptor has kind Analysis
    #[error("Manifest declares more than one analysis layer ('{0}' and '{1}')")]
    MultipleAnalysisLayers(LayerId, LayerId),
}

/// Describes one layer before the registry materializes it.
#[derive(Clone)]
pub struct LayerDescriptor {
    pub id: LayerId,
    pub name: String,
    pub kind: LayerKind,
    /// Rendering color hint
    pub color: String,
    /// Dataset loader; required for everything except the analysis layer
    pub loader: Option<Arc<dyn LayerLoader>>,
    /// Stat field for polygon layers
    pub stat_field: Option<String>,
    /// Initial visibility
    pub visible: bool,
}

impl LayerDescriptor {
    /// Describes a point dataset layer.
    pub fn point(id: impl Into<LayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: LayerKind::Point,
            color: "orange".to_string(),
            loader: None,
            stat_field: None,
            visible: false,
        }
    }

    /// Describes a polygon dataset layer.
    pub fn polygon(id: impl Into<LayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: LayerKind::Polygon,
            color: "purple".to_string(),
            loader: None,
            stat_field: None,
            visible: false,
        }
    }

    /// Describes the synthetic analysis layer: no loader, visible from the
    /// start, always considered loaded.
    pub fn analysis(id: impl Into<LayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: LayerKind::Analysis,
            color: "red".to_string(),
            loader: None,
            stat_field: None,
            visible: true,
        }
    }

    /// Sets the rendering color hint.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Sets the dataset loader.
    pub fn with_loader(mut self, loader: Arc<dyn LayerLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Sets the stat field a polygon layer is colored by.
    pub fn with_stat_field(mut self, field: impl Into<String>) -> Self {
        self.stat_field = Some(field.into());
        self
    }
}

impl fmt::Debug for LayerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("has_loader", &self.loader.is_some())
            .finish()
    }
}

/// A named group of layer descriptors, as shown in the layer panel.
#[derive(Debug, Clone)]
pub struct ManifestGroup {
    pub name: String,
    pub layers: Vec<LayerDescriptor>,
}

/// The fixed session-start layer list.
#[derive(Debug, Clone, Default)]
pub struct LayerManifest {
    pub groups: Vec<ManifestGroup>,
}

impl LayerManifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a named group of descriptors.
    pub fn with_group(mut self, name: impl Into<String>, layers: Vec<LayerDescriptor>) -> Self {
        self.groups.push(ManifestGroup {
            name: name.into(),
            layers,
        });
        self
    }

    /// Iterates all descriptors in manifest order.
    pub fn descriptors(&self) -> impl Iterator<Item = &LayerDescriptor> {
        self.groups.iter().flat_map(|g| g.layers.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_group_order() {
        let manifest = LayerManifest::new()
            .with_group("a", vec![LayerDescriptor::point("p1", "P1")])
            .with_group("b", vec![LayerDescriptor::point("p2", "P2")]);

        let ids: Vec<_> = manifest.descriptors().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_analysis_descriptor_defaults() {
        let desc = LayerDescriptor::analysis("analysis", "Analysis layer");
        assert_eq!(desc.kind, LayerKind::Analysis);
        assert!(desc.visible, "Analysis layer starts visible");
        assert!(desc.loader.is_none());
    }

    #[test]
    fn test_point_descriptor_defaults_hidden() {
        let desc = LayerDescriptor::point("clinics", "Clinics");
        assert!(!desc.visible);
        assert_eq!(desc.kind, LayerKind::Point);
    }
}
