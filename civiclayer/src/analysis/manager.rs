//! Analysis layer manager
//!
//! The manager is the only component that mutates the analysis layer's
//! geometry collection. Each probe becomes a pair of features - the point
//! itself and a circle visualizing its radius - linked by a `parent_id`
//! back-reference. The pair is created and deleted atomically, and the
//! layer's summary and table are pure derived state, recomputed after
//! every mutation.

use super::range::{group_by_layer, points_within_range};
use super::types::{PointId, ProbeReport};
use crate::config::DEFAULT_ANALYSIS_RADIUS_M;
use crate::feature::{Feature, FeatureCollection, Geometry};
use crate::geo::LatLng;
use crate::layer::{Layer, LayerId, LayerRegistry, LayerSummary, TableRow};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::f64::consts::PI;
use tracing::{debug, info, warn};

/// Property key distinguishing analysis points from their circles.
const PROP_TYPE: &str = "type";
const TYPE_POINT: &str = "analysis-point";
const TYPE_CIRCLE: &str = "analysis-circle";

/// Owns the contents of the synthetic analysis layer.
///
/// Point ids come from a per-session monotonic counter and are never
/// reused, even after deletions. Display ordinals, by contrast, are
/// recomputed from the live point count, so display numbers can repeat
/// once points are deleted - the id is the stable identity, the ordinal is
/// cosmetic.
pub struct AnalysisLayerManager {
    layer_id: LayerId,
    next_point_id: u64,
    default_radius_m: f64,
    clock: fn() -> DateTime<Utc>,
}

impl AnalysisLayerManager {
    /// Creates a manager for the analysis layer with the given id.
    pub fn new(layer_id: LayerId) -> Self {
        Self {
            layer_id,
            next_point_id: 1,
            default_radius_m: DEFAULT_ANALYSIS_RADIUS_M,
            clock: Utc::now,
        }
    }

    /// Overrides the radius used when none is given per probe.
    pub fn with_default_radius(mut self, radius_m: f64) -> Self {
        self.default_radius_m = radius_m;
        self
    }

    /// Injects the clock used for creation timestamps. Tests use a fixed
    /// clock for deterministic output.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Id of the layer this manager writes to.
    pub fn layer_id(&self) -> &LayerId {
        &self.layer_id
    }

    /// Adds an analysis probe at the default radius.
    pub fn add_point(
        &mut self,
        registry: &mut LayerRegistry,
        lat: f64,
        lng: f64,
    ) -> Option<ProbeReport> {
        let radius_m = self.default_radius_m;
        self.add_point_with_radius(registry, lat, lng, radius_m)
    }

    /// Adds an analysis probe: runs the range query against every other
    /// layer, appends the paired point and circle features, and recomputes
    /// the layer's derived summary and table.
    ///
    /// Returns `None` - a logged no-op, never a panic - when the registry
    /// has no analysis layer.
    pub fn add_point_with_radius(
        &mut self,
        registry: &mut LayerRegistry,
        lat: f64,
        lng: f64,
        radius_m: f64,
    ) -> Option<ProbeReport> {
        if registry.find_layer(&self.layer_id).is_none() {
            warn!(layer_id = %self.layer_id, "Analysis layer missing, probe ignored");
            return None;
        }

        let center = LatLng { lat, lng };
        let matches = points_within_range(registry, center, radius_m);
        let layer_counts = group_by_layer(&matches);

        let point_id = PointId(self.next_point_id);
        self.next_point_id += 1;
        let created_at = (self.clock)();

        let layer = registry.find_layer_mut(&self.layer_id)?;
        let ordinal = count_points(&layer.features) + 1;

        let matches_value = serde_json::to_value(&matches).unwrap_or(Value::Null);
        let counts_value = serde_json::to_value(&layer_counts).unwrap_or(Value::Null);

        let mut point_props = serde_json::Map::new();
        point_props.insert(PROP_TYPE.to_string(), json!(TYPE_POINT));
        point_props.insert("id".to_string(), json!(point_id.0));
        point_props.insert("layer_id".to_string(), json!(self.layer_id.as_str()));
        point_props.insert("name".to_string(), json!(format!("Analysis Point {}", ordinal)));
        point_props.insert("lat".to_string(), json!(lat));
        point_props.insert("lng".to_string(), json!(lng));
        point_props.insert("radius_m".to_string(), json!(radius_m));
        point_props.insert("created_at".to_string(), json!(created_at.to_rfc3339()));
        point_props.insert("match_count".to_string(), json!(matches.len()));
        point_props.insert("matches".to_string(), matches_value.clone());
        point_props.insert("layer_counts".to_string(), counts_value);

        let mut circle_props = serde_json::Map::new();
        circle_props.insert(PROP_TYPE.to_string(), json!(TYPE_CIRCLE));
        circle_props.insert("id".to_string(), json!(format!("{}-circle", point_id)));
        circle_props.insert("parent_id".to_string(), json!(point_id.0));
        circle_props.insert("layer_id".to_string(), json!(self.layer_id.as_str()));
        circle_props.insert(
            "name".to_string(),
            json!(format!("Analysis Range {}", ordinal)),
        );
        circle_props.insert("lat".to_string(), json!(lat));
        circle_props.insert("lng".to_string(), json!(lng));
        circle_props.insert("radius_m".to_string(), json!(radius_m));
        circle_props.insert("match_count".to_string(), json!(matches.len()));
        circle_props.insert("matches".to_string(), matches_value);

        // Point first, then its circle
        layer.features.features.push(Feature {
            geometry: Some(Geometry::Point {
                coordinates: [lng, lat],
            }),
            properties: point_props,
        });
        layer.features.features.push(Feature {
            geometry: Some(Geometry::Point {
                coordinates: [lng, lat],
            }),
            properties: circle_props,
        });

        self.refresh_derived(layer);

        info!(
            point_id = %point_id,
            lat,
            lng,
            radius_m,
            match_count = matches.len(),
            "Analysis point added"
        );

        Some(ProbeReport {
            point_id,
            matches,
            layer_counts,
        })
    }

    /// Deletes a probe and its paired circle in one atomic pass.
    ///
    /// Returns whether anything was removed; an unknown id or a missing
    /// analysis layer is a logged no-op.
    pub fn delete_point(&self, registry: &mut LayerRegistry, point_id: PointId) -> bool {
        let Some(layer) = registry.find_layer_mut(&self.layer_id) else {
            warn!(layer_id = %self.layer_id, "Analysis layer missing, delete ignored");
            return false;
        };

        let before = layer.features.features.len();
        layer.features.features.retain(|f| {
            let is_target_point = is_type(f, TYPE_POINT) && prop_u64(f, "id") == Some(point_id.0);
            let is_target_circle =
                is_type(f, TYPE_CIRCLE) && prop_u64(f, "parent_id") == Some(point_id.0);
            !is_target_point && !is_target_circle
        });
        let removed = layer.features.features.len() != before;

        self.refresh_derived(layer);

        if removed {
            info!(point_id = %point_id, "Analysis point deleted");
        } else {
            debug!(point_id = %point_id, "Delete for unknown analysis point ignored");
        }
        removed
    }

    /// Empties the analysis layer and resets its derived state to zero.
    /// Idempotent.
    pub fn clear(&self, registry: &mut LayerRegistry) {
        let Some(layer) = registry.find_layer_mut(&self.layer_id) else {
            warn!(layer_id = %self.layer_id, "Analysis layer missing, clear ignored");
            return;
        };

        layer.features.features.clear();
        self.refresh_derived(layer);
        info!("Analysis layer cleared");
    }

    /// Recomputes the layer's summary and table from its geometry
    /// collection. Circles are excluded from counts; coverage assumes no
    /// overlap between probe circles.
    fn refresh_derived(&self, layer: &mut Layer) {
        let points: Vec<&Feature> = layer
            .features
            .features
            .iter()
            .filter(|f| is_type(f, TYPE_POINT))
            .collect();

        let total_count = points.len();
        let coverage_km2: f64 = points
            .iter()
            .map(|f| {
                let radius_m = prop_f64(f, "radius_m").unwrap_or(self.default_radius_m);
                PI * (radius_m / 1000.0).powi(2)
            })
            .sum();

        layer.summary = Some(LayerSummary {
            total_count,
            description: format!(
                "{} analysis points, each with a {:.0} km analysis radius (no overlap accounted for)",
                total_count,
                self.default_radius_m / 1000.0
            ),
            last_updated: (self.clock)(),
            coverage_km2: Some(coverage_km2),
        });

        layer.table = points
            .iter()
            .enumerate()
            .map(|(index, f)| {
                let radius_m = prop_f64(f, "radius_m").unwrap_or(self.default_radius_m);
                let mut row = TableRow::new();
                row.insert(
                    "id".to_string(),
                    f.properties.get("id").cloned().unwrap_or(Value::Null),
                );
                row.insert("ordinal".to_string(), json!(index + 1));
                row.insert(
                    "name".to_string(),
                    f.properties.get("name").cloned().unwrap_or(Value::Null),
                );
                row.insert(
                    "lat".to_string(),
                    json!(format!("{:.6}", prop_f64(f, "lat").unwrap_or(f64::NAN))),
                );
                row.insert(
                    "lng".to_string(),
                    json!(format!("{:.6}", prop_f64(f, "lng").unwrap_or(f64::NAN))),
                );
                row.insert(
                    "radius".to_string(),
                    json!(format!("{:.0} km", radius_m / 1000.0)),
                );
                row.insert(
                    "coverage".to_string(),
                    json!(format!("{:.2} km2", PI * (radius_m / 1000.0).powi(2))),
                );
                row.insert(
                    "created_at".to_string(),
                    f.properties
                        .get("created_at")
                        .cloned()
                        .unwrap_or(Value::Null),
                );
                row.insert(
                    "match_count".to_string(),
                    f.properties
                        .get("match_count")
                        .cloned()
                        .unwrap_or(json!(0)),
                );
                row.insert("layer_id".to_string(), json!(self.layer_id.as_str()));
                row
            })
            .collect();
    }
}

fn is_type(feature: &Feature, kind: &str) -> bool {
    feature.properties.get(PROP_TYPE).and_then(Value::as_str) == Some(kind)
}

fn prop_f64(feature: &Feature, key: &str) -> Option<f64> {
    feature.properties.get(key).and_then(Value::as_f64)
}

fn prop_u64(feature: &Feature, key: &str) -> Option<u64> {
    feature.properties.get(key).and_then(Value::as_u64)
}

fn count_points(features: &FeatureCollection) -> usize {
    features
        .features
        .iter()
        .filter(|f| is_type(f, TYPE_POINT))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::layer::{LayerDescriptor, LayerManifest, LoadState};
    use chrono::TimeZone;
    use serde_json::Map;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn test_registry() -> LayerRegistry {
        let manifest = LayerManifest::new()
            .with_group(
                "analysis",
                vec![LayerDescriptor::analysis("analysis", "Analysis layer")],
            )
            .with_group(
                "infrastructure",
                vec![LayerDescriptor::point("clinics", "Clinics")],
            );
        let mut registry = LayerRegistry::from_manifest(manifest, &Settings::default()).unwrap();

        // Pre-load one visible point layer ~111 m north of the test center
        let layer = registry.find_layer_mut(&LayerId::new("clinics")).unwrap();
        layer.visible = true;
        layer.load_state = LoadState::Loaded;
        layer.features.features.push(Feature::point(
            LatLng {
                lat: 25.0340,
                lng: 121.5654,
            },
            {
                let mut p = Map::new();
                p.insert("name".to_string(), json!("Wanhua Clinic"));
                p
            },
        ));
        registry
    }

    fn test_manager() -> AnalysisLayerManager {
        AnalysisLayerManager::new(LayerId::new("analysis")).with_clock(fixed_clock)
    }

    fn analysis_feature_count(registry: &LayerRegistry) -> usize {
        registry
            .find_layer(&LayerId::new("analysis"))
            .unwrap()
            .feature_count()
    }

    #[test]
    fn test_add_point_returns_report() {
        let mut registry = test_registry();
        let mut manager = test_manager();

        let report = manager.add_point(&mut registry, 25.0330, 121.5654).unwrap();
        assert_eq!(report.point_id, PointId(1));
        assert_eq!(report.matches.len(), 1);
        assert!(
            (report.matches[0].distance_m as i64 - 111).abs() <= 2,
            "Expected ~111 m, got {}",
            report.matches[0].distance_m
        );
        assert_eq!(report.layer_counts.get("Clinics"), Some(&1));
    }

    #[test]
    fn test_add_appends_point_then_circle() {
        let mut registry = test_registry();
        let mut manager = test_manager();

        manager.add_point(&mut registry, 25.0330, 121.5654);

        let layer = registry.find_layer(&LayerId::new("analysis")).unwrap();
        assert_eq!(layer.feature_count(), 2);

        let point = &layer.features.features[0];
        let circle = &layer.features.features[1];
        assert!(is_type(point, TYPE_POINT));
        assert!(is_type(circle, TYPE_CIRCLE));
        assert_eq!(prop_u64(circle, "parent_id"), prop_u64(point, "id"));
        assert_eq!(
            point.properties.get("layer_id"),
            Some(&json!("analysis"))
        );
        assert_eq!(
            circle.properties.get("layer_id"),
            Some(&json!("analysis"))
        );
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let mut registry = test_registry();
        let mut manager = test_manager();

        let first = manager.add_point(&mut registry, 25.0330, 121.5654).unwrap();
        let second = manager.add_point(&mut registry, 25.0400, 121.5700).unwrap();
        assert_eq!(first.point_id, PointId(1));
        assert_eq!(second.point_id, PointId(2));

        manager.delete_point(&mut registry, second.point_id);
        let third = manager.add_point(&mut registry, 25.0350, 121.5600).unwrap();
        assert_eq!(third.point_id, PointId(3), "Ids must not be reused");
    }

    #[test]
    fn test_ordinal_recomputed_from_live_count() {
        let mut registry = test_registry();
        let mut manager = test_manager();

        manager.add_point(&mut registry, 25.0330, 121.5654);
        let second = manager.add_point(&mut registry, 25.0400, 121.5700).unwrap();
        manager.delete_point(&mut registry, second.point_id);

        // The replacement probe reuses display number 2 even though its id
        // is 3: ordinals are cosmetic, recomputed from the live count.
        manager.add_point(&mut registry, 25.0350, 121.5600);
        let layer = registry.find_layer(&LayerId::new("analysis")).unwrap();
        let names: Vec<_> = layer
            .features
            .features
            .iter()
            .filter(|f| is_type(f, TYPE_POINT))
            .map(|f| f.properties.get("name").cloned())
            .collect();
        assert_eq!(
            names,
            vec![
                Some(json!("Analysis Point 1")),
                Some(json!("Analysis Point 2"))
            ]
        );
    }

    #[test]
    fn test_add_then_delete_restores_counts() {
        let mut registry = test_registry();
        let mut manager = test_manager();

        manager.add_point(&mut registry, 25.0330, 121.5654);
        let before_features = analysis_feature_count(&registry);
        let before_total = registry
            .find_layer(&LayerId::new("analysis"))
            .unwrap()
            .summary
            .as_ref()
            .unwrap()
            .total_count;

        let report = manager.add_point(&mut registry, 25.0400, 121.5700).unwrap();
        assert!(manager.delete_point(&mut registry, report.point_id));

        let layer = registry.find_layer(&LayerId::new("analysis")).unwrap();
        assert_eq!(layer.feature_count(), before_features);
        assert_eq!(layer.summary.as_ref().unwrap().total_count, before_total);
    }

    #[test]
    fn test_delete_unknown_point_is_noop() {
        let mut registry = test_registry();
        let mut manager = test_manager();

        manager.add_point(&mut registry, 25.0330, 121.5654);
        let before = analysis_feature_count(&registry);

        assert!(!manager.delete_point(&mut registry, PointId(999)));
        assert_eq!(analysis_feature_count(&registry), before);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut registry = test_registry();
        let mut manager = test_manager();

        manager.add_point(&mut registry, 25.0330, 121.5654);
        manager.add_point(&mut registry, 25.0400, 121.5700);

        for _ in 0..2 {
            manager.clear(&mut registry);
            let layer = registry.find_layer(&LayerId::new("analysis")).unwrap();
            assert_eq!(layer.feature_count(), 0);
            assert_eq!(layer.summary.as_ref().unwrap().total_count, 0);
            assert!(layer.table.is_empty());
        }
    }

    #[test]
    fn test_summary_counts_points_not_circles() {
        let mut registry = test_registry();
        let mut manager = test_manager();

        manager.add_point(&mut registry, 25.0330, 121.5654);
        manager.add_point(&mut registry, 25.0400, 121.5700);

        let layer = registry.find_layer(&LayerId::new("analysis")).unwrap();
        let summary = layer.summary.as_ref().unwrap();
        assert_eq!(layer.feature_count(), 4, "2 points + 2 circles");
        assert_eq!(summary.total_count, 2, "Circles excluded from the count");

        // Two probes at 2 km radius: 2 * pi * 2^2 = ~25.13 km2
        let coverage = summary.coverage_km2.unwrap();
        assert!(
            (coverage - 25.13).abs() < 0.01,
            "Expected ~25.13 km2, got {}",
            coverage
        );
        assert!(summary.description.contains("2 analysis points"));
    }

    #[test]
    fn test_table_rows_projection() {
        let mut registry = test_registry();
        let mut manager = test_manager();

        manager.add_point(&mut registry, 25.0330, 121.5654);

        let layer = registry.find_layer(&LayerId::new("analysis")).unwrap();
        assert_eq!(layer.table.len(), 1);

        let row = &layer.table[0];
        assert_eq!(row.get("ordinal"), Some(&json!(1)));
        assert_eq!(row.get("name"), Some(&json!("Analysis Point 1")));
        assert_eq!(row.get("lat"), Some(&json!("25.033000")));
        assert_eq!(row.get("lng"), Some(&json!("121.565400")));
        assert_eq!(row.get("radius"), Some(&json!("2 km")));
        assert_eq!(row.get("coverage"), Some(&json!("12.57 km2")));
        assert_eq!(row.get("match_count"), Some(&json!(1)));
        assert_eq!(
            row.get("created_at"),
            Some(&json!(fixed_clock().to_rfc3339()))
        );
    }

    #[test]
    fn test_missing_analysis_layer_is_noop() {
        let manifest = LayerManifest::new().with_group(
            "infrastructure",
            vec![LayerDescriptor::point("clinics", "Clinics")],
        );
        let mut registry = LayerRegistry::from_manifest(manifest, &Settings::default()).unwrap();
        let mut manager = test_manager();

        assert!(manager.add_point(&mut registry, 25.0, 121.5).is_none());
        assert!(!manager.delete_point(&mut registry, PointId(1)));
        manager.clear(&mut registry); // must not panic
    }

    #[test]
    fn test_custom_radius_probe() {
        let mut registry = test_registry();
        let mut manager = test_manager();

        // 50 m radius excludes the clinic ~111 m away
        let report = manager
            .add_point_with_radius(&mut registry, 25.0330, 121.5654, 50.0)
            .unwrap();
        assert!(report.matches.is_empty());
        assert!(report.layer_counts.is_empty());
    }
}
