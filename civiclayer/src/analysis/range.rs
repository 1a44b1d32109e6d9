//! Radius range query
//!
//! Brute-force distance checks over every feature of every candidate
//! layer. Layer counts are tens, feature counts thousands; no spatial
//! index is warranted at this scale.

use super::types::RangeMatch;
use crate::geo::{distance_meters, LatLng};
use crate::layer::{LayerKind, LayerRegistry, LoadState};
use indexmap::IndexMap;
use tracing::debug;

/// Finds all point features within `radius_m` meters of `center`.
///
/// Candidate layers are those that are visible, loaded, of point kind, and
/// not the analysis layer itself - a probe must never report earlier
/// probes. Features at exactly the radius are included; features without a
/// valid point geometry are skipped, never an error. The result is sorted
/// ascending by rounded distance, ties kept in scan order.
///
/// Pure function of the registry state and inputs: no mutation, and
/// deterministic given identical registry contents. Zero candidates or
/// zero matches return an empty vector.
pub fn points_within_range(
    registry: &LayerRegistry,
    center: LatLng,
    radius_m: f64,
) -> Vec<RangeMatch> {
    let analysis_id = registry.analysis_layer_id();
    let mut matches = Vec::new();
    let mut candidate_layers = 0usize;

    for layer in registry.all_layers() {
        if !layer.visible
            || layer.load_state != LoadState::Loaded
            || layer.kind != LayerKind::Point
        {
            continue;
        }
        if Some(&layer.id) == analysis_id {
            continue;
        }
        candidate_layers += 1;

        for feature in &layer.features.features {
            // Malformed geometry: skip the feature, continue the scan
            let Some(position) = feature.point_lat_lng() else {
                continue;
            };

            let distance = distance_meters(center, position);
            if distance <= radius_m {
                let (feature_id, name) = feature.identity();
                matches.push(RangeMatch {
                    layer_id: layer.id.clone(),
                    layer_name: layer.name.clone(),
                    feature_id,
                    name,
                    lat: position.lat,
                    lng: position.lng,
                    distance_m: distance.round() as u64,
                    properties: feature.properties.clone(),
                });
            }
        }
    }

    // Stable sort keeps scan order for equal distances
    matches.sort_by_key(|m| m.distance_m);

    debug!(
        center = %center,
        radius_m,
        candidate_layers,
        match_count = matches.len(),
        "Range query complete"
    );

    matches
}

/// Groups matches into a per-layer count, keyed by layer name in
/// first-encountered (distance) order.
pub fn group_by_layer(matches: &[RangeMatch]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for m in matches {
        *counts.entry(m.layer_name.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::feature::{Feature, FeatureCollection, Geometry};
    use crate::layer::{LayerDescriptor, LayerId, LayerManifest};
    use serde_json::{json, Map, Value};

    fn props(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Registry with one analysis layer and the given pre-loaded point
    /// layers.
    fn registry_with_layers(layers: Vec<(&str, Vec<Feature>)>) -> LayerRegistry {
        let mut manifest = LayerManifest::new().with_group(
            "analysis",
            vec![LayerDescriptor::analysis("analysis", "Analysis layer")],
        );
        let ids: Vec<String> = layers.iter().map(|(id, _)| id.to_string()).collect();
        manifest = manifest.with_group(
            "data",
            ids.iter()
                .map(|id| LayerDescriptor::point(id.as_str(), id.as_str()))
                .collect(),
        );

        let mut registry = LayerRegistry::from_manifest(manifest, &Settings::default()).unwrap();
        for (id, features) in layers {
            let layer = registry.find_layer_mut(&LayerId::new(id)).unwrap();
            layer.visible = true;
            layer.load_state = crate::layer::LoadState::Loaded;
            layer.features = FeatureCollection { features };
        }
        registry
    }

    fn point_at(lat: f64, lng: f64, name: &str) -> Feature {
        Feature::point(
            LatLng { lat, lng },
            props(&[("name", json!(name))]),
        )
    }

    const CENTER: LatLng = LatLng {
        lat: 25.0330,
        lng: 121.5654,
    };

    #[test]
    fn test_nearby_feature_matches() {
        // ~111 m north of the center
        let registry =
            registry_with_layers(vec![("clinics", vec![point_at(25.0340, 121.5654, "A")])]);

        let matches = points_within_range(&registry, CENTER, 2000.0);
        assert_eq!(matches.len(), 1);
        assert!(
            (matches[0].distance_m as i64 - 111).abs() <= 2,
            "Expected ~111 m, got {}",
            matches[0].distance_m
        );
        assert_eq!(matches[0].layer_id, LayerId::new("clinics"));
        assert_eq!(matches[0].name, "A");
    }

    #[test]
    fn test_far_feature_excluded() {
        // ~2.5 km away
        let registry =
            registry_with_layers(vec![("clinics", vec![point_at(25.0555, 121.5654, "far")])]);

        let matches = points_within_range(&registry, CENTER, 2000.0);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let feature_pos = LatLng {
            lat: 25.0430,
            lng: 121.5654,
        };
        let exact = distance_meters(CENTER, feature_pos);

        let registry = registry_with_layers(vec![(
            "clinics",
            vec![point_at(feature_pos.lat, feature_pos.lng, "edge")],
        )]);

        // At exactly the radius: included
        assert_eq!(points_within_range(&registry, CENTER, exact).len(), 1);
        // One meter short: excluded
        assert_eq!(points_within_range(&registry, CENTER, exact - 1.0).len(), 0);
    }

    #[test]
    fn test_sorted_ascending_by_distance() {
        let registry = registry_with_layers(vec![(
            "clinics",
            vec![
                point_at(25.0430, 121.5654, "far"),
                point_at(25.0340, 121.5654, "near"),
                point_at(25.0380, 121.5654, "mid"),
            ],
        )]);

        let matches = points_within_range(&registry, CENTER, 5000.0);
        let names: Vec<_> = matches.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["near", "mid", "far"]);
        for pair in matches.windows(2) {
            assert!(pair[0].distance_m <= pair[1].distance_m);
        }
    }

    #[test]
    fn test_hidden_and_unloaded_layers_skipped() {
        let mut registry =
            registry_with_layers(vec![("clinics", vec![point_at(25.0340, 121.5654, "A")])]);
        registry
            .find_layer_mut(&LayerId::new("clinics"))
            .unwrap()
            .visible = false;
        assert!(points_within_range(&registry, CENTER, 2000.0).is_empty());

        let layer = registry.find_layer_mut(&LayerId::new("clinics")).unwrap();
        layer.visible = true;
        layer.load_state = crate::layer::LoadState::NotLoaded;
        assert!(points_within_range(&registry, CENTER, 2000.0).is_empty());
    }

    #[test]
    fn test_malformed_geometry_skipped() {
        let polygon = Feature {
            geometry: Some(Geometry::Polygon {
                coordinates: vec![vec![[121.0, 25.0], [121.1, 25.0], [121.0, 25.1], [121.0, 25.0]]],
            }),
            properties: Map::new(),
        };
        let no_geometry = Feature::default();
        let good = point_at(25.0340, 121.5654, "good");

        let registry =
            registry_with_layers(vec![("clinics", vec![polygon, no_geometry, good])]);

        let matches = points_within_range(&registry, CENTER, 2000.0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "good");
    }

    #[test]
    fn test_identity_fallbacks_applied() {
        let nameless = Feature::point(
            LatLng {
                lat: 25.0340,
                lng: 121.5654,
            },
            Map::new(),
        );
        let registry = registry_with_layers(vec![("clinics", vec![nameless])]);

        let matches = points_within_range(&registry, CENTER, 2000.0);
        assert_eq!(matches[0].feature_id, "unknown");
        assert_eq!(matches[0].name, "unnamed");
    }

    #[test]
    fn test_empty_registry_returns_empty() {
        let registry = registry_with_layers(vec![]);
        assert!(points_within_range(&registry, CENTER, 2000.0).is_empty());
    }

    #[test]
    fn test_group_by_layer_counts_in_scan_order() {
        let registry = registry_with_layers(vec![
            ("clinics", vec![point_at(25.0340, 121.5654, "c1")]),
            (
                "pharmacies",
                vec![
                    point_at(25.0335, 121.5654, "p1"),
                    point_at(25.0345, 121.5654, "p2"),
                ],
            ),
        ]);

        let matches = points_within_range(&registry, CENTER, 2000.0);
        let counts = group_by_layer(&matches);

        assert_eq!(counts.get("clinics"), Some(&1));
        assert_eq!(counts.get("pharmacies"), Some(&2));
        // First key is the layer of the nearest match
        assert_eq!(counts.keys().next().map(String::as_str), Some("pharmacies"));
    }
}
