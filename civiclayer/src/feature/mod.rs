//! GeoJSON-like feature model
//!
//! Layers hold their geometry as collections of features: one geometric
//! record (point or polygon) plus an open-ended property map, following the
//! GeoJSON convention. Point coordinates are stored `[lng, lat]` - the
//! GeoJSON order - and converted to `lat`/`lng` at the accessor.
//!
//! The model is deliberately lenient: a feature whose geometry could not be
//! parsed keeps its properties with `geometry: None`, and consumers skip it
//! rather than failing the whole collection.

use crate::geo::LatLng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Display-name fallback when a feature has neither `name` nor `id`.
pub const UNNAMED: &str = "unnamed";

/// Identity fallback when a feature has neither `id` nor `name`.
pub const UNKNOWN: &str = "unknown";

/// Feature geometry, tagged per the GeoJSON `type` field.
///
/// Only the geometry kinds that appear in the municipal datasets are
/// modeled; anything else is treated as absent geometry by the loaders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position, `[lng, lat]`
    Point { coordinates: [f64; 2] },
    /// An exterior ring plus optional holes
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    /// A set of polygons (village boundaries commonly use this)
    MultiPolygon { coordinates: Vec<Vec<Vec<[f64; 2]>>> },
}

/// One geometric record with its properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Parsed geometry; `None` when missing or malformed
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// Property name to value mapping
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Creates a point feature at the given position.
    pub fn point(position: LatLng, properties: Map<String, Value>) -> Self {
        Self {
            geometry: Some(Geometry::Point {
                coordinates: [position.lng, position.lat],
            }),
            properties,
        }
    }

    /// Returns the feature's position if it is a point with finite
    /// coordinates.
    ///
    /// The stored `[lng, lat]` pair is swapped into `lat`/`lng` order here;
    /// non-point and malformed geometry yields `None`.
    pub fn point_lat_lng(&self) -> Option<LatLng> {
        match self.geometry {
            Some(Geometry::Point {
                coordinates: [lng, lat],
            }) if lat.is_finite() && lng.is_finite() => Some(LatLng { lat, lng }),
            _ => None,
        }
    }

    /// Returns a property rendered as display text.
    ///
    /// Strings are returned as-is; numbers and booleans are formatted.
    /// Missing keys, nulls, and structured values yield `None`.
    pub fn property_display(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Resolves the feature's identity and display name with the fallback
    /// chain used by the range query: id falls back to name and then to
    /// [`UNKNOWN`]; the display name prefers name, then id, then
    /// [`UNNAMED`].
    pub fn identity(&self) -> (String, String) {
        let id = self.property_display("id");
        let name = self.property_display("name");

        let feature_id = id
            .clone()
            .or_else(|| name.clone())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let display_name = name.or(id).unwrap_or_else(|| UNNAMED.to_string());

        (feature_id, display_name)
    }
}

/// An ordered collection of features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of features, of any geometry kind.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection holds no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_point_accessor_swaps_coordinate_order() {
        let feature = Feature {
            geometry: Some(Geometry::Point {
                coordinates: [121.5654, 25.0330],
            }),
            properties: Map::new(),
        };

        let pos = feature.point_lat_lng().unwrap();
        assert!((pos.lat - 25.0330).abs() < 1e-9);
        assert!((pos.lng - 121.5654).abs() < 1e-9);
    }

    #[test]
    fn test_point_accessor_rejects_polygon() {
        let feature = Feature {
            geometry: Some(Geometry::Polygon {
                coordinates: vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]],
            }),
            properties: Map::new(),
        };
        assert!(feature.point_lat_lng().is_none());
    }

    #[test]
    fn test_point_accessor_rejects_missing_geometry() {
        let feature = Feature::default();
        assert!(feature.point_lat_lng().is_none());
    }

    #[test]
    fn test_point_accessor_rejects_nan() {
        let feature = Feature {
            geometry: Some(Geometry::Point {
                coordinates: [f64::NAN, 25.0],
            }),
            properties: Map::new(),
        };
        assert!(feature.point_lat_lng().is_none());
    }

    #[test]
    fn test_geometry_parses_from_geojson_value() {
        let geom: Geometry = serde_json::from_value(json!({
            "type": "Point",
            "coordinates": [121.5654, 25.0330]
        }))
        .unwrap();
        assert_eq!(
            geom,
            Geometry::Point {
                coordinates: [121.5654, 25.0330]
            }
        );
    }

    #[test]
    fn test_geometry_rejects_unknown_type() {
        let result: Result<Geometry, _> = serde_json::from_value(json!({
            "type": "GeometryCollection",
            "geometries": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_identity_prefers_id_then_name() {
        let feature = Feature {
            geometry: None,
            properties: props(&[("id", json!("A-1")), ("name", json!("Wanhua Clinic"))]),
        };
        let (id, name) = feature.identity();
        assert_eq!(id, "A-1");
        assert_eq!(name, "Wanhua Clinic");
    }

    #[test]
    fn test_identity_falls_back_across_fields() {
        let only_name = Feature {
            geometry: None,
            properties: props(&[("name", json!("Wanhua Clinic"))]),
        };
        assert_eq!(
            only_name.identity(),
            ("Wanhua Clinic".to_string(), "Wanhua Clinic".to_string())
        );

        let only_id = Feature {
            geometry: None,
            properties: props(&[("id", json!(42))]),
        };
        assert_eq!(only_id.identity(), ("42".to_string(), "42".to_string()));
    }

    #[test]
    fn test_identity_sentinels_when_nothing_available() {
        let feature = Feature::default();
        assert_eq!(
            feature.identity(),
            (UNKNOWN.to_string(), UNNAMED.to_string())
        );
    }

    #[test]
    fn test_property_display_formats_scalars() {
        let feature = Feature {
            geometry: None,
            properties: props(&[
                ("a", json!("text")),
                ("b", json!(3)),
                ("c", json!(true)),
                ("d", json!(null)),
                ("e", json!({"nested": 1})),
            ]),
        };
        assert_eq!(feature.property_display("a").as_deref(), Some("text"));
        assert_eq!(feature.property_display("b").as_deref(), Some("3"));
        assert_eq!(feature.property_display("c").as_deref(), Some("true"));
        assert_eq!(feature.property_display("d"), None);
        assert_eq!(feature.property_display("e"), None);
        assert_eq!(feature.property_display("missing"), None);
    }
}
