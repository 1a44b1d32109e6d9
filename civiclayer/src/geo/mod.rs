//! Geographic primitives
//!
//! Provides the latitude/longitude value type used throughout the layer
//! system and great-circle distance computation between two positions.

mod types;

pub use types::{GeoError, LatLng, EARTH_RADIUS_M, MAX_LAT, MAX_LNG, MIN_LAT, MIN_LNG};

use std::f64::consts::PI;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// Calculate the great-circle distance between two positions in meters.
///
/// Uses the haversine formula over a spherical Earth (radius 6,371,000 m),
/// accurate to roughly 0.3% - more than enough for radius queries over a
/// single municipality.
///
/// Inputs are degrees. NaN inputs propagate to a NaN result; validation
/// belongs to whoever produced the coordinates (see [`LatLng::validated`]).
///
/// # Example
///
/// ```
/// use civiclayer::geo::{distance_meters, LatLng};
///
/// let a = LatLng { lat: 0.0, lng: 0.0 };
/// let b = LatLng { lat: 1.0, lng: 0.0 };
/// // 1 degree of latitude is ~111 km
/// let d = distance_meters(a, b);
/// assert!((d - 111_195.0).abs() < 200.0);
/// ```
#[inline]
pub fn distance_meters(from: LatLng, to: LatLng) -> f64 {
    let lat1_rad = from.lat * DEG_TO_RAD;
    let lat2_rad = to.lat * DEG_TO_RAD;
    let delta_lat = (to.lat - from.lat) * DEG_TO_RAD;
    let delta_lng = (to.lng - from.lng) * DEG_TO_RAD;

    // Haversine formula
    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
