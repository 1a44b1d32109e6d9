//! Geographic type definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Earth's mean radius in meters, as used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LNG: f64 = -180.0;
pub const MAX_LNG: f64 = 180.0;

/// A geographic position in degrees.
///
/// Fields are public and unvalidated so positions can be written literally;
/// use [`LatLng::validated`] at parsing boundaries (WKT columns, CLI input)
/// where out-of-range values are possible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees, positive north
    pub lat: f64,
    /// Longitude in degrees, positive east
    pub lng: f64,
}

impl LatLng {
    /// Builds a position after checking both coordinates are finite and in
    /// range.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if either coordinate is NaN, infinite, or
    /// outside the valid degree range.
    pub fn validated(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(GeoError::InvalidLatitude(lat));
        }
        if !lng.is_finite() || !(MIN_LNG..=MAX_LNG).contains(&lng) {
            return Err(GeoError::InvalidLongitude(lng));
        }
        Ok(Self { lat, lng })
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Errors that can occur when validating geographic coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude is NaN or outside -90..=90
    #[error("Invalid latitude: {0} (must be between {MIN_LAT} and {MAX_LAT})")]
    InvalidLatitude(f64),
    /// Longitude is NaN or outside -180..=180
    #[error("Invalid longitude: {0} (must be between {MIN_LNG} and {MAX_LNG})")]
    InvalidLongitude(f64),
}
