//! WKT point parsing
//!
//! Several of the municipal CSV datasets encode coordinates as Well-Known
//! Text, `POINT (lng lat)` - longitude first, the reverse of the usual
//! spoken order. Values sometimes arrive wrapped in double quotes from the
//! CSV export.

use crate::geo::{GeoError, LatLng};
use thiserror::Error;

/// Errors that can occur while parsing a WKT point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WktError {
    /// Input is not a `POINT (...)` expression
    #[error("Not a WKT point: '{0}'")]
    NotAPoint(String),
    /// Coordinate pair is missing or not two numbers
    #[error("Invalid WKT coordinates: '{0}'")]
    InvalidCoordinates(String),
    /// Coordinates parsed but fall outside valid degree ranges
    #[error("WKT coordinates out of range: {0}")]
    OutOfRange(#[from] GeoError),
}

/// Parses a WKT `POINT (lng lat)` string into a validated position.
///
/// Surrounding double quotes and extra whitespace are tolerated. The
/// longitude-first coordinate order of WKT is converted to the `lat`/`lng`
/// fields of [`LatLng`].
///
/// # Example
///
/// ```
/// use civiclayer::wkt::parse_point;
///
/// let p = parse_point("POINT (121.5654 25.0330)").unwrap();
/// assert!((p.lat - 25.0330).abs() < 1e-9);
/// assert!((p.lng - 121.5654).abs() < 1e-9);
/// ```
pub fn parse_point(wkt: &str) -> Result<LatLng, WktError> {
    let cleaned = wkt.trim().trim_matches('"').trim();

    let rest = cleaned
        .strip_prefix("POINT")
        .ok_or_else(|| WktError::NotAPoint(cleaned.to_string()))?
        .trim_start();

    let inner = rest
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| WktError::NotAPoint(cleaned.to_string()))?;

    let mut parts = inner.split_whitespace();
    let (Some(lng_str), Some(lat_str), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(WktError::InvalidCoordinates(inner.to_string()));
    };

    // WKT order is longitude first
    let lng: f64 = lng_str
        .parse()
        .map_err(|_| WktError::InvalidCoordinates(inner.to_string()))?;
    let lat: f64 = lat_str
        .parse()
        .map_err(|_| WktError::InvalidCoordinates(inner.to_string()))?;

    Ok(LatLng::validated(lat, lng)?)
}
