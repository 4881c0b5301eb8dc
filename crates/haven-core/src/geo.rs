//! Geographic types and great-circle distance math.

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6_371.0;
pub const MILES_PER_KM: f64 = 0.621_371;

/// A resolved geographic position, produced only by the geocoder layer and
/// immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub country: String,
}

/// A great-circle distance in both unit systems.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    pub km: f64,
    pub mi: f64,
}

/// Returns `true` if the pair is a plausible WGS84 coordinate.
#[must_use]
pub fn in_bounds(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// Haversine great-circle distance between two lat/lng points.
///
/// Symmetric in its arguments and zero for identical points.
#[must_use]
pub fn haversine(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Distance {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let km = 2.0 * EARTH_RADIUS_KM * h.sqrt().asin();

    Distance {
        km,
        mi: km * MILES_PER_KM,
    }
}
