//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two
//! points on a sphere given their longitudes and latitudes.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in meters.
///
/// Symmetric, zero for identical points, and approximately satisfies the
/// triangle inequality (exact on the sphere).
///
/// # Example
/// ```
/// use wanderlist_geo::{distance_meters, Coordinate};
///
/// let equator = Coordinate::new(0.0, 0.0);
/// let one_degree_east = Coordinate::new(0.0, 1.0);
///
/// let meters = distance_meters(&equator, &one_degree_east);
/// assert!((meters - 111_195.0).abs() / 111_195.0 < 0.01);
/// ```
#[inline]
pub fn distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_with_radius(from, to, EARTH_RADIUS_M)
}

/// Calculates the great-circle distance between two coordinates in kilometers.
#[inline]
pub fn distance_km(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Internal function that calculates distance with a custom radius.
#[inline]
fn haversine_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}
