//! Deterministic pseudo-coordinates for waypoints without a geocode.
//!
//! Itinerary stops that were never resolved to a real position still need a
//! place on the map and in route math. The fallback position is derived
//! purely from the anchor coordinate, the stop name and its position index,
//! so the same triple always yields a bit-identical coordinate across runs
//! and across reimplementations sharing persisted data.
//!
//! Algorithm (stable, do not change without a data migration):
//! 1. Seed string: `"{lat:.6}:{lng:.6}:{name}:{index}"` with the anchor
//!    printed to six decimal places.
//! 2. Polynomial rolling hash over the seed's chars: `h = h * 31 + code`,
//!    wrapping in `u32`.
//! 3. Bearing: `h % 360` degrees. Radius: `500 + (h / 360) % 2000` meters,
//!    so offsets stay within 2.5 km of the anchor.
//! 4. The offset is converted to degree deltas at 111,320 m per degree,
//!    with longitude scaled by the anchor's latitude.

use crate::Coordinate;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Derives a display-only position for an ungeocoded waypoint.
///
/// The result is deterministic in `(anchor, name, index)` and must never be
/// persisted as a real coordinate.
///
/// # Example
/// ```
/// use wanderlist_geo::{pseudo_coordinate, Coordinate};
///
/// let anchor = Coordinate::new(48.8584, 2.2945);
/// let a = pseudo_coordinate(&anchor, "Eiffel Tower", 0);
/// let b = pseudo_coordinate(&anchor, "Eiffel Tower", 0);
/// assert_eq!(a, b);
/// ```
pub fn pseudo_coordinate(anchor: &Coordinate, name: &str, index: usize) -> Coordinate {
    let seed = format!(
        "{:.6}:{:.6}:{}:{}",
        anchor.latitude, anchor.longitude, name, index
    );
    let hash = rolling_hash(&seed);

    let bearing_deg = (hash % 360) as f64;
    let radius_m = 500.0 + ((hash / 360) % 2000) as f64;
    let bearing = bearing_deg.to_radians();

    let d_lat = radius_m * bearing.cos() / METERS_PER_DEGREE;
    // Longitude degrees shrink toward the poles; clamp the scale so an
    // anchor at a pole cannot divide by zero.
    let lat_scale = anchor.latitude.to_radians().cos().abs().max(0.01);
    let d_lng = radius_m * bearing.sin() / (METERS_PER_DEGREE * lat_scale);

    Coordinate::new(anchor.latitude + d_lat, anchor.longitude + d_lng)
}

/// Polynomial rolling hash (base 31, wrapping u32) over a string's chars.
fn rolling_hash(s: &str) -> u32 {
    s.chars()
        .fold(0u32, |h, c| h.wrapping_mul(31).wrapping_add(c as u32))
}
