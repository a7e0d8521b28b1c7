//! Geodesy utilities for Wanderlist.
//!
//! This crate provides:
//! - Haversine distance calculations
//! - Human-readable distance formatting
//! - Deterministic pseudo-coordinates for waypoints without a geocode
//! - Proximity sweeps over target sets with optional parallelism
//!
//! # Example
//!
//! ```
//! use wanderlist_geo::{distance_meters, Coordinate};
//!
//! let berlin = Coordinate::new(52.5200, 13.4050);
//! let paris = Coordinate::new(48.8566, 2.3522);
//!
//! let meters = distance_meters(&berlin, &paris);
//! assert!((meters - 878_000.0).abs() < 10_000.0); // ~878 km
//! ```

mod format;
mod haversine;
mod pseudo;
pub mod sweep;
mod error;

pub use error::{GeoError, Result};
pub use format::{approach_phrase, format_distance};
pub use haversine::{distance_km, distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use pseudo::pseudo_coordinate;
pub use sweep::{sweep_distances, within_radius, ProximityHit, Target};

/// A geographic coordinate with latitude and longitude (WGS-84 degrees).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Validates the coordinate, returning an error for out-of-range values.
    pub fn validated(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "({}, {}) is outside WGS-84 bounds",
                self.latitude, self.longitude
            )))
        }
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}
