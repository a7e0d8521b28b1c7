//! Proximity sweeps over a set of geocoded targets.
//!
//! A sweep measures the distance from one observer position to every target
//! in a set. The radar runs one sweep per location fix, so the hot path is a
//! plain map over the slice with optional parallelism for large sets.

use crate::{distance_meters, Coordinate};
use serde::{Deserialize, Serialize};

/// A geocoded target to measure against.
#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    /// Opaque target id (bucket item id in practice)
    pub id: String,
    /// Target position
    pub position: Coordinate,
}

/// Distance from the observer to a single target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityHit {
    /// The target id
    pub id: String,
    /// Distance in meters
    pub distance_m: f64,
}

/// Measures the distance from `observer` to every target.
///
/// Returns one hit per input target, in input order.
///
/// # Example
/// ```
/// use wanderlist_geo::{sweep_distances, Coordinate, Target};
///
/// let targets = vec![
///     Target { id: "berlin".into(), position: Coordinate::new(52.5200, 13.4050) },
///     Target { id: "paris".into(), position: Coordinate::new(48.8566, 2.3522) },
/// ];
///
/// let hits = sweep_distances(&Coordinate::new(50.0, 10.0), &targets);
/// assert_eq!(hits.len(), 2);
/// ```
pub fn sweep_distances(observer: &Coordinate, targets: &[Target]) -> Vec<ProximityHit> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        targets
            .par_iter()
            .map(|t| measure(observer, t))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        targets.iter().map(|t| measure(observer, t)).collect()
    }
}

/// Measures all targets and keeps those within `radius_m`, closest first.
pub fn within_radius(
    observer: &Coordinate,
    targets: &[Target],
    radius_m: f64,
) -> Vec<ProximityHit> {
    let mut hits = sweep_distances(observer, targets);
    hits.retain(|h| h.distance_m < radius_m);
    hits.sort_by(|a, b| {
        a.distance_m
            .partial_cmp(&b.distance_m)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits
}

#[inline]
fn measure(observer: &Coordinate, target: &Target) -> ProximityHit {
    ProximityHit {
        id: target.id.clone(),
        distance_m: distance_meters(observer, &target.position),
    }
}
