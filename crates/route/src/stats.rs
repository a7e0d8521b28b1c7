//! Route statistics: leg-by-leg distances and estimated duration.

use serde::Serialize;
use wanderlist_geo::format_distance;

/// One leg of the walked route.
#[derive(Debug, Clone, Serialize)]
pub struct LegStat {
    /// Name of the waypoint this leg arrives at
    pub name: String,
    /// Distance from the previous point in meters
    pub leg_m: f64,
    /// Distance from the route start in meters
    pub cumulative_m: f64,
}

/// Aggregate statistics for a route in its current order.
#[derive(Debug, Clone, Serialize)]
pub struct RouteStats {
    /// Per-arrival legs in visiting order
    pub legs: Vec<LegStat>,
    /// Total route distance in meters
    pub total_m: f64,
    /// Estimated travel time in whole minutes
    pub duration_min: i64,
}

impl RouteStats {
    /// Builds stats from legs and the mode's average speed.
    pub(crate) fn from_legs(legs: Vec<LegStat>, speed_kmh: f64) -> Self {
        let total_m = legs.last().map_or(0.0, |l| l.cumulative_m);
        let hours = (total_m / 1000.0) / speed_kmh;
        let duration_min = (hours * 60.0).round() as i64;
        Self {
            legs,
            total_m,
            duration_min,
        }
    }

    /// Total distance formatted for display.
    #[must_use]
    pub fn formatted_distance(&self) -> String {
        format_distance(self.total_m)
    }

    /// Estimated duration formatted for display.
    #[must_use]
    pub fn formatted_duration(&self) -> String {
        format_duration_min(self.duration_min)
    }
}

/// Formats whole minutes as `"X hr Y min"`, `"N min"` or `"< 1 min"`.
///
/// The minutes clause is omitted when it would be zero.
pub(crate) fn format_duration_min(minutes: i64) -> String {
    if minutes < 1 {
        return "< 1 min".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{hours} hr")
    } else {
        format!("{hours} hr {rest} min")
    }
}
