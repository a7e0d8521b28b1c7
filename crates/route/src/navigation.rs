//! Navigation deep links.
//!
//! The planner's responsibility ends at producing a directions URL the
//! platform can hand to a maps application.

use wanderlist_geo::Coordinate;

/// Maximum waypoints the external directions API accepts.
pub const WAYPOINT_LIMIT: usize = 9;

/// Builds a multi-waypoint directions URL.
///
/// Waypoints beyond [`WAYPOINT_LIMIT`] are dropped; the pipe separator is
/// percent-encoded for query-string safety.
pub fn directions_url(
    origin: &Coordinate,
    destination: &Coordinate,
    waypoints: &[Coordinate],
) -> String {
    let mut url = format!(
        "https://www.google.com/maps/dir/?api=1&origin={}&destination={}",
        point(origin),
        point(destination),
    );

    if !waypoints.is_empty() {
        let joined = waypoints
            .iter()
            .take(WAYPOINT_LIMIT)
            .map(point)
            .collect::<Vec<_>>()
            .join("%7C");
        url.push_str("&waypoints=");
        url.push_str(&joined);
    }

    url.push_str("&travelmode=driving");
    url
}

fn point(c: &Coordinate) -> String {
    format!("{:.6},{:.6}", c.latitude, c.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_without_waypoints() {
        let url = directions_url(
            &Coordinate::new(1.0, 2.0),
            &Coordinate::new(3.0, 4.0),
            &[],
        );
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&origin=1.000000,2.000000&destination=3.000000,4.000000&travelmode=driving"
        );
        assert!(!url.contains("waypoints"));
    }

    #[test]
    fn test_url_with_waypoints() {
        let url = directions_url(
            &Coordinate::new(0.0, 0.0),
            &Coordinate::new(0.0, 2.0),
            &[Coordinate::new(0.0, 1.0)],
        );
        assert!(url.contains("&waypoints=0.000000,1.000000&"));
        assert!(url.ends_with("travelmode=driving"));
    }

    #[test]
    fn test_waypoints_capped_at_limit() {
        let many: Vec<Coordinate> = (0..15).map(|i| Coordinate::new(i as f64, 0.0)).collect();
        let url = directions_url(&Coordinate::new(0.0, 0.0), &Coordinate::new(20.0, 0.0), &many);

        let waypoints = url
            .split("waypoints=")
            .nth(1)
            .unwrap()
            .split('&')
            .next()
            .unwrap();
        assert_eq!(waypoints.split("%7C").count(), WAYPOINT_LIMIT);
        // The first nine in order survive
        assert!(waypoints.starts_with("0.000000,0.000000%7C1.000000,0.000000"));
    }
}
