//! Human-readable formatting of distances.

/// Formats a distance in meters for display.
///
/// Below one kilometer the value is rounded to the nearest meter; above,
/// kilometers are shown with one decimal place.
///
/// # Example
/// ```
/// use wanderlist_geo::format_distance;
///
/// assert_eq!(format_distance(950.0), "950m");
/// assert_eq!(format_distance(1500.0), "1.5km");
/// ```
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.round() as i64)
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}

/// A qualitative nearness phrase for spoken proximity alerts.
///
/// Keeps the spoken sentence natural instead of reading out raw meters.
pub fn approach_phrase(meters: f64) -> String {
    if meters < 50.0 {
        "right next to".to_string()
    } else if meters < 250.0 {
        "just steps away from".to_string()
    } else {
        format!("about {} from", format_distance(meters))
    }
}
