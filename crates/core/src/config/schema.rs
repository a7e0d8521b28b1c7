//! Configuration schema definitions
//!
//! Every knob the radar, route planner, reminder check and enrichment
//! client read at runtime, with serde defaults matching the shipped
//! behavior.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Proximity radar settings
    #[serde(default)]
    pub radar: RadarConfig,

    /// Location subscription options
    #[serde(default)]
    pub location: LocationConfig,

    /// Route statistics settings
    #[serde(default)]
    pub route: RouteConfig,

    /// AI enrichment backend settings
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Daily reminder windows
    #[serde(default)]
    pub reminders: ReminderConfig,
}

impl AppConfig {
    /// Validates cross-field constraints the types cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.radar.proximity_range_m <= 0.0 {
            return Err(CoreError::Config(
                "radar.proximity_range_m must be positive".into(),
            ));
        }
        if self.route.destination_speed_kmh <= 0.0 || self.route.road_trip_speed_kmh <= 0.0 {
            return Err(CoreError::Config("route speeds must be positive".into()));
        }
        if self.location.timeout_ms == 0 {
            return Err(CoreError::Config(
                "location.timeout_ms must be positive".into(),
            ));
        }
        self.reminders.morning.validate("reminders.morning")?;
        self.reminders.evening.validate("reminders.evening")?;
        Ok(())
    }
}

/// Proximity radar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarConfig {
    /// Distance threshold in meters below which a proximity alert fires
    #[serde(default = "default_proximity_range")]
    pub proximity_range_m: f64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            proximity_range_m: default_proximity_range(),
        }
    }
}

fn default_proximity_range() -> f64 {
    2000.0
}

/// Location subscription options passed to the platform provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Prefer high-accuracy positioning
    #[serde(default = "default_true")]
    pub high_accuracy: bool,

    /// Accept cached fixes up to this age
    #[serde(default = "default_max_age_ms")]
    pub max_age_ms: u64,

    /// Give up on a single acquisition after this long
    #[serde(default = "default_location_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            max_age_ms: default_max_age_ms(),
            timeout_ms: default_location_timeout_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_age_ms() -> u64 {
    5_000
}

fn default_location_timeout_ms() -> u64 {
    20_000
}

/// Route statistics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Average speed for destination-mode itineraries (walking scale)
    #[serde(default = "default_destination_speed")]
    pub destination_speed_kmh: f64,

    /// Average speed for road trips (highway scale)
    #[serde(default = "default_road_trip_speed")]
    pub road_trip_speed_kmh: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            destination_speed_kmh: default_destination_speed(),
            road_trip_speed_kmh: default_road_trip_speed(),
        }
    }
}

fn default_destination_speed() -> f64 {
    5.0
}

fn default_road_trip_speed() -> f64 {
    80.0
}

/// AI enrichment backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Base URL of the generative backend
    #[serde(default = "default_enrichment_url")]
    pub base_url: String,

    /// Bearer key; read from the environment when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_enrichment_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per call including the first
    #[serde(default = "default_enrichment_attempts")]
    pub max_attempts: u32,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            base_url: default_enrichment_url(),
            api_key: None,
            timeout_secs: default_enrichment_timeout_secs(),
            max_attempts: default_enrichment_attempts(),
        }
    }
}

fn default_enrichment_url() -> String {
    "https://api.wanderlist.dev".to_string()
}

fn default_enrichment_timeout_secs() -> u64 {
    15
}

fn default_enrichment_attempts() -> u32 {
    3
}

/// Daily reminder windows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Morning window (one reminder per day at most)
    #[serde(default = "default_morning_window")]
    pub morning: WindowConfig,

    /// Evening window (one reminder per day at most)
    #[serde(default = "default_evening_window")]
    pub evening: WindowConfig,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            morning: default_morning_window(),
            evening: default_evening_window(),
        }
    }
}

fn default_morning_window() -> WindowConfig {
    WindowConfig { start_hour: 6, end_hour: 12 }
}

fn default_evening_window() -> WindowConfig {
    WindowConfig { start_hour: 17, end_hour: 22 }
}

/// A half-open local-time window `[start_hour, end_hour)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindowConfig {
    /// First hour inside the window (0-23)
    pub start_hour: u32,
    /// First hour past the window (1-24)
    pub end_hour: u32,
}

impl WindowConfig {
    /// True when the hour falls inside the window.
    #[must_use]
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }

    pub(crate) fn validate(&self, field: &str) -> Result<()> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(CoreError::Config(format!(
                "{field}: window must satisfy start < end <= 24"
            )));
        }
        Ok(())
    }
}
