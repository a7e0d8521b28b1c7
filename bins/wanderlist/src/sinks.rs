//! Console implementations of the platform boundaries.
//!
//! The CLI stands in for a phone: notifications, speech and toasts all
//! print to the terminal, and the location "stream" replays a sample file.

use owo_colors::OwoColorize;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use wanderlist_core::traits::{NotificationSink, SpeechSink, ToastSink};
use wanderlist_geo::Coordinate;
use wanderlist_radar::{LocationError, LocationObserver, LocationOptions, LocationProvider, Subscription};

/// Prints platform side effects to the terminal.
pub struct ConsoleSinks {
    /// Simulate a denied notification permission (`WANDERLIST_DENY_NOTIFY=1`)
    deny_permission: bool,
}

impl ConsoleSinks {
    /// Reads the permission simulation flag from the environment.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            deny_permission: std::env::var("WANDERLIST_DENY_NOTIFY").is_ok(),
        })
    }
}

impl NotificationSink for ConsoleSinks {
    fn request_permission(&self) -> bool {
        !self.deny_permission
    }

    fn notify(&self, title: &str, body: &str, _dedupe_key: &str) {
        println!("{} {} — {}", "[notify]".magenta(), title.bold(), body);
    }
}

impl SpeechSink for ConsoleSinks {
    fn speak(&self, text: &str) {
        println!("{} {}", "[speak]".cyan(), text.italic());
    }
}

impl ToastSink for ConsoleSinks {
    fn toast(&self, message: &str) {
        println!("{} {}", "[toast]".yellow(), message);
    }
}

/// One entry in a radar replay file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReplaySample {
    /// A position fix
    Fix {
        /// Latitude in degrees
        latitude: f64,
        /// Longitude in degrees
        longitude: f64,
    },
    /// An acquisition error by name
    Error {
        /// One of `permission-denied`, `unavailable`, `timeout`
        error: String,
    },
}

/// Location provider that replays samples pushed by the CLI.
#[derive(Default)]
pub struct ReplayProvider {
    observer: Arc<Mutex<Option<Arc<dyn LocationObserver>>>>,
}

impl ReplayProvider {
    /// Delivers one replay sample to the active subscription, if any.
    pub fn deliver(&self, sample: &ReplaySample) {
        let observer = self.observer.lock().unwrap().clone();
        let Some(observer) = observer else { return };

        match sample {
            ReplaySample::Fix { latitude, longitude } => {
                observer.fix(Coordinate::new(*latitude, *longitude));
            }
            ReplaySample::Error { error } => {
                let error = match error.as_str() {
                    "permission-denied" => LocationError::PermissionDenied,
                    "timeout" => LocationError::Timeout,
                    other => LocationError::Unavailable(other.to_string()),
                };
                observer.error(error);
            }
        }
    }
}

impl LocationProvider for ReplayProvider {
    fn subscribe(
        &self,
        _options: LocationOptions,
        observer: Arc<dyn LocationObserver>,
    ) -> Subscription {
        *self.observer.lock().unwrap() = Some(observer);
        let slot = self.observer.clone();
        Subscription::new(move || {
            *slot.lock().unwrap() = None;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_sample_parses_both_shapes() {
        let samples: Vec<ReplaySample> = serde_json::from_str(
            r#"[{"latitude": 1.0, "longitude": 2.0}, {"error": "timeout"}]"#,
        )
        .unwrap();
        assert!(matches!(samples[0], ReplaySample::Fix { .. }));
        assert!(matches!(samples[1], ReplaySample::Error { .. }));
    }
}
