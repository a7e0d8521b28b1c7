//! The platform location boundary.
//!
//! A provider yields a continuous stream of fixes with no fixed period;
//! cadence is platform-determined. The subscription is an explicit handle
//! so cancellation is visible in the type system rather than an ambient
//! listener registration.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use wanderlist_core::config::LocationConfig;
use wanderlist_geo::Coordinate;

/// Options passed to the platform when opening a subscription.
#[derive(Debug, Clone, Copy)]
pub struct LocationOptions {
    /// Prefer high-accuracy positioning
    pub high_accuracy: bool,
    /// Accept cached fixes up to this age
    pub max_age: Duration,
    /// Give up on a single acquisition after this long
    pub timeout: Duration,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self::from(&LocationConfig::default())
    }
}

impl From<&LocationConfig> for LocationOptions {
    fn from(config: &LocationConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            max_age: Duration::from_millis(config.max_age_ms),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

/// Location acquisition failures.
///
/// Permission denial is fatal to the session; everything else is transient
/// and the subscription is expected to recover on its own.
#[derive(Debug, Clone, Error)]
pub enum LocationError {
    /// The user or platform revoked location permission
    #[error("Location permission denied")]
    PermissionDenied,

    /// No position could be determined right now
    #[error("Position unavailable: {0}")]
    Unavailable(String),

    /// A single acquisition timed out
    #[error("Location acquisition timed out")]
    Timeout,
}

impl LocationError {
    /// True when the error must tear the radar session down.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, LocationError::PermissionDenied)
    }
}

/// Receiver half of a location subscription.
pub trait LocationObserver: Send + Sync {
    /// A successful position sample.
    fn fix(&self, position: Coordinate);

    /// An acquisition error. Transient errors leave the stream running.
    fn error(&self, error: LocationError);
}

/// A continuous platform location stream.
pub trait LocationProvider: Send + Sync {
    /// Opens a subscription delivering fixes and errors to `observer`
    /// until the returned handle is cancelled or dropped.
    fn subscribe(
        &self,
        options: LocationOptions,
        observer: Arc<dyn LocationObserver>,
    ) -> Subscription;
}

/// Cancellable handle to a live location subscription.
///
/// Dropping the handle cancels the subscription.
pub struct Subscription {
    on_cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wraps a cancellation action.
    pub fn new(on_cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_cancel: Some(Box::new(on_cancel)),
        }
    }

    /// Cancels the subscription explicitly.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(f) = self.on_cancel.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("cancelled", &self.on_cancel.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_cancel_runs_once() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let sub = Subscription::new(move || flag.store(true, Ordering::SeqCst));
        sub.cancel();
        assert!(cancelled.load(Ordering::SeqCst));
    }

    #[test]
    fn test_drop_cancels() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        drop(Subscription::new(move || flag.store(true, Ordering::SeqCst)));
        assert!(cancelled.load(Ordering::SeqCst));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(LocationError::PermissionDenied.is_fatal());
        assert!(!LocationError::Timeout.is_fatal());
        assert!(!LocationError::Unavailable("gps off".into()).is_fatal());
    }

    #[test]
    fn test_options_from_config() {
        let options = LocationOptions::from(&LocationConfig::default());
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(20));
    }
}
