//! Error types for the radar crate.

use thiserror::Error;

/// Result type alias for radar operations.
pub type Result<T> = std::result::Result<T, RadarError>;

/// Errors from radar session transitions.
#[derive(Debug, Error)]
pub enum RadarError {
    /// The platform refused notification permission; the off→on transition
    /// failed and the radar stays off.
    #[error("Notification permission denied")]
    PermissionDenied,

    /// The radar is already running.
    #[error("Radar is already on")]
    AlreadyOn,
}
