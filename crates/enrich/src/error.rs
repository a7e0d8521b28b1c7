//! Error types for the enrichment client

use thiserror::Error;
use wanderlist_core::traits::EnrichmentError;

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Enrichment backend errors
#[derive(Error, Debug)]
pub enum BackendError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend returned an error response
    #[error("Backend error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from the backend
        message: String,
    },

    /// A response arrived but its payload failed validation
    #[error("Response failed validation: {0}")]
    InvalidDraft(String),

    /// All retry attempts exhausted
    #[error("All {attempts} attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
    },
}

impl BackendError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn invalid_draft(msg: impl Into<String>) -> Self {
        Self::InvalidDraft(msg.into())
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::Json(_)
            | Self::Config(_)
            | Self::InvalidDraft(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }
}

impl From<BackendError> for EnrichmentError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::InvalidDraft(msg) => EnrichmentError::InvalidDraft(msg),
            BackendError::Config(msg) => EnrichmentError::NotConfigured(msg),
            other => EnrichmentError::Unavailable(other.to_string()),
        }
    }
}
