//! Collaborator contracts at the platform and network boundaries.
//!
//! The radar, route planner and reminder check never talk to the platform
//! directly; they go through these traits so the CLI, tests and any future
//! host can plug in their own sinks and backends.

use crate::model::ItineraryItem;
use thiserror::Error;
use wanderlist_geo::Coordinate;

/// Platform notification capability. Delivery is best effort.
pub trait NotificationSink: Send + Sync {
    /// Asks the platform for permission to notify. Interactive, may block.
    fn request_permission(&self) -> bool;

    /// Shows a notification. `dedupe_key` lets the platform collapse
    /// duplicates; no delivery confirmation is available.
    fn notify(&self, title: &str, body: &str, dedupe_key: &str);
}

/// Spoken-audio output. Fire and forget.
pub trait SpeechSink: Send + Sync {
    /// Speaks the text aloud.
    fn speak(&self, text: &str);
}

/// Transient, dismissible user-facing messages.
pub trait ToastSink: Send + Sync {
    /// Shows a short-lived message.
    fn toast(&self, message: &str);
}

/// Result alias for enrichment calls.
pub type EnrichmentResult<T> = std::result::Result<T, EnrichmentError>;

/// Failures at the AI enrichment boundary.
///
/// Every call is expected to be unreliable; callers degrade to a
/// deterministic fallback rather than surfacing these as hard errors.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// The backend could not be reached or returned a failure status
    #[error("Enrichment backend unavailable: {0}")]
    Unavailable(String),

    /// The response arrived but failed schema validation
    #[error("Enrichment response failed validation: {0}")]
    InvalidDraft(String),

    /// The client is not configured (no API key / base URL)
    #[error("Enrichment not configured: {0}")]
    NotConfigured(String),
}

/// The AI-backed place enrichment boundary.
///
/// Responses are validated into domain types before they cross this trait;
/// implementations never hand back partially-validated drafts.
#[allow(async_fn_in_trait)]
pub trait PlaceEnrichment: Send + Sync {
    /// Looks up one place by name, optionally scoped to a parent location.
    /// `Ok(None)` means the backend had nothing useful.
    async fn lookup(
        &self,
        name: &str,
        context: Option<&str>,
    ) -> EnrichmentResult<Option<ItineraryItem>>;

    /// Generates a full itinerary for a destination.
    async fn generate_itinerary(&self, location: &str) -> EnrichmentResult<Vec<ItineraryItem>>;

    /// Suggests stops along a linear route from `start` to `destination`.
    async fn generate_road_trip_stops(
        &self,
        start: &str,
        destination: &str,
    ) -> EnrichmentResult<Vec<ItineraryItem>>;

    /// Reorders stop names for an efficient visit. The result may drop or
    /// rename entries; callers must reconcile against their originals.
    async fn optimize_order(
        &self,
        context: &str,
        names: &[String],
    ) -> EnrichmentResult<Vec<String>>;

    /// Resolves a coordinate to a display name.
    async fn reverse_geocode(&self, position: Coordinate) -> EnrichmentResult<String>;
}
