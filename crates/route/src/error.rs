//! Error types for the route crate.

use thiserror::Error;
use wanderlist_core::error::CoreError;
use wanderlist_core::traits::EnrichmentError;

/// Result type alias for route operations.
pub type Result<T> = std::result::Result<T, RouteError>;

/// Errors from planning operations.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The parent item has no geocoded position to anchor the route on
    #[error("Item {0} has no coordinates to anchor a route on")]
    AnchorMissing(String),

    /// Destination-mode generation needs the parent item's location name
    #[error("Item has no location name to generate an itinerary for")]
    MissingLocationName,

    /// The operation applies to the other planning mode
    #[error("Operation is only available in {0} mode")]
    WrongMode(&'static str),

    /// Order optimization needs at least two stops
    #[error("Need at least two stops to optimize, have {0}")]
    TooFewStops(usize),

    /// The road-trip start is not resolved; stats and navigation are
    /// blocked until it is
    #[error("Start location \"{0}\" could not be resolved")]
    StartUnresolved(String),

    /// A road-trip operation needs a start location to be set first
    #[error("Road trip has no start location yet")]
    StartNotSet,

    /// Stop index out of range
    #[error("Stop index {index} out of range (have {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Current stop count
        len: usize,
    },

    /// Discarding existing stops needs explicit confirmation
    #[error("Replacing existing stops requires confirmation")]
    ConfirmationRequired,

    /// No planner is open in this session
    #[error("No active planning session")]
    PlannerClosed,

    /// The planning context changed while an enrichment call was in
    /// flight; the result was discarded
    #[error("Planning context changed, response discarded")]
    StaleResponse,

    /// The enrichment backend failed; state was left unchanged
    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    /// Store access failed
    #[error(transparent)]
    Core(#[from] CoreError),
}
