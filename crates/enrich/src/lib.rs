//! HTTP client for the Wanderlist place-enrichment backend.
//!
//! The backend is an AI-backed service that looks up places, drafts whole
//! itineraries, suggests road-trip stops, reorders stop lists and reverse
//! geocodes coordinates. Every call is treated as unreliable: requests are
//! retried with backoff, responses are schema-validated into domain types
//! at this boundary, and failures map onto
//! [`EnrichmentError`](wanderlist_core::traits::EnrichmentError) so callers
//! can degrade gracefully.

mod client;
mod config;
mod draft;
mod error;

pub use client::EnrichClient;
pub use config::ClientConfig;
pub use draft::StopDraft;
pub use error::{BackendError, BackendResult};
