//! Core domain model and shared services for Wanderlist
//!
//! This crate provides the pieces every other Wanderlist crate builds on:
//!
//! - **Domain model**: bucket items, itinerary stops, road trips
//! - **Notification log**: the append-only, capped in-app notification feed
//! - **Item store**: the owning collection behind a replace-by-id trait
//! - **Configuration**: TOML-based configuration with validation
//! - **Collaborator traits**: platform notification/speech/toast sinks and
//!   the AI place-enrichment boundary
//! - **Retry**: backoff policy shared by network-bound callers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod model;
pub mod notifications;
pub mod retry;
pub mod store;
pub mod traits;

pub use error::{CoreError, Result};
pub use model::{BucketItem, ItineraryItem, RoadTripDetails};
pub use notifications::{AppNotification, NotificationKind, NotificationLog};
pub use store::{ItemStore, JsonStore, MemoryStore};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{AppConfig, Config};
    pub use crate::error::{CoreError, Result};
    pub use crate::model::{BucketItem, ItineraryItem, RoadTripDetails};
    pub use crate::notifications::{AppNotification, NotificationKind, NotificationLog};
    pub use crate::retry::RetryConfig;
    pub use crate::store::{ItemStore, JsonStore, MemoryStore};
    pub use crate::traits::{
        EnrichmentError, NotificationSink, PlaceEnrichment, SpeechSink, ToastSink,
    };
}
