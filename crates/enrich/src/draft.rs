//! Schema validation of backend drafts.
//!
//! The backend's stop drafts are loosely shaped AI output. Validation
//! happens here, at the boundary, so nothing enters the domain model
//! half-checked: a draft either becomes a well-formed
//! [`ItineraryItem`] or the whole response is rejected.

use crate::error::{BackendError, BackendResult};
use serde::Deserialize;
use wanderlist_core::model::ItineraryItem;
use wanderlist_geo::Coordinate;

/// A stop as the backend returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct StopDraft {
    /// Place name
    pub name: String,
    /// Optional blurb
    #[serde(default)]
    pub description: Option<String>,
    /// Latitude, present only with `longitude`
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude, present only with `latitude`
    #[serde(default)]
    pub longitude: Option<f64>,
    /// "Must-see" flag
    #[serde(default)]
    pub is_important: Option<bool>,
}

impl StopDraft {
    /// Validates the draft into a domain stop.
    pub fn into_item(self) -> BackendResult<ItineraryItem> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BackendError::invalid_draft("stop draft has an empty name"));
        }

        let coordinates = match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => {
                let coord = Coordinate::new(lat, lng);
                if !coord.is_valid() {
                    return Err(BackendError::invalid_draft(format!(
                        "stop \"{name}\" has out-of-range coordinates ({lat}, {lng})"
                    )));
                }
                Some(coord)
            }
            (None, None) => None,
            _ => {
                return Err(BackendError::invalid_draft(format!(
                    "stop \"{name}\" has only one of latitude/longitude"
                )))
            }
        };

        Ok(ItineraryItem {
            name: name.to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            completed: false,
            coordinates,
            is_important: self.is_important,
            images: None,
        })
    }
}

/// Validates a whole draft list, rejecting the response if any entry fails.
pub(crate) fn into_items(drafts: Vec<StopDraft>) -> BackendResult<Vec<ItineraryItem>> {
    drafts.into_iter().map(StopDraft::into_item).collect()
}
