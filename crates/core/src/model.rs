//! The Wanderlist domain model.
//!
//! A [`BucketItem`] is the single owning record for everything a user tracks
//! about one aspiration: metadata, completion, and the itinerary or road-trip
//! sub-structure used by the route planner. Sub-structures live and die with
//! their parent item.

use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wanderlist_geo::Coordinate;

/// One aspirational entry on the user's list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketItem {
    /// Opaque unique id, set at creation and never changed
    pub id: String,
    /// Short title, non-empty
    pub title: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Display name of the place, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    /// Geocoded position, if resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinate>,
    /// Gallery image URLs in insertion order
    #[serde(default)]
    pub images: Vec<String>,
    /// Whether the item has been ticked off
    #[serde(default)]
    pub completed: bool,
    /// When the item was completed; present iff `completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Creation timestamp, set once
    pub created_at: DateTime<Utc>,
    /// User-configurable category, "Other" when unset by the UI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Interest tags, preserved in display order
    #[serde(default)]
    pub interests: Vec<String>,
    /// Owner display name; conceptually defaults to "Me"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Free-text seasonal hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time_to_visit: Option<String>,
    /// Ordered stops for a single-destination visit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itinerary: Option<Vec<ItineraryItem>>,
    /// Linear road-trip plan ending at this item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_trip: Option<RoadTripDetails>,
}

impl BucketItem {
    /// Creates a new incomplete item with a fresh id.
    pub fn new(title: impl Into<String>) -> Result<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CoreError::Validation("item title must not be empty".into()));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title,
            description: String::new(),
            location_name: None,
            coordinates: None,
            images: Vec::new(),
            completed: false,
            completed_at: None,
            created_at: Utc::now(),
            category: None,
            interests: Vec::new(),
            owner: None,
            best_time_to_visit: None,
            itinerary: None,
            road_trip: None,
        })
    }

    /// Marks the item complete on an explicit, user-confirmed date.
    ///
    /// Completion always carries a date supplied by the user, never an
    /// implicit "now".
    pub fn complete_on(&mut self, date: DateTime<Utc>) {
        self.completed = true;
        self.completed_at = Some(date);
    }

    /// Reopens a completed item, clearing the completion date unconditionally.
    pub fn reopen(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }

    /// True when the radar should consider this item: incomplete and geocoded.
    #[must_use]
    pub fn is_radar_target(&self) -> bool {
        !self.completed && self.coordinates.is_some()
    }

    /// Checks the completion invariant: incomplete items carry no date.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        self.completed || self.completed_at.is_none()
    }
}

/// One stop inside an itinerary or road trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItem {
    /// Stop name, non-empty
    pub name: String,
    /// Optional blurb about the stop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether this stop itself was visited, independent of the parent item
    #[serde(default)]
    pub completed: bool,
    /// Geocoded position; absent stops get a derived pseudo-position for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinate>,
    /// "Must-see" flag, affects display tie-breaks and map icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_important: Option<bool>,
    /// Optional image URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl ItineraryItem {
    /// A bare stop carrying only a name, the fallback when enrichment fails.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            completed: false,
            coordinates: None,
            is_important: None,
            images: None,
        }
    }
}

/// A linear road trip: explicit start, ordered stops, parent item as the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadTripDetails {
    /// Display name of the starting point
    pub start_location: String,
    /// Resolved start position; distance math is blocked until set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_coordinates: Option<Coordinate>,
    /// Stops in visiting order, never geographically sorted
    #[serde(default)]
    pub stops: Vec<ItineraryItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_is_incomplete() {
        let item = BucketItem::new("See the northern lights").unwrap();
        assert!(!item.completed);
        assert!(item.completed_at.is_none());
        assert!(item.invariants_hold());
        assert!(!item.id.is_empty());
    }

    #[test]
    fn test_blank_title_rejected() {
        assert!(BucketItem::new("   ").is_err());
    }

    #[test]
    fn test_complete_requires_explicit_date() {
        let mut item = BucketItem::new("Dive the Great Barrier Reef").unwrap();
        let when = "2024-06-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        item.complete_on(when);
        assert!(item.completed);
        assert_eq!(item.completed_at, Some(when));
        assert!(item.invariants_hold());
    }

    #[test]
    fn test_reopen_clears_date_unconditionally() {
        let mut item = BucketItem::new("Walk the Camino").unwrap();
        item.complete_on(Utc::now());
        item.reopen();
        assert!(!item.completed);
        assert!(item.completed_at.is_none());
        assert!(item.invariants_hold());
    }

    #[test]
    fn test_radar_target_requires_coordinates() {
        let mut item = BucketItem::new("Visit Kyoto").unwrap();
        assert!(!item.is_radar_target());

        item.coordinates = Some(Coordinate::new(35.0116, 135.7681));
        assert!(item.is_radar_target());

        item.complete_on(Utc::now());
        assert!(!item.is_radar_target());
    }

    #[test]
    fn test_serde_round_trip_skips_absent_fields() {
        let item = BucketItem::new("Sail the fjords").unwrap();
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("completed_at"));
        assert!(!json.contains("road_trip"));

        let back: BucketItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, item.id);
        assert_eq!(back.title, item.title);
    }
}
