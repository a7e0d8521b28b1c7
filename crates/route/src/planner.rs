//! The in-memory route draft.
//!
//! A planner is loaded from one bucket item, edited freely, and written
//! back with [`RoutePlanner::sync_to`]. It never talks to the network;
//! enrichment-backed flows live in [`crate::PlannerSession`].

use crate::error::{Result, RouteError};
use crate::navigation::directions_url;
use crate::reconcile::reconcile_order;
use crate::stats::{LegStat, RouteStats};
use wanderlist_core::config::RouteConfig;
use wanderlist_core::model::{BucketItem, ItineraryItem, RoadTripDetails};
use wanderlist_core::store::ItemStore;
use wanderlist_geo::{distance_meters, pseudo_coordinate, Coordinate};

/// Which kind of route is being planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMode {
    /// Stops around a single destination, anchored at the parent item
    Destination,
    /// Linear chain: explicit start, ordered stops, parent item as the end
    RoadTrip,
}

impl RouteMode {
    /// Lowercase name for messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMode::Destination => "destination",
            RouteMode::RoadTrip => "road trip",
        }
    }
}

/// Draft editor for one item's itinerary or road trip.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    item_id: String,
    anchor: Coordinate,
    anchor_name: String,
    location_name: Option<String>,
    mode: RouteMode,
    stops: Vec<ItineraryItem>,
    start_name: Option<String>,
    start_coords: Option<Coordinate>,
    speeds: RouteConfig,
}

impl RoutePlanner {
    /// Loads a draft from an item's persisted sub-structure.
    ///
    /// Fails when the item has no anchor coordinate; every route needs one.
    pub fn load(item: &BucketItem, mode: RouteMode, speeds: RouteConfig) -> Result<Self> {
        let anchor = item
            .coordinates
            .ok_or_else(|| RouteError::AnchorMissing(item.id.clone()))?;

        let anchor_name = item
            .location_name
            .clone()
            .unwrap_or_else(|| item.title.clone());

        let (stops, start_name, start_coords) = match mode {
            RouteMode::Destination => (item.itinerary.clone().unwrap_or_default(), None, None),
            RouteMode::RoadTrip => match &item.road_trip {
                Some(details) => (
                    details.stops.clone(),
                    (!details.start_location.is_empty()).then(|| details.start_location.clone()),
                    details.start_coordinates,
                ),
                None => (Vec::new(), None, None),
            },
        };

        Ok(Self {
            item_id: item.id.clone(),
            anchor,
            anchor_name,
            location_name: item.location_name.clone(),
            mode,
            stops,
            start_name,
            start_coords,
            speeds,
        })
    }

    /// Id of the owning item.
    #[must_use]
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// The planning mode.
    #[must_use]
    pub fn mode(&self) -> RouteMode {
        self.mode
    }

    /// The parent item's geocoded position.
    #[must_use]
    pub fn anchor(&self) -> Coordinate {
        self.anchor
    }

    /// The parent item's location name, when it has one.
    #[must_use]
    pub fn location_name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    /// Name handed to enrichment calls as destination context: the location
    /// name when present, else the item title.
    #[must_use]
    pub fn anchor_name_for_context(&self) -> String {
        self.anchor_name.clone()
    }

    /// Current stops in visiting order.
    #[must_use]
    pub fn stops(&self) -> &[ItineraryItem] {
        &self.stops
    }

    /// Current stop names in visiting order.
    #[must_use]
    pub fn stop_names(&self) -> Vec<String> {
        self.stops.iter().map(|s| s.name.clone()).collect()
    }

    /// The road-trip start, when set and resolved.
    #[must_use]
    pub fn start(&self) -> Option<(&str, Option<Coordinate>)> {
        self.start_name.as_deref().map(|n| (n, self.start_coords))
    }

    /// Appends a stop.
    pub fn push_stop(&mut self, stop: ItineraryItem) {
        self.stops.push(stop);
    }

    /// Removes a stop by position.
    pub fn remove_stop(&mut self, index: usize) -> Result<ItineraryItem> {
        if index >= self.stops.len() {
            return Err(RouteError::IndexOutOfRange {
                index,
                len: self.stops.len(),
            });
        }
        Ok(self.stops.remove(index))
    }

    /// Moves a stop from one position to another.
    pub fn move_stop(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.stops.len();
        if from >= len {
            return Err(RouteError::IndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(RouteError::IndexOutOfRange { index: to, len });
        }
        let stop = self.stops.remove(from);
        self.stops.insert(to, stop);
        Ok(())
    }

    /// Replaces the whole stop sequence (itinerary regeneration).
    pub fn replace_stops(&mut self, stops: Vec<ItineraryItem>) {
        self.stops = stops;
    }

    /// Sets the resolved road-trip start point.
    pub fn set_start(&mut self, name: impl Into<String>, position: Coordinate) -> Result<()> {
        if self.mode != RouteMode::RoadTrip {
            return Err(RouteError::WrongMode(RouteMode::RoadTrip.as_str()));
        }
        self.start_name = Some(name.into());
        self.start_coords = Some(position);
        Ok(())
    }

    /// True when road-trip distance math can run.
    #[must_use]
    pub fn start_resolved(&self) -> bool {
        self.start_coords.is_some()
    }

    /// Reorders stops to the optimizer's output, reconciling lossy results.
    pub fn apply_order(&mut self, ordered_names: &[String]) {
        self.stops = reconcile_order(std::mem::take(&mut self.stops), ordered_names);
    }

    /// Position used for route math: the stop's own coordinates or the
    /// deterministic pseudo-position derived from the anchor.
    #[must_use]
    pub fn resolve_waypoint(&self, index: usize) -> Coordinate {
        let stop = &self.stops[index];
        stop.coordinates
            .unwrap_or_else(|| pseudo_coordinate(&self.anchor, &stop.name, index))
    }

    /// Walks the route in current order and accumulates leg distances.
    pub fn stats(&self) -> Result<RouteStats> {
        let (mut prev, speed_kmh) = match self.mode {
            RouteMode::Destination => (self.anchor, self.speeds.destination_speed_kmh),
            RouteMode::RoadTrip => {
                let start = self.start_coords.ok_or_else(|| {
                    RouteError::StartUnresolved(self.start_name.clone().unwrap_or_default())
                })?;
                (start, self.speeds.road_trip_speed_kmh)
            }
        };

        let mut legs = Vec::with_capacity(self.stops.len() + 1);
        let mut cumulative = 0.0;
        for (index, stop) in self.stops.iter().enumerate() {
            let here = self.resolve_waypoint(index);
            let leg = distance_meters(&prev, &here);
            cumulative += leg;
            legs.push(LegStat {
                name: stop.name.clone(),
                leg_m: leg,
                cumulative_m: cumulative,
            });
            prev = here;
        }

        // A road trip always ends at the parent item.
        if self.mode == RouteMode::RoadTrip {
            let leg = distance_meters(&prev, &self.anchor);
            cumulative += leg;
            legs.push(LegStat {
                name: self.anchor_name.clone(),
                leg_m: leg,
                cumulative_m: cumulative,
            });
        }

        Ok(RouteStats::from_legs(legs, speed_kmh))
    }

    /// Builds the external directions URL for the current order.
    ///
    /// Stops without real coordinates are skipped here — pseudo-positions
    /// are for display and stats only, never for navigation.
    pub fn navigation_url(&self, device: Option<Coordinate>) -> Result<String> {
        let origin = match self.mode {
            RouteMode::Destination => device.unwrap_or(self.anchor),
            RouteMode::RoadTrip => match device.or(self.start_coords) {
                Some(origin) => origin,
                None => {
                    return Err(RouteError::StartUnresolved(
                        self.start_name.clone().unwrap_or_default(),
                    ))
                }
            },
        };

        let waypoints: Vec<Coordinate> =
            self.stops.iter().filter_map(|s| s.coordinates).collect();

        Ok(directions_url(&origin, &self.anchor, &waypoints))
    }

    /// Writes the draft back to the owning item.
    ///
    /// Called by the session after each mutation for live-view consistency;
    /// calling it explicitly is the save action callers should rely on as
    /// the durability boundary.
    pub fn sync_to(&self, store: &dyn ItemStore) -> Result<()> {
        let mut item = store
            .get(&self.item_id)
            .ok_or_else(|| RouteError::Core(wanderlist_core::error::CoreError::ItemNotFound(
                self.item_id.clone(),
            )))?;

        match self.mode {
            RouteMode::Destination => {
                item.itinerary = Some(self.stops.clone());
            }
            RouteMode::RoadTrip => {
                item.road_trip = Some(RoadTripDetails {
                    start_location: self.start_name.clone().unwrap_or_default(),
                    start_coordinates: self.start_coords,
                    stops: self.stops.clone(),
                });
            }
        }

        store.update(item)?;
        tracing::debug!(item = %self.item_id, mode = self.mode.as_str(), "Route synced");
        Ok(())
    }
}
