//! The planning session: enrichment orchestration and the stale-response
//! guard.
//!
//! A session holds at most one open [`RoutePlanner`]. Enrichment calls run
//! in two phases: snapshot the inputs and the session generation, await the
//! network, then re-take the lock and apply the result only if the
//! generation still matches. Closing or re-opening the session between the
//! two phases invalidates the in-flight result, so a response for one item
//! can never land in another item's plan.

use crate::error::{Result, RouteError};
use crate::planner::{RouteMode, RoutePlanner};
use crate::stats::RouteStats;
use std::sync::{Arc, Mutex};
use wanderlist_core::config::RouteConfig;
use wanderlist_core::model::ItineraryItem;
use wanderlist_core::store::ItemStore;
use wanderlist_core::traits::PlaceEnrichment;
use wanderlist_geo::Coordinate;

/// Outcome of an add-stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddedStop {
    /// The backend returned a full draft
    Enriched,
    /// Enrichment had nothing; a bare named stop was appended
    Bare,
    /// Blank input, nothing added
    IgnoredBlank,
}

struct Slot {
    planner: Option<RoutePlanner>,
    generation: u64,
}

/// One user-visible planning session over a single item.
pub struct PlannerSession<E: PlaceEnrichment> {
    store: Arc<dyn ItemStore>,
    enrich: Arc<E>,
    slot: Mutex<Slot>,
}

impl<E: PlaceEnrichment> PlannerSession<E> {
    /// Creates a session with no planner open.
    pub fn new(store: Arc<dyn ItemStore>, enrich: Arc<E>) -> Self {
        Self {
            store,
            enrich,
            slot: Mutex::new(Slot {
                planner: None,
                generation: 0,
            }),
        }
    }

    /// Opens a planner for an item, replacing any previous one.
    ///
    /// Bumps the generation, so results still in flight for the previous
    /// planner are discarded when they arrive.
    pub fn open(&self, item_id: &str, mode: RouteMode, speeds: RouteConfig) -> Result<()> {
        let item = self.store.get(item_id).ok_or_else(|| {
            RouteError::Core(wanderlist_core::error::CoreError::ItemNotFound(
                item_id.to_string(),
            ))
        })?;
        let planner = RoutePlanner::load(&item, mode, speeds)?;

        let mut slot = self.slot.lock().unwrap();
        slot.generation += 1;
        slot.planner = Some(planner);
        Ok(())
    }

    /// Closes the session, discarding the draft and any in-flight results.
    pub fn close(&self) {
        let mut slot = self.slot.lock().unwrap();
        slot.generation += 1;
        slot.planner = None;
    }

    /// True while a planner is open.
    pub fn is_open(&self) -> bool {
        self.slot.lock().unwrap().planner.is_some()
    }

    // -------------------------------------------------------------------
    // Synchronous operations
    // -------------------------------------------------------------------

    /// Removes a stop by position and propagates to the owning item.
    pub fn remove_stop(&self, index: usize) -> Result<ItineraryItem> {
        self.edit(|p| p.remove_stop(index))
    }

    /// Moves a stop and propagates to the owning item.
    pub fn move_stop(&self, from: usize, to: usize) -> Result<()> {
        self.edit(|p| p.move_stop(from, to))
    }

    /// Current stops in visiting order.
    pub fn stops(&self) -> Result<Vec<ItineraryItem>> {
        self.read(|p| Ok(p.stops().to_vec()))
    }

    /// Route statistics for the current order.
    pub fn stats(&self) -> Result<RouteStats> {
        self.read(|p| p.stats())
    }

    /// Directions URL for the current order.
    pub fn navigation_url(&self, device: Option<Coordinate>) -> Result<String> {
        self.read(|p| p.navigation_url(device))
    }

    /// Explicitly commits the draft to the owning item.
    ///
    /// Edits propagate as they happen, but this is the durability boundary
    /// callers should rely on.
    pub fn save(&self) -> Result<()> {
        self.read(|p| p.sync_to(self.store.as_ref()))
    }

    // -------------------------------------------------------------------
    // Enrichment-backed operations
    // -------------------------------------------------------------------

    /// Adds a stop by name, enriching it when the backend cooperates and
    /// falling back to a bare stop when it does not.
    pub async fn add_stop(&self, name: &str) -> Result<AddedStop> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(AddedStop::IgnoredBlank);
        }

        let (generation, context) = self.snapshot(|p| {
            Ok(match p.mode() {
                RouteMode::Destination => Some(
                    p.location_name()
                        .map(str::to_string)
                        .unwrap_or_else(|| p.anchor_name_for_context()),
                ),
                RouteMode::RoadTrip => None,
            })
        })?;

        let (stop, outcome) = match self.enrich.lookup(name, context.as_deref()).await {
            Ok(Some(draft)) => (draft, AddedStop::Enriched),
            Ok(None) => (ItineraryItem::bare(name), AddedStop::Bare),
            Err(e) => {
                tracing::debug!(error = %e, stop = name, "Lookup failed, adding bare stop");
                (ItineraryItem::bare(name), AddedStop::Bare)
            }
        };

        self.apply(generation, |p| {
            p.push_stop(stop);
            Ok(outcome)
        })
    }

    /// Resolves and sets the road-trip start location.
    ///
    /// On success the display name is normalized to the resolved canonical
    /// name. On failure the start point is left unchanged and the error
    /// surfaced; distance math stays blocked until corrected.
    pub async fn set_start_location(&self, query: &str) -> Result<String> {
        let (generation, ()) = self.snapshot(|p| {
            if p.mode() != RouteMode::RoadTrip {
                return Err(RouteError::WrongMode(RouteMode::RoadTrip.as_str()));
            }
            Ok(())
        })?;

        let resolved = self
            .enrich
            .lookup(query, None)
            .await
            .ok()
            .flatten()
            .and_then(|draft| draft.coordinates.map(|c| (draft.name, c)));

        let Some((canonical, position)) = resolved else {
            return Err(RouteError::StartUnresolved(query.to_string()));
        };

        self.apply(generation, |p| {
            p.set_start(canonical.clone(), position)?;
            Ok(canonical)
        })
    }

    /// Replaces the whole itinerary with a generated one.
    ///
    /// Destination mode only; discarding existing stops is irreversible and
    /// requires `confirm`.
    pub async fn regenerate_itinerary(&self, confirm: bool) -> Result<usize> {
        let (generation, location) = self.snapshot(|p| {
            if p.mode() != RouteMode::Destination {
                return Err(RouteError::WrongMode(RouteMode::Destination.as_str()));
            }
            let location = p
                .location_name()
                .ok_or(RouteError::MissingLocationName)?
                .to_string();
            if !p.stops().is_empty() && !confirm {
                return Err(RouteError::ConfirmationRequired);
            }
            Ok(location)
        })?;

        let stops = self.enrich.generate_itinerary(&location).await?;
        let count = stops.len();

        self.apply(generation, |p| {
            p.replace_stops(stops);
            Ok(count)
        })
    }

    /// Replaces road-trip stops with suggestions along the route.
    ///
    /// Requires a start location; same confirm-before-discard rule as
    /// itinerary regeneration.
    pub async fn suggest_road_trip_stops(&self, confirm: bool) -> Result<usize> {
        let (generation, (start, destination)) = self.snapshot(|p| {
            if p.mode() != RouteMode::RoadTrip {
                return Err(RouteError::WrongMode(RouteMode::RoadTrip.as_str()));
            }
            let (start, _) = p.start().ok_or(RouteError::StartNotSet)?;
            if !p.stops().is_empty() && !confirm {
                return Err(RouteError::ConfirmationRequired);
            }
            Ok((start.to_string(), p.anchor_name_for_context()))
        })?;

        let stops = self
            .enrich
            .generate_road_trip_stops(&start, &destination)
            .await?;
        let count = stops.len();

        self.apply(generation, |p| {
            p.replace_stops(stops);
            Ok(count)
        })
    }

    /// Asks the optimizer for a better visiting order and applies it,
    /// reconciling lossy output so no stop is ever dropped.
    pub async fn optimize_order(&self) -> Result<()> {
        let (generation, (context, names)) = self.snapshot(|p| {
            if p.mode() != RouteMode::Destination {
                return Err(RouteError::WrongMode(RouteMode::Destination.as_str()));
            }
            if p.stops().len() < 2 {
                return Err(RouteError::TooFewStops(p.stops().len()));
            }
            Ok((p.anchor_name_for_context(), p.stop_names()))
        })?;

        let ordered = self.enrich.optimize_order(&context, &names).await?;

        self.apply(generation, |p| {
            p.apply_order(&ordered);
            Ok(())
        })
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn read<R>(&self, f: impl FnOnce(&RoutePlanner) -> Result<R>) -> Result<R> {
        let slot = self.slot.lock().unwrap();
        let planner = slot.planner.as_ref().ok_or(RouteError::PlannerClosed)?;
        f(planner)
    }

    /// Edits the draft and propagates to the owning item.
    fn edit<R>(&self, f: impl FnOnce(&mut RoutePlanner) -> Result<R>) -> Result<R> {
        let mut slot = self.slot.lock().unwrap();
        let planner = slot.planner.as_mut().ok_or(RouteError::PlannerClosed)?;
        let result = f(planner)?;
        planner.sync_to(self.store.as_ref())?;
        Ok(result)
    }

    /// Phase one of an enrichment call: capture inputs and the generation.
    fn snapshot<R>(&self, f: impl FnOnce(&RoutePlanner) -> Result<R>) -> Result<(u64, R)> {
        let slot = self.slot.lock().unwrap();
        let planner = slot.planner.as_ref().ok_or(RouteError::PlannerClosed)?;
        Ok((slot.generation, f(planner)?))
    }

    /// Phase two: apply a result only if the session generation still
    /// matches the snapshot.
    fn apply<R>(&self, generation: u64, f: impl FnOnce(&mut RoutePlanner) -> Result<R>) -> Result<R> {
        let mut slot = self.slot.lock().unwrap();
        if slot.generation != generation {
            tracing::debug!("Discarding enrichment result for a closed planning context");
            return Err(RouteError::StaleResponse);
        }
        let planner = slot.planner.as_mut().ok_or(RouteError::PlannerClosed)?;
        let result = f(planner)?;
        planner.sync_to(self.store.as_ref())?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use wanderlist_core::model::BucketItem;
    use wanderlist_core::store::MemoryStore;
    use wanderlist_core::traits::{EnrichmentError, EnrichmentResult};

    type Hook = Box<dyn Fn() + Send + Sync>;

    /// Enrichment double: canned responses plus an optional hook that runs
    /// inside each call (used to close the session mid-flight).
    #[derive(Default)]
    struct MockEnrich {
        lookup_response: StdMutex<Option<ItineraryItem>>,
        generated: StdMutex<Vec<ItineraryItem>>,
        ordered: StdMutex<Vec<String>>,
        fail: StdMutex<bool>,
        on_call: StdMutex<Option<Hook>>,
    }

    impl MockEnrich {
        fn run_hook(&self) {
            if let Some(hook) = self.on_call.lock().unwrap().as_ref() {
                hook();
            }
        }

        fn check_fail(&self) -> EnrichmentResult<()> {
            if *self.fail.lock().unwrap() {
                Err(EnrichmentError::Unavailable("mock down".into()))
            } else {
                Ok(())
            }
        }
    }

    impl PlaceEnrichment for MockEnrich {
        async fn lookup(
            &self,
            _name: &str,
            _context: Option<&str>,
        ) -> EnrichmentResult<Option<ItineraryItem>> {
            self.run_hook();
            self.check_fail()?;
            Ok(self.lookup_response.lock().unwrap().clone())
        }

        async fn generate_itinerary(
            &self,
            _location: &str,
        ) -> EnrichmentResult<Vec<ItineraryItem>> {
            self.run_hook();
            self.check_fail()?;
            Ok(self.generated.lock().unwrap().clone())
        }

        async fn generate_road_trip_stops(
            &self,
            _start: &str,
            _destination: &str,
        ) -> EnrichmentResult<Vec<ItineraryItem>> {
            self.run_hook();
            self.check_fail()?;
            Ok(self.generated.lock().unwrap().clone())
        }

        async fn optimize_order(
            &self,
            _context: &str,
            _names: &[String],
        ) -> EnrichmentResult<Vec<String>> {
            self.run_hook();
            self.check_fail()?;
            Ok(self.ordered.lock().unwrap().clone())
        }

        async fn reverse_geocode(&self, _position: Coordinate) -> EnrichmentResult<String> {
            self.run_hook();
            self.check_fail()?;
            Ok("Somewhere".into())
        }
    }

    fn anchored_item(name: &str) -> BucketItem {
        let mut item = BucketItem::new(name).unwrap();
        item.location_name = Some("Lisbon".into());
        item.coordinates = Some(Coordinate::new(38.7223, -9.1393));
        item
    }

    fn session_with(
        items: Vec<BucketItem>,
    ) -> (Arc<PlannerSession<MockEnrich>>, Arc<MemoryStore>, Arc<MockEnrich>) {
        let store = Arc::new(MemoryStore::with_items(items));
        let enrich = Arc::new(MockEnrich::default());
        let session = Arc::new(PlannerSession::new(
            store.clone() as Arc<dyn ItemStore>,
            enrich.clone(),
        ));
        (session, store, enrich)
    }

    #[tokio::test]
    async fn test_add_stop_enriched_and_propagated() {
        let item = anchored_item("Lisbon trip");
        let id = item.id.clone();
        let (session, store, enrich) = session_with(vec![item]);
        session.open(&id, RouteMode::Destination, RouteConfig::default()).unwrap();

        let mut draft = ItineraryItem::bare("Belém Tower");
        draft.coordinates = Some(Coordinate::new(38.6916, -9.2160));
        *enrich.lookup_response.lock().unwrap() = Some(draft);

        let outcome = session.add_stop("Belem tower").await.unwrap();
        assert_eq!(outcome, AddedStop::Enriched);

        // Live propagation: the owning item already sees the stop
        let stored = store.get(&id).unwrap();
        assert_eq!(stored.itinerary.unwrap()[0].name, "Belém Tower");
    }

    #[tokio::test]
    async fn test_add_stop_falls_back_to_bare_on_failure() {
        let item = anchored_item("Lisbon trip");
        let id = item.id.clone();
        let (session, _store, enrich) = session_with(vec![item]);
        session.open(&id, RouteMode::Destination, RouteConfig::default()).unwrap();

        *enrich.fail.lock().unwrap() = true;
        let outcome = session.add_stop("Alfama").await.unwrap();
        assert_eq!(outcome, AddedStop::Bare);

        let stops = session.stops().unwrap();
        assert_eq!(stops[0].name, "Alfama");
        assert!(stops[0].coordinates.is_none());
    }

    #[tokio::test]
    async fn test_add_stop_blank_is_noop() {
        let item = anchored_item("Lisbon trip");
        let id = item.id.clone();
        let (session, _store, _enrich) = session_with(vec![item]);
        session.open(&id, RouteMode::Destination, RouteConfig::default()).unwrap();

        assert_eq!(session.add_stop("   ").await.unwrap(), AddedStop::IgnoredBlank);
        assert!(session.stops().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stale_response_discarded_when_session_closes_mid_flight() {
        let item = anchored_item("Lisbon trip");
        let id = item.id.clone();
        let (session, store, enrich) = session_with(vec![item]);
        session.open(&id, RouteMode::Destination, RouteConfig::default()).unwrap();

        // The session closes while the lookup is in flight
        let hook_session = session.clone();
        *enrich.on_call.lock().unwrap() = Some(Box::new(move || hook_session.close()));

        let result = session.add_stop("Alfama").await;
        assert!(matches!(result, Err(RouteError::StaleResponse)));

        // Nothing leaked into the item
        assert!(store.get(&id).unwrap().itinerary.is_none());
    }

    #[tokio::test]
    async fn test_reopen_invalidates_in_flight_result() {
        let one = anchored_item("Lisbon trip");
        let two = anchored_item("Porto trip");
        let (one_id, two_id) = (one.id.clone(), two.id.clone());
        let (session, store, enrich) = session_with(vec![one, two]);
        session.open(&one_id, RouteMode::Destination, RouteConfig::default()).unwrap();

        // Mid-flight, the user switches to planning a different item
        let hook_session = session.clone();
        let switch_to = two_id.clone();
        *enrich.on_call.lock().unwrap() = Some(Box::new(move || {
            hook_session
                .open(&switch_to, RouteMode::Destination, RouteConfig::default())
                .unwrap();
        }));

        assert!(matches!(
            session.add_stop("Alfama").await,
            Err(RouteError::StaleResponse)
        ));
        // The Lisbon result never landed in the Porto plan
        assert!(store.get(&two_id).unwrap().itinerary.is_none());
    }

    #[tokio::test]
    async fn test_regenerate_requires_confirmation_over_existing_stops() {
        let mut item = anchored_item("Lisbon trip");
        item.itinerary = Some(vec![ItineraryItem::bare("Old stop")]);
        let id = item.id.clone();
        let (session, _store, enrich) = session_with(vec![item]);
        session.open(&id, RouteMode::Destination, RouteConfig::default()).unwrap();

        *enrich.generated.lock().unwrap() =
            vec![ItineraryItem::bare("New A"), ItineraryItem::bare("New B")];

        assert!(matches!(
            session.regenerate_itinerary(false).await,
            Err(RouteError::ConfirmationRequired)
        ));
        assert_eq!(session.stops().unwrap()[0].name, "Old stop");

        let count = session.regenerate_itinerary(true).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(session.stops().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_regenerate_failure_leaves_stops_unchanged() {
        let mut item = anchored_item("Lisbon trip");
        item.itinerary = Some(vec![ItineraryItem::bare("Keep me")]);
        let id = item.id.clone();
        let (session, _store, enrich) = session_with(vec![item]);
        session.open(&id, RouteMode::Destination, RouteConfig::default()).unwrap();

        *enrich.fail.lock().unwrap() = true;
        assert!(matches!(
            session.regenerate_itinerary(true).await,
            Err(RouteError::Enrichment(_))
        ));
        assert_eq!(session.stops().unwrap()[0].name, "Keep me");
    }

    #[tokio::test]
    async fn test_optimize_order_reconciles_lossy_output() {
        let mut item = anchored_item("Lisbon trip");
        item.itinerary = Some(vec![
            ItineraryItem::bare("A"),
            ItineraryItem::bare("B"),
            ItineraryItem::bare("C"),
        ]);
        let id = item.id.clone();
        let (session, _store, enrich) = session_with(vec![item]);
        session.open(&id, RouteMode::Destination, RouteConfig::default()).unwrap();

        // Optimizer drops B entirely
        *enrich.ordered.lock().unwrap() = vec!["C".into(), "A".into()];
        session.optimize_order().await.unwrap();

        let names: Vec<String> = session.stops().unwrap().iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_optimize_needs_two_stops() {
        let mut item = anchored_item("Lisbon trip");
        item.itinerary = Some(vec![ItineraryItem::bare("Only one")]);
        let id = item.id.clone();
        let (session, _store, _enrich) = session_with(vec![item]);
        session.open(&id, RouteMode::Destination, RouteConfig::default()).unwrap();

        assert!(matches!(
            session.optimize_order().await,
            Err(RouteError::TooFewStops(1))
        ));
    }

    #[tokio::test]
    async fn test_set_start_location_normalizes_name() {
        let item = anchored_item("Lisbon trip");
        let id = item.id.clone();
        let (session, _store, enrich) = session_with(vec![item]);
        session.open(&id, RouteMode::RoadTrip, RouteConfig::default()).unwrap();

        let mut draft = ItineraryItem::bare("Porto, Portugal");
        draft.coordinates = Some(Coordinate::new(41.1579, -8.6291));
        *enrich.lookup_response.lock().unwrap() = Some(draft);

        let canonical = session.set_start_location("porto").await.unwrap();
        assert_eq!(canonical, "Porto, Portugal");
        assert!(session.stats().is_ok());
    }

    #[tokio::test]
    async fn test_set_start_location_failure_leaves_start_unset() {
        let item = anchored_item("Lisbon trip");
        let id = item.id.clone();
        let (session, _store, _enrich) = session_with(vec![item]);
        session.open(&id, RouteMode::RoadTrip, RouteConfig::default()).unwrap();

        // Lookup returns nothing usable
        assert!(matches!(
            session.set_start_location("nowheresville").await,
            Err(RouteError::StartUnresolved(_))
        ));
        // Distance math stays blocked
        assert!(matches!(session.stats(), Err(RouteError::StartUnresolved(_))));
    }

    #[tokio::test]
    async fn test_suggest_stops_requires_start() {
        let item = anchored_item("Lisbon trip");
        let id = item.id.clone();
        let (session, _store, _enrich) = session_with(vec![item]);
        session.open(&id, RouteMode::RoadTrip, RouteConfig::default()).unwrap();

        assert!(matches!(
            session.suggest_road_trip_stops(true).await,
            Err(RouteError::StartNotSet)
        ));
    }

    #[tokio::test]
    async fn test_operations_require_open_planner() {
        let (session, _store, _enrich) = session_with(vec![]);
        assert!(matches!(session.stops(), Err(RouteError::PlannerClosed)));
        assert!(matches!(
            session.add_stop("X").await,
            Err(RouteError::PlannerClosed)
        ));
    }
}
