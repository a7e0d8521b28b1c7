//! The radar session state machine.

use crate::error::{RadarError, Result};
use crate::provider::{
    LocationError, LocationObserver, LocationOptions, LocationProvider, Subscription,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};
use wanderlist_core::model::BucketItem;
use wanderlist_core::notifications::{AppNotification, NotificationKind, NotificationLog};
use wanderlist_core::store::ItemStore;
use wanderlist_core::traits::{NotificationSink, SpeechSink, ToastSink};
use wanderlist_geo::{approach_phrase, distance_meters, format_distance, Coordinate};

/// Live handle to the externally owned proximity threshold.
///
/// The radar reads it on every fix, so changing the range mid-session takes
/// effect on the next sample without restarting.
#[derive(Clone, Debug)]
pub struct SharedRange(Arc<RwLock<f64>>);

impl SharedRange {
    /// Wraps an initial range in meters.
    #[must_use]
    pub fn new(meters: f64) -> Self {
        Self(Arc::new(RwLock::new(meters)))
    }

    /// Current range in meters.
    #[must_use]
    pub fn get(&self) -> f64 {
        *self.0.read().unwrap()
    }

    /// Replaces the range.
    pub fn set(&self, meters: f64) {
        *self.0.write().unwrap() = meters;
    }
}

/// Everything the radar needs besides the location stream.
pub struct RadarDeps {
    /// The owning item collection, read at sample time
    pub store: Arc<dyn ItemStore>,
    /// The live proximity threshold
    pub range: SharedRange,
    /// Platform notifications
    pub notifier: Arc<dyn NotificationSink>,
    /// Spoken alerts
    pub speech: Arc<dyn SpeechSink>,
    /// Transient user messages
    pub toast: Arc<dyn ToastSink>,
    /// The in-app notification feed
    pub feed: Arc<RwLock<NotificationLog>>,
}

/// Mutable session state, serialized behind one lock.
///
/// Radar callbacks and user-driven toggles race on a multi-threaded host;
/// the lock preserves the at-most-once-per-session guarantee.
struct SessionState {
    active: bool,
    notified: HashSet<String>,
    last_fix: Option<Coordinate>,
    subscription: Option<Subscription>,
}

impl SessionState {
    fn idle() -> Self {
        Self {
            active: false,
            notified: HashSet::new(),
            last_fix: None,
            subscription: None,
        }
    }
}

struct RadarInner {
    deps: RadarDeps,
    state: Mutex<SessionState>,
}

/// The proximity radar: off until started, then alerting on every fix.
pub struct ProximityRadar {
    provider: Arc<dyn LocationProvider>,
    options: LocationOptions,
    inner: Arc<RadarInner>,
}

impl ProximityRadar {
    /// Creates a radar in the off state.
    pub fn new(
        provider: Arc<dyn LocationProvider>,
        options: LocationOptions,
        deps: RadarDeps,
    ) -> Self {
        Self {
            provider,
            options,
            inner: Arc::new(RadarInner {
                deps,
                state: Mutex::new(SessionState::idle()),
            }),
        }
    }

    /// Turns the radar on.
    ///
    /// Requests notification permission first; denial fails the transition
    /// and the radar stays off. On success the per-session notified set is
    /// cleared and the location subscription opened.
    pub fn start(&self) -> Result<()> {
        if self.inner.state.lock().unwrap().active {
            return Err(RadarError::AlreadyOn);
        }

        if !self.inner.deps.notifier.request_permission() {
            tracing::warn!("Notification permission denied, radar stays off");
            self.inner
                .deps
                .toast
                .toast("Notifications are blocked — the radar cannot run");
            return Err(RadarError::PermissionDenied);
        }

        {
            let mut state = self.inner.state.lock().unwrap();
            state.active = true;
            state.notified.clear();
            state.last_fix = None;
        }

        let observer: Arc<dyn LocationObserver> = self.inner.clone();
        let subscription = self.provider.subscribe(self.options, observer);
        {
            let mut state = self.inner.state.lock().unwrap();
            if !state.active {
                // A fatal error already tore the session down while the
                // subscription was being opened; dropping cancels it.
                drop(state);
                drop(subscription);
                return Err(RadarError::PermissionDenied);
            }
            state.subscription = Some(subscription);
        }

        tracing::info!(range_m = self.inner.deps.range.get(), "Radar on");
        Ok(())
    }

    /// Turns the radar off, cancelling the subscription and clearing the
    /// last fix and the notified set. A no-op when already off.
    pub fn stop(&self) {
        self.inner.shutdown();
        tracing::info!("Radar off");
    }

    /// True while a session is running.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.inner.state.lock().unwrap().active
    }

    /// The most recent fix of the current session, if any.
    #[must_use]
    pub fn last_fix(&self) -> Option<Coordinate> {
        self.inner.state.lock().unwrap().last_fix
    }

    /// Number of items alerted in the current session.
    #[must_use]
    pub fn notified_count(&self) -> usize {
        self.inner.state.lock().unwrap().notified.len()
    }
}

impl RadarInner {
    /// Tears the session down. Safe to call from any state.
    fn shutdown(&self) {
        let subscription = {
            let mut state = self.state.lock().unwrap();
            state.active = false;
            state.notified.clear();
            state.last_fix = None;
            state.subscription.take()
        };
        // Cancel outside the lock; the provider may run the cancel action
        // synchronously.
        if let Some(sub) = subscription {
            sub.cancel();
        }
    }

    fn alert(&self, item: &BucketItem, meters: f64) {
        let distance = format_distance(meters);

        self.deps
            .notifier
            .notify(&item.title, &format!("Only {distance} away!"), &item.id);

        let mut spoken = format!("You're {} {}.", approach_phrase(meters), item.title);
        if !item.description.is_empty() {
            spoken.push(' ');
            spoken.push_str(&item.description);
        }
        self.deps.speech.speak(&spoken);

        self.deps.feed.write().unwrap().push(AppNotification::new(
            NotificationKind::Location,
            item.title.clone(),
            format!("You are {distance} from this spot."),
            Some(item.id.clone()),
        ));

        self.deps
            .toast
            .toast(&format!("{} is {distance} away", item.title));

        tracing::info!(item = %item.id, meters, "Proximity alert");
    }
}

impl LocationObserver for RadarInner {
    fn fix(&self, position: Coordinate) {
        // Select under the lock, emit outside it. Marking the notified set
        // before emitting keeps the at-most-once guarantee even if a sink
        // re-enters the radar.
        let alerts: Vec<(BucketItem, f64)> = {
            let mut state = self.state.lock().unwrap();
            if !state.active {
                // A sample can arrive after cancellation; never alert for it.
                return;
            }
            state.last_fix = Some(position);

            let range = self.deps.range.get();
            let items = self.deps.store.all();

            let mut hits = Vec::new();
            for item in items {
                if !item.is_radar_target() || state.notified.contains(&item.id) {
                    continue;
                }
                let Some(target) = item.coordinates else { continue };
                let meters = distance_meters(&position, &target);
                if meters < range {
                    state.notified.insert(item.id.clone());
                    hits.push((item, meters));
                }
            }
            hits
        };

        for (item, meters) in alerts {
            self.alert(&item, meters);
        }
    }

    fn error(&self, error: LocationError) {
        if error.is_fatal() {
            tracing::warn!(%error, "Fatal location error, forcing radar off");
            self.deps
                .toast
                .toast("Location permission denied — radar turned off");
            self.shutdown();
        } else {
            // Transient: the subscription recovers on its own.
            tracing::debug!(%error, "Transient location error");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use wanderlist_core::store::MemoryStore;

    /// Provider driven by the test: fixes and errors are pushed by hand.
    #[derive(Default)]
    struct ScriptedProvider {
        observer: Arc<Mutex<Option<Arc<dyn LocationObserver>>>>,
        cancelled: Arc<AtomicBool>,
        // When set, cancel() leaves the observer in place, simulating a
        // sample already in flight when the radar stopped.
        keep_observer_on_cancel: bool,
    }

    impl ScriptedProvider {
        fn push_fix(&self, position: Coordinate) {
            let observer = self.observer.lock().unwrap().clone();
            if let Some(obs) = observer {
                obs.fix(position);
            }
        }

        fn push_error(&self, error: LocationError) {
            let observer = self.observer.lock().unwrap().clone();
            if let Some(obs) = observer {
                obs.error(error);
            }
        }

        fn was_cancelled(&self) -> bool {
            self.cancelled.load(Ordering::SeqCst)
        }
    }

    impl LocationProvider for ScriptedProvider {
        fn subscribe(
            &self,
            _options: LocationOptions,
            observer: Arc<dyn LocationObserver>,
        ) -> Subscription {
            *self.observer.lock().unwrap() = Some(observer);
            let slot = self.observer.clone();
            let cancelled = self.cancelled.clone();
            let keep = self.keep_observer_on_cancel;
            Subscription::new(move || {
                cancelled.store(true, Ordering::SeqCst);
                if !keep {
                    *slot.lock().unwrap() = None;
                }
            })
        }
    }

    /// Records everything; implements all three sinks.
    struct Recorder {
        allow_permission: bool,
        notifications: Mutex<Vec<String>>,
        spoken: Mutex<Vec<String>>,
        toasts: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn new(allow_permission: bool) -> Arc<Self> {
            Arc::new(Self {
                allow_permission,
                notifications: Mutex::new(Vec::new()),
                spoken: Mutex::new(Vec::new()),
                toasts: Mutex::new(Vec::new()),
            })
        }

        fn notification_count(&self) -> usize {
            self.notifications.lock().unwrap().len()
        }
    }

    impl NotificationSink for Recorder {
        fn request_permission(&self) -> bool {
            self.allow_permission
        }
        fn notify(&self, title: &str, _body: &str, _dedupe_key: &str) {
            self.notifications.lock().unwrap().push(title.to_string());
        }
    }

    impl SpeechSink for Recorder {
        fn speak(&self, text: &str) {
            self.spoken.lock().unwrap().push(text.to_string());
        }
    }

    impl ToastSink for Recorder {
        fn toast(&self, message: &str) {
            self.toasts.lock().unwrap().push(message.to_string());
        }
    }

    fn geocoded_item(title: &str, lat: f64, lng: f64) -> BucketItem {
        let mut item = BucketItem::new(title).unwrap();
        item.coordinates = Some(Coordinate::new(lat, lng));
        item
    }

    struct Rig {
        provider: Arc<ScriptedProvider>,
        store: Arc<MemoryStore>,
        range: SharedRange,
        recorder: Arc<Recorder>,
        feed: Arc<RwLock<NotificationLog>>,
        radar: ProximityRadar,
    }

    fn rig(items: Vec<BucketItem>, range_m: f64, allow_permission: bool) -> Rig {
        rig_with_provider(ScriptedProvider::default(), items, range_m, allow_permission)
    }

    fn rig_with_provider(
        provider: ScriptedProvider,
        items: Vec<BucketItem>,
        range_m: f64,
        allow_permission: bool,
    ) -> Rig {
        let provider = Arc::new(provider);
        let store = Arc::new(MemoryStore::with_items(items));
        let range = SharedRange::new(range_m);
        let recorder = Recorder::new(allow_permission);
        let feed = Arc::new(RwLock::new(NotificationLog::new()));

        let radar = ProximityRadar::new(
            provider.clone(),
            LocationOptions::default(),
            RadarDeps {
                store: store.clone(),
                range: range.clone(),
                notifier: recorder.clone(),
                speech: recorder.clone(),
                toast: recorder.clone(),
                feed: feed.clone(),
            },
        );

        Rig { provider, store, range, recorder, feed, radar }
    }

    #[test]
    fn test_notifies_at_most_once_per_session() {
        let rig = rig(vec![geocoded_item("Old Town", 10.0, 10.0)], 2000.0, true);
        rig.radar.start().unwrap();

        // ~15.7 m from the target, twice
        let nearby = Coordinate::new(10.0001, 10.0001);
        rig.provider.push_fix(nearby);
        rig.provider.push_fix(nearby);

        assert_eq!(rig.recorder.notification_count(), 1);
        assert_eq!(rig.radar.notified_count(), 1);
        assert_eq!(rig.feed.read().unwrap().len(), 1);
        assert_eq!(rig.recorder.spoken.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_toggle_off_and_on_clears_dedup() {
        let rig = rig(vec![geocoded_item("Old Town", 10.0, 10.0)], 2000.0, true);
        let nearby = Coordinate::new(10.0001, 10.0001);

        rig.radar.start().unwrap();
        rig.provider.push_fix(nearby);
        rig.radar.stop();

        rig.radar.start().unwrap();
        rig.provider.push_fix(nearby);

        assert_eq!(rig.recorder.notification_count(), 2);
    }

    #[test]
    fn test_range_change_mid_session_applies_next_sample() {
        // Target one degree of longitude away: ~111 km
        let rig = rig(vec![geocoded_item("Far Fort", 0.0, 1.0)], 2000.0, true);
        rig.radar.start().unwrap();

        rig.provider.push_fix(Coordinate::new(0.0, 0.0));
        assert_eq!(rig.recorder.notification_count(), 0);

        rig.range.set(200_000.0);
        rig.provider.push_fix(Coordinate::new(0.0, 0.0));
        assert_eq!(rig.recorder.notification_count(), 1);
    }

    #[test]
    fn test_items_added_mid_session_are_seen() {
        let rig = rig(vec![], 2000.0, true);
        rig.radar.start().unwrap();

        rig.provider.push_fix(Coordinate::new(10.0, 10.0));
        assert_eq!(rig.recorder.notification_count(), 0);

        rig.store.insert(geocoded_item("New Spot", 10.0, 10.0)).unwrap();
        rig.provider.push_fix(Coordinate::new(10.0, 10.0));
        assert_eq!(rig.recorder.notification_count(), 1);
    }

    #[test]
    fn test_completed_and_ungeocoded_items_skipped() {
        let mut done = geocoded_item("Done Already", 10.0, 10.0);
        done.complete_on(chrono::Utc::now());
        let bare = BucketItem::new("No Coordinates").unwrap();

        let rig = rig(vec![done, bare], 2000.0, true);
        rig.radar.start().unwrap();
        rig.provider.push_fix(Coordinate::new(10.0, 10.0));

        assert_eq!(rig.recorder.notification_count(), 0);
    }

    #[test]
    fn test_permission_denied_blocks_start() {
        let rig = rig(vec![], 2000.0, false);
        assert!(matches!(rig.radar.start(), Err(RadarError::PermissionDenied)));
        assert!(!rig.radar.is_on());
        assert_eq!(rig.recorder.toasts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_fatal_location_error_forces_off() {
        let rig = rig(vec![], 2000.0, true);
        rig.radar.start().unwrap();

        rig.provider.push_error(LocationError::PermissionDenied);

        assert!(!rig.radar.is_on());
        assert!(rig.provider.was_cancelled());
        assert_eq!(rig.recorder.toasts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_transient_error_keeps_session() {
        let rig = rig(vec![geocoded_item("Old Town", 10.0, 10.0)], 2000.0, true);
        rig.radar.start().unwrap();

        rig.provider.push_error(LocationError::Timeout);
        rig.provider.push_error(LocationError::Unavailable("gps cold".into()));
        assert!(rig.radar.is_on());

        // Stream recovers and alerts still fire
        rig.provider.push_fix(Coordinate::new(10.0001, 10.0001));
        assert_eq!(rig.recorder.notification_count(), 1);
    }

    #[test]
    fn test_no_alert_for_in_flight_sample_after_stop() {
        let provider = ScriptedProvider {
            keep_observer_on_cancel: true,
            ..Default::default()
        };
        let rig = rig_with_provider(
            provider,
            vec![geocoded_item("Old Town", 10.0, 10.0)],
            2000.0,
            true,
        );
        rig.radar.start().unwrap();
        rig.radar.stop();

        // The provider still holds the observer — a sample was in flight.
        rig.provider.push_fix(Coordinate::new(10.0001, 10.0001));
        assert_eq!(rig.recorder.notification_count(), 0);
    }

    #[test]
    fn test_double_start_rejected() {
        let rig = rig(vec![], 2000.0, true);
        rig.radar.start().unwrap();
        assert!(matches!(rig.radar.start(), Err(RadarError::AlreadyOn)));
    }

    #[test]
    fn test_stop_clears_last_fix() {
        let rig = rig(vec![], 2000.0, true);
        rig.radar.start().unwrap();
        rig.provider.push_fix(Coordinate::new(1.0, 1.0));
        assert!(rig.radar.last_fix().is_some());

        rig.radar.stop();
        assert!(rig.radar.last_fix().is_none());
        assert_eq!(rig.radar.notified_count(), 0);
    }
}
