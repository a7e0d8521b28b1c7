//! Scheduled bucket list reminders.
//!
//! A low-frequency poll checks the local wall clock against two daily
//! windows (morning and evening). The first tick inside a window picks one
//! random incomplete item and fires a system notification plus a feed
//! entry, then records a marker for (date, window) so the window fires at
//! most once per calendar day. Missed windows are never retried.

#![warn(missing_docs)]

use chrono::{DateTime, Datelike as _, Local, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};
use wanderlist_core::config::ReminderConfig;
use wanderlist_core::notifications::{AppNotification, NotificationKind, NotificationLog};
use wanderlist_core::retry::rand_simple;
use wanderlist_core::store::ItemStore;
use wanderlist_core::traits::NotificationSink;

/// Source of local wall-clock time; swapped out in tests.
pub trait Clock: Send + Sync {
    /// The current local time.
    fn now(&self) -> DateTime<Local>;
}

/// The real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Which daily window a reminder belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    /// The morning window
    Morning,
    /// The evening window
    Evening,
}

/// A `(date, window)` pair that has already fired.
pub type Marker = (NaiveDate, Slot);

/// What a tick produced, when it produced anything.
#[derive(Debug, Clone)]
pub struct ReminderFired {
    /// The window that fired
    pub slot: Slot,
    /// The randomly chosen item
    pub item_id: String,
    /// Its title, for display
    pub title: String,
}

/// The reminder checker.
pub struct ReminderCheck<C: Clock> {
    clock: C,
    config: ReminderConfig,
    store: Arc<dyn ItemStore>,
    notifier: Arc<dyn NotificationSink>,
    feed: Arc<RwLock<NotificationLog>>,
    sent: Mutex<HashSet<Marker>>,
}

impl<C: Clock> ReminderCheck<C> {
    /// Creates a checker with no markers set.
    pub fn new(
        clock: C,
        config: ReminderConfig,
        store: Arc<dyn ItemStore>,
        notifier: Arc<dyn NotificationSink>,
        feed: Arc<RwLock<NotificationLog>>,
    ) -> Self {
        Self::with_markers(clock, config, store, notifier, feed, Vec::new())
    }

    /// Creates a checker seeded with markers persisted from an earlier run.
    pub fn with_markers(
        clock: C,
        config: ReminderConfig,
        store: Arc<dyn ItemStore>,
        notifier: Arc<dyn NotificationSink>,
        feed: Arc<RwLock<NotificationLog>>,
        markers: Vec<Marker>,
    ) -> Self {
        Self {
            clock,
            config,
            store,
            notifier,
            feed,
            sent: Mutex::new(markers.into_iter().collect()),
        }
    }

    /// Current markers, for persistence between runs.
    pub fn markers(&self) -> Vec<Marker> {
        self.sent.lock().unwrap().iter().copied().collect()
    }

    /// One poll of the wall clock.
    ///
    /// Fires at most one reminder; returns what fired, if anything.
    pub fn tick(&self) -> Option<ReminderFired> {
        let now = self.clock.now();
        let slot = self.slot_for_hour(now.hour())?;
        let marker = (now.date_naive(), slot);

        {
            let sent = self.sent.lock().unwrap();
            if sent.contains(&marker) {
                return None;
            }
        }

        let incomplete: Vec<_> = self
            .store
            .all()
            .into_iter()
            .filter(|item| !item.completed)
            .collect();
        if incomplete.is_empty() {
            // No marker: the window can still fire once an item shows up.
            return None;
        }

        // Uniform pick; ties and weighting are intentionally absent.
        let index = ((rand_simple() * incomplete.len() as f64) as usize).min(incomplete.len() - 1);
        let item = &incomplete[index];

        let (title, body) = match slot {
            Slot::Morning => (
                "Morning nudge".to_string(),
                format!("A good day to get closer to: {}", item.title),
            ),
            Slot::Evening => (
                "Evening check-in".to_string(),
                format!("{} is still waiting for you", item.title),
            ),
        };

        self.notifier.notify(&title, &body, &item.id);
        self.feed.write().unwrap().push(AppNotification::new(
            NotificationKind::System,
            title,
            body,
            Some(item.id.clone()),
        ));
        self.sent.lock().unwrap().insert(marker);

        tracing::info!(
            item = %item.id,
            slot = ?slot,
            day = marker.0.day(),
            "Reminder fired"
        );

        Some(ReminderFired {
            slot,
            item_id: item.id.clone(),
            title: item.title.clone(),
        })
    }

    fn slot_for_hour(&self, hour: u32) -> Option<Slot> {
        if self.config.morning.contains(hour) {
            Some(Slot::Morning)
        } else if self.config.evening.contains(hour) {
            Some(Slot::Evening)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wanderlist_core::model::BucketItem;
    use wanderlist_core::store::MemoryStore;

    /// Clock pinned by the test.
    struct FixedClock(Mutex<DateTime<Local>>);

    impl FixedClock {
        fn at(y: i32, m: u32, d: u32, h: u32) -> Self {
            Self(Mutex::new(Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()))
        }

        fn set(&self, y: i32, m: u32, d: u32, h: u32) {
            *self.0.lock().unwrap() = Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        }
    }

    impl Clock for &FixedClock {
        fn now(&self) -> DateTime<Local> {
            *self.0.lock().unwrap()
        }
    }

    struct CountingSink(Mutex<Vec<String>>);

    impl NotificationSink for CountingSink {
        fn request_permission(&self) -> bool {
            true
        }
        fn notify(&self, title: &str, _body: &str, _dedupe_key: &str) {
            self.0.lock().unwrap().push(title.to_string());
        }
    }

    fn checker<'a>(
        clock: &'a FixedClock,
        items: Vec<BucketItem>,
    ) -> (ReminderCheck<&'a FixedClock>, Arc<MemoryStore>, Arc<CountingSink>) {
        let store = Arc::new(MemoryStore::with_items(items));
        let sink = Arc::new(CountingSink(Mutex::new(Vec::new())));
        let feed = Arc::new(RwLock::new(NotificationLog::new()));
        let check = ReminderCheck::new(
            clock,
            ReminderConfig::default(),
            store.clone(),
            sink.clone(),
            feed,
        );
        (check, store, sink)
    }

    fn item(title: &str) -> BucketItem {
        BucketItem::new(title).unwrap()
    }

    #[test]
    fn test_morning_fires_once_per_day() {
        let clock = FixedClock::at(2024, 5, 1, 11);
        let (check, _store, sink) = checker(&clock, vec![item("Learn to surf")]);

        let fired = check.tick();
        assert!(matches!(fired, Some(ReminderFired { slot: Slot::Morning, .. })));
        assert_eq!(sink.0.lock().unwrap().len(), 1);

        // Same window, same day: nothing
        assert!(check.tick().is_none());

        // Next day, same hour: fires again
        clock.set(2024, 5, 2, 11);
        assert!(check.tick().is_some());
        assert_eq!(sink.0.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_evening_window_is_independent() {
        let clock = FixedClock::at(2024, 5, 1, 11);
        let (check, _store, sink) = checker(&clock, vec![item("Learn to surf")]);

        assert!(check.tick().is_some());

        clock.set(2024, 5, 1, 18);
        let fired = check.tick().unwrap();
        assert_eq!(fired.slot, Slot::Evening);
        assert_eq!(sink.0.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_outside_windows_nothing_fires() {
        let clock = FixedClock::at(2024, 5, 1, 14);
        let (check, _store, sink) = checker(&clock, vec![item("Learn to surf")]);

        assert!(check.tick().is_none());
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_no_incomplete_items_no_marker() {
        let clock = FixedClock::at(2024, 5, 1, 11);
        let mut done = item("Been there");
        done.complete_on(chrono::Utc::now());
        let (check, store, _sink) = checker(&clock, vec![done]);

        assert!(check.tick().is_none());

        // The window was not burned: an item added later still triggers it
        store.insert(item("New dream")).unwrap();
        assert!(check.tick().is_some());
    }

    #[test]
    fn test_completed_items_never_picked() {
        let clock = FixedClock::at(2024, 5, 1, 11);
        let mut done = item("Been there");
        done.complete_on(chrono::Utc::now());
        let open = item("Still open");
        let open_id = open.id.clone();
        let (check, _store, _sink) = checker(&clock, vec![done, open]);

        let fired = check.tick().unwrap();
        assert_eq!(fired.item_id, open_id);
    }

    #[test]
    fn test_markers_survive_restart() {
        let clock = FixedClock::at(2024, 5, 1, 11);
        let (check, _store, _sink) = checker(&clock, vec![item("Learn to surf")]);
        check.tick().unwrap();

        let markers = check.markers();
        assert_eq!(markers.len(), 1);

        // A new checker seeded with the old markers stays quiet
        let store = Arc::new(MemoryStore::with_items(vec![item("Learn to surf")]));
        let sink = Arc::new(CountingSink(Mutex::new(Vec::new())));
        let feed = Arc::new(RwLock::new(NotificationLog::new()));
        let restarted = ReminderCheck::with_markers(
            &clock,
            ReminderConfig::default(),
            store,
            sink.clone(),
            feed,
            markers,
        );
        assert!(restarted.tick().is_none());
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_feed_receives_system_entry() {
        let clock = FixedClock::at(2024, 5, 1, 18);
        let store = Arc::new(MemoryStore::with_items(vec![item("Learn to surf")]));
        let sink = Arc::new(CountingSink(Mutex::new(Vec::new())));
        let feed = Arc::new(RwLock::new(NotificationLog::new()));
        let check = ReminderCheck::new(
            &clock,
            ReminderConfig::default(),
            store,
            sink,
            feed.clone(),
        );

        check.tick().unwrap();
        let log = feed.read().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries().next().unwrap().kind, NotificationKind::System);
    }
}
