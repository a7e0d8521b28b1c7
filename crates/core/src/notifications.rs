//! The in-app notification feed.
//!
//! A side-channel log of everything the radar and reminder subsystems told
//! the user. Append-only, newest first, capped to the 50 most recent; the
//! only mutations are mark-read and clear-all.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Maximum number of notifications kept in the feed.
pub const FEED_CAP: usize = 50;

/// Category of an in-app notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Proximity alert from the radar
    Location,
    /// Scheduled reminder or other system-initiated message
    System,
    /// Informational message
    Info,
}

/// One entry in the notification feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppNotification {
    /// Unique id
    pub id: String,
    /// Short headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Whether the user has seen it
    pub read: bool,
    /// Category
    pub kind: NotificationKind,
    /// The bucket item this refers to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_item_id: Option<String>,
}

impl AppNotification {
    /// Creates a new unread notification stamped with the current time.
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        related_item_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            message: message.into(),
            timestamp: Utc::now(),
            read: false,
            kind,
            related_item_id,
        }
    }
}

/// Append-only notification feed, capped to [`FEED_CAP`] entries.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NotificationLog {
    entries: VecDeque<AppNotification>,
}

impl NotificationLog {
    /// Creates an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a notification, evicting the oldest past the cap.
    pub fn push(&mut self, notification: AppNotification) {
        self.entries.push_front(notification);
        self.entries.truncate(FEED_CAP);
    }

    /// All entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &AppNotification> {
        self.entries.iter()
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the feed is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of unread entries.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    /// Marks one entry read. Returns false for an unknown id.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(entry) => {
                entry.read = true;
                true
            }
            None => false,
        }
    }

    /// Marks every entry read.
    pub fn mark_all_read(&mut self) {
        for entry in &mut self.entries {
            entry.read = true;
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
