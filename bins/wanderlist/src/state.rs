//! On-disk application state for the CLI.
//!
//! Items, the notification feed and reminder markers each live in their own
//! JSON file under the data directory.

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wanderlist_core::config::Config;
use wanderlist_core::notifications::NotificationLog;
use wanderlist_core::store::JsonStore;
use wanderlist_reminders::Marker;

/// Paths and configuration shared by every command.
pub struct AppState {
    /// Loaded configuration
    pub config: Config,
    data_dir: PathBuf,
}

impl AppState {
    /// Loads configuration and prepares the data directory.
    pub fn open(config_path: Option<&str>, data_dir: PathBuf) -> Result<Self> {
        let config = Config::load(config_path).context("loading configuration")?;
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("creating data dir {}", data_dir.display()))?;
        Ok(Self { config, data_dir })
    }

    /// Opens the item store.
    pub fn store(&self) -> Result<Arc<JsonStore>> {
        let store = JsonStore::open(self.data_dir.join("items.json"))
            .context("opening item store")?;
        Ok(Arc::new(store))
    }

    /// Loads the notification feed, empty when none was saved yet.
    pub fn load_feed(&self) -> NotificationLog {
        load_json(&self.data_dir.join("notifications.json")).unwrap_or_default()
    }

    /// Persists the notification feed.
    pub fn save_feed(&self, feed: &NotificationLog) -> Result<()> {
        save_json(&self.data_dir.join("notifications.json"), feed)
    }

    /// Loads reminder markers from earlier runs.
    pub fn load_markers(&self) -> Vec<Marker> {
        load_json(&self.data_dir.join("reminders.json")).unwrap_or_default()
    }

    /// Persists reminder markers.
    pub fn save_markers(&self, markers: &[Marker]) -> Result<()> {
        save_json(&self.data_dir.join("reminders.json"), &markers)
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable state file");
            None
        }
    }
}

fn save_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
