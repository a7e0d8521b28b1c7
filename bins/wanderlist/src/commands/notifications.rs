//! The in-app notification feed.

use crate::output::{format_count, Status};
use crate::state::AppState;
use anyhow::Result;
use owo_colors::OwoColorize;

/// Feed subcommands.
#[derive(Debug, clap::Subcommand)]
pub enum NotificationsAction {
    /// List the feed, newest first
    List,
    /// Mark one entry read by id prefix
    Read {
        /// Notification id (prefix accepted)
        id: String,
    },
    /// Mark everything read
    ReadAll,
    /// Clear the feed
    Clear,
}

/// Runs a feed action.
pub fn run(state: &AppState, action: NotificationsAction) -> Result<()> {
    let mut feed = state.load_feed();

    match action {
        NotificationsAction::List => {
            if feed.is_empty() {
                Status::info("No notifications");
                return Ok(());
            }
            Status::header(&format!(
                "{} ({} unread)",
                format_count(feed.len(), "notification", "notifications"),
                feed.unread_count()
            ));
            for entry in feed.entries() {
                let mark = if entry.read { " " } else { "•" };
                println!(
                    "{mark} {} {} — {}",
                    (&entry.id[..8]).dimmed(),
                    entry.title.bold(),
                    entry.message
                );
            }
            return Ok(());
        }
        NotificationsAction::Read { id } => {
            let full_id = feed
                .entries()
                .find(|n| n.id.starts_with(&id))
                .map(|n| n.id.clone());
            match full_id {
                Some(full_id) => {
                    feed.mark_read(&full_id);
                    Status::success("Marked read");
                }
                None => Status::warning(&format!("No notification matches \"{id}\"")),
            }
        }
        NotificationsAction::ReadAll => {
            feed.mark_all_read();
            Status::success("All read");
        }
        NotificationsAction::Clear => {
            feed.clear();
            Status::success("Feed cleared");
        }
    }

    state.save_feed(&feed)
}
