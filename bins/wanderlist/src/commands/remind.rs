//! One-shot reminder tick.

use crate::output::Status;
use crate::sinks::ConsoleSinks;
use crate::state::AppState;
use anyhow::Result;
use std::sync::{Arc, RwLock};
use wanderlist_reminders::{ReminderCheck, SystemClock};

/// Runs one reminder check against the wall clock.
///
/// Markers persist between runs, so a window that already fired today
/// stays quiet no matter how often this is called.
pub fn tick(state: &AppState) -> Result<()> {
    let (check, feed) = build(state)?;

    match check.tick() {
        Some(fired) => {
            Status::success(&format!("Reminder sent for {}", fired.title));
            state.save_feed(&feed.read().unwrap())?;
        }
        None => Status::info("Nothing to remind right now"),
    }
    state.save_markers(&check.markers())?;
    Ok(())
}

/// Polls the reminder check until interrupted.
pub fn watch(state: &AppState, interval_secs: u64) -> Result<()> {
    let (check, feed) = build(state)?;
    Status::info(&format!("Watching for reminder windows every {interval_secs}s (Ctrl-C to stop)"));

    loop {
        if let Some(fired) = check.tick() {
            Status::success(&format!("Reminder sent for {}", fired.title));
            state.save_feed(&feed.read().unwrap())?;
            state.save_markers(&check.markers())?;
        }
        std::thread::sleep(std::time::Duration::from_secs(interval_secs));
    }
}

type Check = ReminderCheck<SystemClock>;

fn build(state: &AppState) -> Result<(Check, Arc<RwLock<wanderlist_core::notifications::NotificationLog>>)> {
    let store = state.store()?;
    let sinks = ConsoleSinks::new();
    let feed = Arc::new(RwLock::new(state.load_feed()));

    let check = ReminderCheck::with_markers(
        SystemClock,
        state.config.schema.reminders.clone(),
        store,
        sinks,
        feed.clone(),
        state.load_markers(),
    );
    Ok((check, feed))
}
