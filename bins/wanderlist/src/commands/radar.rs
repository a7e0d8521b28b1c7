//! Radar session replay.
//!
//! Replays a JSON sample file through a live radar session so the whole
//! pipeline — permission, subscription, sweep, dedup, side effects — runs
//! exactly as it would against a real location stream.

use crate::output::{format_count, Status};
use crate::sinks::{ConsoleSinks, ReplayProvider, ReplaySample};
use crate::state::AppState;
use anyhow::{Context as _, Result};
use std::path::Path;
use std::sync::{Arc, RwLock};
use wanderlist_radar::{LocationOptions, ProximityRadar, RadarDeps, SharedRange};

/// Runs a radar session over the samples in `path`.
pub fn replay(state: &AppState, path: &Path, range_override: Option<f64>) -> Result<()> {
    let samples: Vec<ReplaySample> = serde_json::from_str(
        &std::fs::read_to_string(path)
            .with_context(|| format!("reading samples from {}", path.display()))?,
    )
    .context("parsing sample file")?;

    let store = state.store()?;
    let sinks = ConsoleSinks::new();
    let provider = Arc::new(ReplayProvider::default());
    let feed = Arc::new(RwLock::new(state.load_feed()));
    let range = SharedRange::new(
        range_override.unwrap_or(state.config.schema.radar.proximity_range_m),
    );

    let radar = ProximityRadar::new(
        provider.clone(),
        LocationOptions::from(&state.config.schema.location),
        RadarDeps {
            store,
            range,
            notifier: sinks.clone(),
            speech: sinks.clone(),
            toast: sinks.clone(),
            feed: feed.clone(),
        },
    );

    radar.start().map_err(|e| anyhow::anyhow!("{e}"))?;
    Status::info(&format!(
        "Radar on, replaying {}",
        format_count(samples.len(), "sample", "samples")
    ));

    for sample in &samples {
        provider.deliver(sample);
        if !radar.is_on() {
            Status::warning("Radar was forced off mid-replay");
            break;
        }
    }

    let alerted = radar.notified_count();
    if radar.is_on() {
        radar.stop();
    }
    state.save_feed(&feed.read().unwrap())?;

    Status::success(&format!(
        "Replay done, {} alerted",
        format_count(alerted, "item", "items")
    ));
    Ok(())
}
