//! Item CRUD and the one-shot proximity sweep.

use crate::commands::resolve_item;
use crate::output::{format_count, Status};
use crate::state::AppState;
use anyhow::Result;
use chrono::{NaiveDate, TimeZone as _, Utc};
use owo_colors::OwoColorize;
use wanderlist_core::model::BucketItem;
use wanderlist_core::store::ItemStore;
use wanderlist_geo::{format_distance, within_radius, Coordinate, Target};

/// Lists items, newest last; completed items only with `all`.
pub fn list(state: &AppState, all: bool) -> Result<()> {
    let store = state.store()?;
    let items = store.all();

    let shown: Vec<_> = items.iter().filter(|i| all || !i.completed).collect();
    if shown.is_empty() {
        Status::info("Nothing on the list yet");
        return Ok(());
    }

    Status::header(&format!("Bucket list ({})", format_count(shown.len(), "item", "items")));
    for item in shown {
        let mark = if item.completed { "✓".green().to_string() } else { "·".to_string() };
        let place = item
            .location_name
            .as_deref()
            .map(|l| format!(" — {l}"))
            .unwrap_or_default();
        println!("{} {} {}{}", mark, short_id(&item.id).dimmed(), item.title, place.dimmed());
    }
    Ok(())
}

/// Adds a new item.
pub fn add(
    state: &AppState,
    title: &str,
    description: Option<String>,
    location: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<()> {
    let store = state.store()?;
    let mut item = BucketItem::new(title)?;
    if let Some(description) = description {
        item.description = description;
    }
    item.location_name = location;
    if let (Some(lat), Some(lng)) = (lat, lng) {
        item.coordinates = Some(Coordinate::new(lat, lng).validated()?);
    }

    let id = item.id.clone();
    store.insert(item)?;
    Status::success(&format!("Added {} ({})", title, short_id(&id)));
    Ok(())
}

/// Marks an item complete on an explicit date.
pub fn complete(state: &AppState, needle: &str, date: NaiveDate) -> Result<()> {
    let store = state.store()?;
    let mut item = resolve_item(store.as_ref(), needle)?;

    let when = Utc
        .from_utc_datetime(&date.and_hms_opt(12, 0, 0).expect("valid time"));
    item.complete_on(when);
    store.update(item.clone())?;

    Status::success(&format!("Completed {} on {}", item.title, date));
    Ok(())
}

/// Reopens a completed item, clearing its completion date.
pub fn reopen(state: &AppState, needle: &str) -> Result<()> {
    let store = state.store()?;
    let mut item = resolve_item(store.as_ref(), needle)?;
    item.reopen();
    store.update(item.clone())?;
    Status::success(&format!("Reopened {}", item.title));
    Ok(())
}

/// One-shot sweep: which unvisited items are within range of a position?
pub fn near(state: &AppState, lat: f64, lng: f64, range: Option<f64>) -> Result<()> {
    let store = state.store()?;
    let observer = Coordinate::new(lat, lng).validated()?;
    let range = range.unwrap_or(state.config.schema.radar.proximity_range_m);

    let items = store.all();
    let targets: Vec<Target> = items
        .iter()
        .filter(|i| i.is_radar_target())
        .map(|i| Target {
            id: i.id.clone(),
            position: i.coordinates.expect("radar target has coordinates"),
        })
        .collect();

    let hits = within_radius(&observer, &targets, range);
    if hits.is_empty() {
        Status::info(&format!("Nothing within {}", format_distance(range)));
        return Ok(());
    }

    Status::header(&format!("Within {}", format_distance(range)));
    for hit in hits {
        let item = items.iter().find(|i| i.id == hit.id).expect("hit id from items");
        println!(
            "{} {} {}",
            format_distance(hit.distance_m).bold(),
            item.title,
            short_id(&item.id).dimmed()
        );
    }
    Ok(())
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}
