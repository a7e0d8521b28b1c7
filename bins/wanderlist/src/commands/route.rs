//! Route planner commands.

use crate::commands::resolve_item;
use crate::output::{format_count, Status};
use crate::state::AppState;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::sync::Arc;
use wanderlist_core::store::ItemStore;
use wanderlist_enrich::{ClientConfig, EnrichClient};
use wanderlist_geo::{format_distance, Coordinate};
use wanderlist_route::{AddedStop, PlannerSession, RouteMode};

/// What to do with the open planner.
#[derive(Debug, clap::Subcommand)]
pub enum RouteAction {
    /// Show stops and route statistics
    Show,
    /// Add a stop by name (enriched when the backend cooperates)
    AddStop {
        /// Stop name
        name: String,
    },
    /// Remove a stop by position (0-based)
    RemoveStop {
        /// Position to remove
        index: usize,
    },
    /// Move a stop to a new position
    Move {
        /// Current position
        from: usize,
        /// Target position
        to: usize,
    },
    /// Resolve and set the road-trip start location
    SetStart {
        /// Free-text location name
        query: String,
    },
    /// Replace the itinerary with a generated one (destination mode)
    Regenerate {
        /// Confirm discarding existing stops
        #[arg(long)]
        yes: bool,
    },
    /// Replace road-trip stops with suggestions along the route
    Suggest {
        /// Confirm discarding existing stops
        #[arg(long)]
        yes: bool,
    },
    /// Ask the optimizer for a better visiting order
    Optimize,
    /// Print the navigation deep link
    Url {
        /// Device latitude, if known
        #[arg(long)]
        lat: Option<f64>,
        /// Device longitude, if known
        #[arg(long)]
        lng: Option<f64>,
    },
}

/// Opens a planning session for the item and runs one action.
pub async fn run(
    state: &AppState,
    item_needle: &str,
    road_trip: bool,
    action: RouteAction,
) -> Result<()> {
    let store = state.store()?;
    let item = resolve_item(store.as_ref(), item_needle)?;
    let mode = if road_trip {
        RouteMode::RoadTrip
    } else {
        RouteMode::Destination
    };

    let client = EnrichClient::new(ClientConfig::from_app(&state.config.schema.enrichment))?;
    let session = PlannerSession::new(store as Arc<dyn ItemStore>, Arc::new(client));
    session.open(&item.id, mode, state.config.schema.route.clone())?;

    match action {
        RouteAction::Show => show(&session)?,
        RouteAction::AddStop { name } => match session.add_stop(&name).await? {
            AddedStop::Enriched => Status::success(&format!("Added {name} (enriched)")),
            AddedStop::Bare => Status::success(&format!("Added {name}")),
            AddedStop::IgnoredBlank => Status::warning("Blank stop name ignored"),
        },
        RouteAction::RemoveStop { index } => {
            let removed = session.remove_stop(index)?;
            Status::success(&format!("Removed {}", removed.name));
        }
        RouteAction::Move { from, to } => {
            session.move_stop(from, to)?;
            Status::success(&format!("Moved stop {from} to {to}"));
        }
        RouteAction::SetStart { query } => {
            let canonical = session.set_start_location(&query).await?;
            Status::success(&format!("Start set to {canonical}"));
        }
        RouteAction::Regenerate { yes } => {
            let count = session.regenerate_itinerary(yes).await?;
            Status::success(&format!(
                "Itinerary replaced with {}",
                format_count(count, "stop", "stops")
            ));
        }
        RouteAction::Suggest { yes } => {
            let count = session.suggest_road_trip_stops(yes).await?;
            Status::success(&format!(
                "Road trip replaced with {}",
                format_count(count, "stop", "stops")
            ));
        }
        RouteAction::Optimize => {
            session.optimize_order().await?;
            Status::success("Order optimized");
            show(&session)?;
        }
        RouteAction::Url { lat, lng } => {
            let device = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng).validated()?),
                _ => None,
            };
            println!("{}", session.navigation_url(device)?);
        }
    }

    // Edits propagate as they happen; this is the explicit durability point.
    session.save()?;
    Ok(())
}

fn show<E: wanderlist_core::traits::PlaceEnrichment>(session: &PlannerSession<E>) -> Result<()> {
    let stops = session.stops()?;
    if stops.is_empty() {
        Status::info("No stops yet");
        return Ok(());
    }

    Status::header(&format_count(stops.len(), "stop", "stops"));
    for (index, stop) in stops.iter().enumerate() {
        let flag = if stop.is_important.unwrap_or(false) { " ★" } else { "" };
        let mark = if stop.completed { "✓" } else { " " };
        println!("{index:>2}. [{mark}] {}{}", stop.name, flag.yellow());
    }

    match session.stats() {
        Ok(stats) => {
            println!();
            for leg in &stats.legs {
                println!(
                    "    {} {}",
                    format!("+{}", format_distance(leg.leg_m)).dimmed(),
                    leg.name
                );
            }
            Status::info(&format!(
                "Total {} — about {}",
                stats.formatted_distance(),
                stats.formatted_duration()
            ));
        }
        Err(e) => Status::warning(&format!("No stats: {e}")),
    }
    Ok(())
}
