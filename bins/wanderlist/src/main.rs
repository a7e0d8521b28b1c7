//! Wanderlist CLI
//!
//! Bucket list tracking from the terminal: items, the proximity radar,
//! itinerary planning and daily reminders.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod output;
mod sinks;
mod state;

use commands::notifications::NotificationsAction;
use commands::route::RouteAction;
use output::Status;
use state::AppState;
use wanderlist_telemetry::TelemetryConfig;

/// Bucket list tracking with a proximity radar and route planner
#[derive(Parser)]
#[command(name = "wanderlist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Data directory for items, feed and reminder markers
    #[arg(long, global = true, default_value = ".wanderlist")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List bucket list items
    List {
        /// Include completed items
        #[arg(short, long)]
        all: bool,
    },

    /// Add a new item
    Add {
        /// Item title
        title: String,

        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,

        /// Place name
        #[arg(short, long)]
        location: Option<String>,

        /// Latitude
        #[arg(long, requires = "lng")]
        lat: Option<f64>,

        /// Longitude
        #[arg(long, requires = "lat")]
        lng: Option<f64>,
    },

    /// Mark an item complete on a given date
    Complete {
        /// Item id (prefix accepted) or title
        id: String,

        /// Completion date (YYYY-MM-DD)
        #[arg(long)]
        date: chrono::NaiveDate,
    },

    /// Reopen a completed item
    Reopen {
        /// Item id (prefix accepted) or title
        id: String,
    },

    /// One-shot sweep: unvisited items within range of a position
    Near {
        /// Observer latitude
        #[arg(long)]
        lat: f64,

        /// Observer longitude
        #[arg(long)]
        lng: f64,

        /// Range override in meters
        #[arg(short, long)]
        range: Option<f64>,
    },

    /// Replay a location sample file through a radar session
    Radar {
        /// JSON sample file
        #[arg(short, long)]
        samples: PathBuf,

        /// Range override in meters
        #[arg(short, long)]
        range: Option<f64>,
    },

    /// Plan an itinerary or road trip for one item
    Route {
        /// Item id (prefix accepted) or title
        #[arg(short, long)]
        item: String,

        /// Plan a road trip instead of a destination itinerary
        #[arg(long)]
        road_trip: bool,

        #[command(subcommand)]
        action: RouteAction,
    },

    /// Run a reminder check against the wall clock
    Remind {
        /// Keep polling instead of checking once
        #[arg(long)]
        watch: bool,

        /// Poll interval in seconds when watching
        #[arg(long, default_value = "60")]
        interval_secs: u64,
    },

    /// Manage the notification feed
    Notifications {
        #[command(subcommand)]
        action: NotificationsAction,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = TelemetryConfig {
        log_level: if cli.verbose { "debug".into() } else { "warn".into() },
        ..TelemetryConfig::default()
    };
    if let Err(e) = wanderlist_telemetry::init_with_config(telemetry) {
        Status::error(&format!("Telemetry init failed: {e}"));
        return ExitCode::FAILURE;
    }

    let state = match AppState::open(cli.config.as_deref(), cli.data_dir) {
        Ok(state) => state,
        Err(e) => {
            Status::error(&format!("{e:#}"));
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::List { all } => commands::items::list(&state, all),
        Commands::Add {
            title,
            description,
            location,
            lat,
            lng,
        } => commands::items::add(&state, &title, description, location, lat, lng),
        Commands::Complete { id, date } => commands::items::complete(&state, &id, date),
        Commands::Reopen { id } => commands::items::reopen(&state, &id),
        Commands::Near { lat, lng, range } => commands::items::near(&state, lat, lng, range),
        Commands::Radar { samples, range } => commands::radar::replay(&state, &samples, range),
        Commands::Route {
            item,
            road_trip,
            action,
        } => commands::route::run(&state, &item, road_trip, action).await,
        Commands::Remind { watch, interval_secs } => {
            if watch {
                commands::remind::watch(&state, interval_secs)
            } else {
                commands::remind::tick(&state)
            }
        }
        Commands::Notifications { action } => commands::notifications::run(&state, action),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Status::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
