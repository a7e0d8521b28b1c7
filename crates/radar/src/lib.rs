//! Proximity radar for Wanderlist.
//!
//! The radar is a two-state machine (off / on). While on, it holds a live
//! location subscription and, for every fix, measures all incomplete
//! geocoded bucket items against the proximity threshold. Each qualifying
//! item triggers a platform notification, a spoken alert, a feed entry and
//! a toast — at most once per on-session.
//!
//! The item list and the threshold are read at sample time from their
//! externally owned homes, so edits made while the radar runs take effect
//! on the next fix without restarting the session.

mod error;
mod provider;
mod radar;

pub use error::{RadarError, Result};
pub use provider::{
    LocationError, LocationObserver, LocationOptions, LocationProvider, Subscription,
};
pub use radar::{ProximityRadar, RadarDeps, SharedRange};
