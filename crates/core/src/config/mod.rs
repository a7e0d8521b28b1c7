//! Configuration loading and schema.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::{
    AppConfig, EnrichmentConfig, LocationConfig, RadarConfig, ReminderConfig, RouteConfig,
    WindowConfig,
};
