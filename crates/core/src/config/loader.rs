//! Configuration file loading

use super::schema::AppConfig;
use crate::error::{CoreError, Result};
use std::path::Path;

/// Configuration wrapper carrying the parsed schema and its origin.
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed configuration values
    pub schema: AppConfig,
    /// Path the configuration was loaded from, if any
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            AppConfig::default()
        };
        schema.validate()?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Defaults only, no file.
    #[must_use]
    pub fn default() -> Self {
        Self {
            schema: AppConfig::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [
        ".wanderlist.toml",
        "wanderlist.toml",
        ".config/wanderlist.toml",
    ];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CoreError::Config(format!("Failed to read config file {path}: {e}")))?;

    toml::from_str(&content)
        .map_err(|e| CoreError::Config(format!("Failed to parse config file {path}: {e}")))
}
