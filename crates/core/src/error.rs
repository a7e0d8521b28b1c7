//! Error types for the core crate.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors from the core domain and its shared services.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An item id was not found in the store
    #[error("No item with id {0}")]
    ItemNotFound(String),

    /// An item with the same id already exists
    #[error("Item {0} already exists")]
    DuplicateItem(String),

    /// Domain validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store persistence failed
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store (de)serialization failed
    #[error("Store serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
