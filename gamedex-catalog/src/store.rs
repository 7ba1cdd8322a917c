//! Storage contract shared by the catalog backends.

use crate::types::GameRecord;
use thiserror::Error;

/// Errors surfaced by the catalog store and service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed or incomplete admin input. The message carries the
    /// expected submission format.
    #[error("{0}")]
    Validation(String),

    /// The named game does not exist in the catalog.
    #[error("no game named '{name}' in the catalog")]
    NotFound { name: String },

    /// An add collided with an existing record under the reject policy.
    #[error("a game named '{name}' already exists")]
    Duplicate { name: String },

    /// Backend-specific storage failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error touching the catalog file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Catalog file did not parse as the expected JSON format.
    #[error("JSON error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

impl CatalogError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Durable storage for game records.
///
/// Two implementations exist: the JSON file store in this crate and the
/// SQLite store in `gamedex-db`. Which one backs the service is a
/// configuration choice; the service behaves identically over both.
pub trait CatalogStore {
    /// Read the full catalog in storage order.
    fn load(&self) -> Result<Vec<GameRecord>, CatalogError>;

    /// Replace the stored catalog with the given records.
    fn save_all(&self, records: &[GameRecord]) -> Result<(), CatalogError>;

    /// Append a single record.
    fn insert(&self, record: &GameRecord) -> Result<(), CatalogError>;

    /// Case-insensitive substring search on name.
    fn find_by_name_contains(&self, needle: &str) -> Result<Vec<GameRecord>, CatalogError>;

    /// Exact case-folded match against the category set.
    fn find_by_category(&self, tag: &str) -> Result<Vec<GameRecord>, CatalogError>;
}
