//! Core catalog types and logic for the GameDex bot.
//!
//! Provides the game record data model, the admin-submission parser,
//! the storage trait with its JSON file implementation, and the
//! catalog service that enforces the business rules.

pub mod json;
pub mod service;
pub mod store;
pub mod submission;
pub mod types;

pub use json::JsonFileStore;
pub use service::CatalogService;
pub use store::{CatalogError, CatalogStore};
pub use submission::{SUBMISSION_FORMAT, parse_submission};
pub use types::{DuplicatePolicy, GameDraft, GameRecord};
