//! SQLite persistence layer for the game catalog.
//!
//! Implements the `CatalogStore` trait from `gamedex-catalog` on top of
//! SQLite (via rusqlite with the bundled feature), as the alternative
//! to the JSON file backend.

pub mod schema;
pub mod store;

pub use schema::{SchemaError, open_database, open_memory};
pub use store::SqliteStore;
