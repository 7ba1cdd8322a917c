//! `CatalogStore` implementation over SQLite.
//!
//! Game rows live in `games`; category tags live in `game_categories`
//! with an explicit position so display order survives the round trip.
//! `save_all` replaces the whole catalog in one transaction, matching
//! the full-rewrite semantics of the JSON file backend.

use std::path::Path;

use chrono::NaiveDate;
use gamedex_catalog::store::{CatalogError, CatalogStore};
use gamedex_catalog::types::GameRecord;
use rusqlite::{Connection, params};

use crate::schema;

/// SQLite-backed catalog store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a catalog database at the given path.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let conn = schema::open_database(path).map_err(|e| CatalogError::storage(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open an in-memory catalog database. Useful for testing.
    pub fn open_memory() -> Result<Self, CatalogError> {
        let conn = schema::open_memory().map_err(|e| CatalogError::storage(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Fetch the category tags for one game, in display order.
    fn categories_for(&self, game_id: i64) -> Result<Vec<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT category FROM game_categories WHERE game_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![game_id], |row| row.get(0))?;
        rows.collect()
    }

    /// Run a game query and assemble full records with their categories.
    fn select_games(
        &self,
        sql: &str,
        args: &[&dyn rusqlite::types::ToSql],
    ) -> Result<Vec<GameRecord>, CatalogError> {
        let inner = || -> Result<Vec<GameRecord>, rusqlite::Error> {
            let mut stmt = self.conn.prepare(sql)?;
            let rows = stmt.query_map(args, |row| {
                let id: i64 = row.get(0)?;
                Ok((id, row_to_record(row)?))
            })?;

            let mut records = Vec::new();
            for row in rows {
                let (id, mut record) = row?;
                record.categories = self.categories_for(id)?;
                records.push(record);
            }
            Ok(records)
        };
        inner().map_err(db_err)
    }
}

const GAME_COLUMNS: &str = "id, name, link, description, downloads, last_downloaded";

impl CatalogStore for SqliteStore {
    fn load(&self) -> Result<Vec<GameRecord>, CatalogError> {
        self.select_games(
            &format!("SELECT {GAME_COLUMNS} FROM games ORDER BY id"),
            &[],
        )
    }

    fn save_all(&self, records: &[GameRecord]) -> Result<(), CatalogError> {
        let inner = || -> Result<(), rusqlite::Error> {
            let tx = self.conn.unchecked_transaction()?;
            tx.execute("DELETE FROM game_categories", [])?;
            tx.execute("DELETE FROM games", [])?;
            for record in records {
                insert_record(&tx, record)?;
            }
            tx.commit()
        };
        inner().map_err(db_err)
    }

    fn insert(&self, record: &GameRecord) -> Result<(), CatalogError> {
        let inner = || -> Result<(), rusqlite::Error> {
            let tx = self.conn.unchecked_transaction()?;
            insert_record(&tx, record)?;
            tx.commit()
        };
        inner().map_err(db_err)
    }

    fn find_by_name_contains(&self, needle: &str) -> Result<Vec<GameRecord>, CatalogError> {
        // Names are stored case-folded, so folding the needle here
        // covers the non-ASCII cases SQLite's LIKE leaves alone.
        let pattern = like_pattern(&needle.to_lowercase());
        self.select_games(
            &format!(
                "SELECT {GAME_COLUMNS} FROM games WHERE name LIKE ?1 ESCAPE '\\' ORDER BY id"
            ),
            &[&pattern],
        )
    }

    fn find_by_category(&self, tag: &str) -> Result<Vec<GameRecord>, CatalogError> {
        let folded = tag.to_lowercase();
        self.select_games(
            &format!(
                "SELECT {GAME_COLUMNS} FROM games
                 WHERE id IN (SELECT game_id FROM game_categories WHERE category = ?1)
                 ORDER BY id"
            ),
            &[&folded],
        )
    }
}

/// Wrap the needle in `%` wildcards, escaping LIKE metacharacters so
/// the needle itself always matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Insert one game row plus its category rows.
fn insert_record(conn: &Connection, record: &GameRecord) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO games (name, link, description, downloads, last_downloaded)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.name,
            record.link,
            record.description,
            record.downloads as i64,
            record
                .last_downloaded
                .map(|d| d.format("%Y-%m-%d").to_string()),
        ],
    )?;
    let game_id = conn.last_insert_rowid();

    for (position, category) in record.categories.iter().enumerate() {
        conn.execute(
            "INSERT INTO game_categories (game_id, position, category) VALUES (?1, ?2, ?3)",
            params![game_id, position as i64, category],
        )?;
    }
    Ok(())
}

/// Map a `games` row to a record with an empty category list.
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<GameRecord> {
    let downloads: i64 = row.get(4)?;
    let date_str: Option<String> = row.get(5)?;
    Ok(GameRecord {
        name: row.get(1)?,
        link: row.get(2)?,
        description: row.get(3)?,
        categories: Vec::new(),
        downloads: downloads.max(0) as u64,
        // Unparseable dates read back as never-downloaded.
        last_downloaded: date_str
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()),
    })
}

fn db_err(e: rusqlite::Error) -> CatalogError {
    CatalogError::storage(e.to_string())
}
