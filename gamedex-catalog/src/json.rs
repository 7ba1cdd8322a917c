//! JSON file storage for the game catalog.
//!
//! The whole catalog lives in one pretty-printed JSON array. The file
//! is read once when the store opens and fully rewritten on every
//! mutation; a temp-file-then-rename write keeps a crash from leaving
//! a half-written catalog behind.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::store::{CatalogError, CatalogStore};
use crate::types::GameRecord;

/// File-backed catalog store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    cache: RefCell<Vec<GameRecord>>,
}

impl JsonFileStore {
    /// Open a catalog file, reading its current contents.
    ///
    /// A missing file is an empty catalog, not an error; it will be
    /// created on the first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let records = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| CatalogError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
            serde_json::from_str(&contents).map_err(|e| CatalogError::Parse {
                path: path.display().to_string(),
                source: e,
            })?
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            cache: RefCell::new(records),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the full record list and atomically replace the file.
    fn write(&self, records: &[GameRecord]) -> Result<(), CatalogError> {
        let io_err = |e: std::io::Error| CatalogError::Io {
            path: self.path.display().to_string(),
            source: e,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let serialized =
            serde_json::to_string_pretty(records).map_err(|e| CatalogError::Parse {
                path: self.path.display().to_string(),
                source: e,
            })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &serialized).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl CatalogStore for JsonFileStore {
    fn load(&self) -> Result<Vec<GameRecord>, CatalogError> {
        Ok(self.cache.borrow().clone())
    }

    fn save_all(&self, records: &[GameRecord]) -> Result<(), CatalogError> {
        self.write(records)?;
        *self.cache.borrow_mut() = records.to_vec();
        Ok(())
    }

    fn insert(&self, record: &GameRecord) -> Result<(), CatalogError> {
        let mut records = self.cache.borrow().clone();
        records.push(record.clone());
        self.write(&records)?;
        *self.cache.borrow_mut() = records;
        Ok(())
    }

    fn find_by_name_contains(&self, needle: &str) -> Result<Vec<GameRecord>, CatalogError> {
        Ok(self
            .cache
            .borrow()
            .iter()
            .filter(|r| r.name_contains(needle))
            .cloned()
            .collect())
    }

    fn find_by_category(&self, tag: &str) -> Result<Vec<GameRecord>, CatalogError> {
        Ok(self
            .cache
            .borrow()
            .iter()
            .filter(|r| r.has_category(tag))
            .cloned()
            .collect())
    }
}
