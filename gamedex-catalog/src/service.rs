//! The catalog service: business rules over a storage backend.
//!
//! Owns the record list for the lifetime of the process (loaded once
//! when the service opens) and writes every mutation back through the
//! store before returning. Search queries are delegated to the store so
//! the database backend can answer them directly.

use chrono::{Duration, Local, NaiveDate};

use crate::store::{CatalogError, CatalogStore};
use crate::submission::SUBMISSION_FORMAT;
use crate::types::{DuplicatePolicy, GameDraft, GameRecord};

/// Maximum number of records returned by [`CatalogService::top_games`].
pub const TOP_GAMES_LIMIT: usize = 5;

pub struct CatalogService {
    store: Box<dyn CatalogStore>,
    records: Vec<GameRecord>,
    duplicate_policy: DuplicatePolicy,
}

impl CatalogService {
    /// Load the catalog from the given store.
    pub fn open(
        store: Box<dyn CatalogStore>,
        duplicate_policy: DuplicatePolicy,
    ) -> Result<Self, CatalogError> {
        let records = store.load()?;
        Ok(Self {
            store,
            records,
            duplicate_policy,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in storage order.
    pub fn list(&self) -> &[GameRecord] {
        &self.records
    }

    /// Validate a draft and append the new record.
    ///
    /// Requires a non-empty name, link, description, and at least one
    /// category. Name collisions are handled per the configured
    /// duplicate policy.
    pub fn add(&mut self, draft: GameDraft) -> Result<GameRecord, CatalogError> {
        let record = validate_draft(draft)?;

        let existing = self.position_of(&record.name);
        match (self.duplicate_policy, existing) {
            (DuplicatePolicy::Reject, Some(_)) => Err(CatalogError::Duplicate {
                name: record.name,
            }),
            (DuplicatePolicy::Overwrite, Some(i)) => {
                self.records[i] = record.clone();
                self.store.save_all(&self.records)?;
                log::info!("Replaced game '{}'", record.name);
                Ok(record)
            }
            _ => {
                self.store.insert(&record)?;
                self.records.push(record.clone());
                log::info!("Added game '{}'", record.name);
                Ok(record)
            }
        }
    }

    /// Update an existing record by exact case-folded name.
    ///
    /// Blank draft fields keep their prior values; the name itself is
    /// immutable once created.
    pub fn edit(&mut self, name: &str, draft: &GameDraft) -> Result<GameRecord, CatalogError> {
        let folded = name.to_lowercase();
        let i = self
            .position_of(&folded)
            .ok_or_else(|| CatalogError::NotFound {
                name: folded.clone(),
            })?;

        let record = &mut self.records[i];
        if !draft.link.is_empty() {
            record.link = draft.link.clone();
        }
        if !draft.description.is_empty() {
            record.description = draft.description.clone();
        }
        if !draft.categories.is_empty() {
            record.categories = draft.categories.clone();
        }

        let updated = record.clone();
        self.store.save_all(&self.records)?;
        log::info!("Edited game '{folded}'");
        Ok(updated)
    }

    /// Remove every record whose case-folded name matches.
    ///
    /// Returns the number of records removed; zero matches is a
    /// success, not an error.
    pub fn remove(&mut self, name: &str) -> Result<usize, CatalogError> {
        let folded = name.to_lowercase();
        let before = self.records.len();
        self.records.retain(|r| r.name != folded);
        let removed = before - self.records.len();
        if removed > 0 {
            self.store.save_all(&self.records)?;
            log::info!("Removed {removed} record(s) for '{folded}'");
        }
        Ok(removed)
    }

    /// Exact case-folded match against the category sets.
    pub fn search_by_category(&self, tag: &str) -> Result<Vec<GameRecord>, CatalogError> {
        self.store.find_by_category(tag)
    }

    /// Case-insensitive substring match against names.
    pub fn search_by_name(&self, needle: &str) -> Result<Vec<GameRecord>, CatalogError> {
        self.store.find_by_name_contains(needle)
    }

    /// Record one download for the named game, stamping today's date.
    pub fn record_download(&mut self, name: &str) -> Result<GameRecord, CatalogError> {
        self.record_download_on(name, Local::now().date_naive())
    }

    /// [`record_download`](Self::record_download) with an explicit date.
    pub fn record_download_on(
        &mut self,
        name: &str,
        date: NaiveDate,
    ) -> Result<GameRecord, CatalogError> {
        let folded = name.to_lowercase();
        let i = self
            .position_of(&folded)
            .ok_or_else(|| CatalogError::NotFound {
                name: folded.clone(),
            })?;

        let record = &mut self.records[i];
        record.downloads += 1;
        record.last_downloaded = Some(date);
        let updated = record.clone();
        self.store.save_all(&self.records)?;
        Ok(updated)
    }

    /// Zero every download counter and clear the download dates.
    /// Idempotent.
    pub fn reset_downloads(&mut self) -> Result<(), CatalogError> {
        for record in &mut self.records {
            record.downloads = 0;
            record.last_downloaded = None;
        }
        self.store.save_all(&self.records)?;
        log::info!("Download counters reset");
        Ok(())
    }

    /// Up to five most-downloaded games whose last download falls
    /// within the trailing window of `within_days` days.
    pub fn top_games(&self, within_days: i64) -> Vec<&GameRecord> {
        self.top_games_as_of(within_days, Local::now().date_naive())
    }

    /// [`top_games`](Self::top_games) with an explicit "today".
    pub fn top_games_as_of(&self, within_days: i64, today: NaiveDate) -> Vec<&GameRecord> {
        // A window too large to subtract covers the whole history.
        let cutoff = Duration::try_days(within_days)
            .and_then(|d| today.checked_sub_signed(d))
            .unwrap_or(NaiveDate::MIN);
        let mut recent: Vec<&GameRecord> = self
            .records
            .iter()
            .filter(|r| {
                r.last_downloaded
                    .is_some_and(|d| d >= cutoff && d <= today)
            })
            .collect();
        recent.sort_by(|a, b| b.downloads.cmp(&a.downloads));
        recent.truncate(TOP_GAMES_LIMIT);
        recent
    }

    /// Every record's name and download count, in storage order.
    pub fn download_report(&self) -> Vec<(String, u64)> {
        self.records
            .iter()
            .map(|r| (r.name.clone(), r.downloads))
            .collect()
    }

    /// Index of the first record with the given (already case-folded) name.
    fn position_of(&self, folded: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == folded)
    }
}

/// Check required fields and promote a draft to a fresh record.
fn validate_draft(draft: GameDraft) -> Result<GameRecord, CatalogError> {
    if draft.name.is_empty()
        || draft.link.is_empty()
        || draft.description.is_empty()
        || draft.categories.is_empty()
    {
        return Err(CatalogError::validation(format!(
            "Invalid format. Please use:\n\n{SUBMISSION_FORMAT}"
        )));
    }

    Ok(GameRecord {
        name: draft.name,
        link: draft.link,
        description: draft.description,
        categories: draft.categories,
        downloads: 0,
        last_downloaded: None,
    })
}
