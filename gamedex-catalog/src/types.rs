//! Data model types for the game catalog.
//!
//! These types match the persisted catalog file format: a JSON array of
//! game objects with `name, link, description, category, downloads,
//! last_downloaded` keys.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single game entry in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Lowercased game name; the key used for edit/remove/lookup.
    pub name: String,
    /// Opaque download URL.
    pub link: String,
    /// Single-line description (newlines collapsed to spaces).
    pub description: String,
    /// Lowercased category tags, insertion order preserved for display.
    #[serde(rename = "category")]
    pub categories: Vec<String>,
    /// Number of recorded downloads.
    #[serde(default)]
    pub downloads: u64,
    /// Date of the most recent recorded download. Serialized as
    /// "YYYY-MM-DD", or the empty string for never-downloaded.
    #[serde(default, with = "date_string")]
    pub last_downloaded: Option<NaiveDate>,
}

impl GameRecord {
    /// Exact case-folded membership test against the category set.
    pub fn has_category(&self, tag: &str) -> bool {
        let folded = tag.to_lowercase();
        self.categories.iter().any(|c| *c == folded)
    }

    /// Case-insensitive substring test against the name.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.contains(&needle.to_lowercase())
    }
}

/// Fields parsed from an admin submission, prior to validation.
///
/// Blank fields mean "not provided": required on add, "keep the prior
/// value" on edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameDraft {
    pub name: String,
    pub link: String,
    pub description: String,
    pub categories: Vec<String>,
}

/// What to do when an added game's name collides with an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Refuse the add and report the collision.
    #[default]
    Reject,
    /// Replace the existing record in place.
    Overwrite,
    /// Insert a second record with the same name.
    Allow,
}

/// Serde adapter mapping `Option<NaiveDate>` to a "YYYY-MM-DD" string,
/// with the empty string standing in for `None`.
mod date_string {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
