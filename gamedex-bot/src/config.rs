//! Bot configuration: token, admin identity, storage backend.
//!
//! The token resolves from the `GAMEDEX_BOT_TOKEN` environment variable
//! first, then `bot_token` in the config file. Everything else lives in
//! the config file, `~/.config/gamedex/config.toml` by default:
//!
//! ```toml
//! admin_id = 5806222268
//! duplicate_policy = "reject"   # reject | overwrite | allow
//!
//! [storage]
//! backend = "json"              # json | sqlite
//! catalog_path = "/var/lib/gamedex/catalog.json"
//! ```

use std::path::{Path, PathBuf};

use gamedex_catalog::DuplicatePolicy;
use serde::Deserialize;

use crate::error::BotError;

/// Canonical config file path: `~/.config/gamedex/config.toml`.
pub(crate) fn config_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("gamedex").join("config.toml")
}

/// Default catalog location for the JSON backend when none is configured.
fn default_catalog_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("gamedex").join("catalog.json")
}

/// On-disk config file format.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    bot_token: Option<String>,
    admin_id: Option<i64>,
    duplicate_policy: Option<DuplicatePolicy>,
    storage: Option<StorageTable>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
enum StorageTable {
    Json { catalog_path: PathBuf },
    Sqlite { db_path: PathBuf },
}

/// Which backend holds the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StorageBackend {
    Json { catalog_path: PathBuf },
    Sqlite { db_path: PathBuf },
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json { catalog_path } => write!(f, "json ({})", catalog_path.display()),
            Self::Sqlite { db_path } => write!(f, "sqlite ({})", db_path.display()),
        }
    }
}

/// Resolved runtime configuration.
#[derive(Debug)]
pub(crate) struct BotConfig {
    pub token: String,
    pub admin_id: i64,
    pub duplicate_policy: DuplicatePolicy,
    pub storage: StorageBackend,
}

impl BotConfig {
    /// Load configuration, reading the config file if present.
    ///
    /// An explicitly passed path must exist; the default path is
    /// allowed to be absent (env var can carry the token, but
    /// `admin_id` has no default, so a bare environment never
    /// resolves fully).
    pub(crate) fn load(override_path: Option<&Path>) -> Result<Self, BotError> {
        let path = override_path.map(Path::to_path_buf).unwrap_or_else(config_path);

        let file = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                BotError::config(format!("failed to read {}: {e}", path.display()))
            })?;
            toml::from_str::<ConfigFile>(&contents).map_err(|e| {
                BotError::config(format!("failed to parse {}: {e}", path.display()))
            })?
        } else if override_path.is_some() {
            return Err(BotError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        } else {
            ConfigFile::default()
        };

        let token = std::env::var("GAMEDEX_BOT_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or(file.bot_token)
            .ok_or_else(|| {
                BotError::config(
                    "missing bot token. Set GAMEDEX_BOT_TOKEN or add bot_token to the config file",
                )
            })?;

        let admin_id = file.admin_id.ok_or_else(|| {
            BotError::config(format!("missing admin_id in {}", path.display()))
        })?;

        let storage = match file.storage {
            Some(StorageTable::Json { catalog_path }) => StorageBackend::Json { catalog_path },
            Some(StorageTable::Sqlite { db_path }) => StorageBackend::Sqlite { db_path },
            None => StorageBackend::Json {
                catalog_path: default_catalog_path(),
            },
        };

        Ok(Self {
            token,
            admin_id,
            duplicate_policy: file.duplicate_policy.unwrap_or_default(),
            storage,
        })
    }

    /// Token with all but the leading characters hidden, for display.
    pub(crate) fn masked_token(&self) -> String {
        if self.token.len() <= 4 {
            "****".to_string()
        } else {
            format!("{}****", &self.token[..4])
        }
    }
}
