use gamedex_catalog::CatalogError;
use thiserror::Error;

/// Errors that can occur while starting the bot or handling a request.
#[derive(Debug, Error)]
pub(crate) enum BotError {
    /// Startup configuration problem; fatal before polling begins.
    #[error("Config error: {0}")]
    Config(String),

    /// A non-admin sender invoked an admin command.
    #[error("You are not authorized to manage the catalog.")]
    Unauthorized,

    /// Catalog operation failed.
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    /// Telegram API call failed.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl BotError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}
