//! GameDex bot
//!
//! Telegram bot serving a game catalog: users search by name or
//! category, the admin maintains the entries. Single-threaded long
//! polling; each update is fully handled before the next is taken.

mod config;
mod error;
mod replies;
mod router;
mod telegram;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gamedex_catalog::{CatalogService, CatalogStore, JsonFileStore};
use gamedex_db::SqliteStore;

use crate::config::{BotConfig, StorageBackend};
use crate::error::BotError;
use crate::router::{Inbound, Router};
use crate::telegram::{ChatTransport, TelegramClient, Update};

/// Pause before re-polling after a transport failure.
const POLL_RETRY_PAUSE: std::time::Duration = std::time::Duration::from_secs(3);

#[derive(Parser)]
#[command(name = "gamedex")]
#[command(about = "Telegram bot for a searchable game catalog", long_about = None)]
struct Cli {
    /// Path to the config file (defaults to ~/.config/gamedex/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot and poll for updates
    Run,

    /// Validate the configuration and show the resolved values
    CheckConfig,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), BotError> {
    let config = BotConfig::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Run => run_bot(&config),
        Commands::CheckConfig => {
            run_check_config(&config);
            Ok(())
        }
    }
}

/// Open the configured storage backend and load the catalog.
fn open_service(config: &BotConfig) -> Result<CatalogService, BotError> {
    let store: Box<dyn CatalogStore> = match &config.storage {
        StorageBackend::Json { catalog_path } => Box::new(JsonFileStore::open(catalog_path)?),
        StorageBackend::Sqlite { db_path } => Box::new(SqliteStore::open(db_path)?),
    };
    CatalogService::open(store, config.duplicate_policy).map_err(Into::into)
}

fn run_check_config(config: &BotConfig) {
    log::info!("bot_token: {}", config.masked_token());
    log::info!("admin_id: {}", config.admin_id);
    log::info!("duplicate_policy: {:?}", config.duplicate_policy);
    log::info!("storage: {}", config.storage);

    match open_service(config) {
        Ok(service) => log::info!("catalog opens: {} game(s)", service.len()),
        Err(e) => log::warn!("catalog does not open: {e}"),
    }
}

fn run_bot(config: &BotConfig) -> Result<(), BotError> {
    // Startup failures here are fatal; nothing is served until both
    // the storage backend and the token check out.
    let service = open_service(config)?;
    log::info!("Catalog loaded: {} game(s)", service.len());

    let client = TelegramClient::new(&config.token)?;
    let username = client.get_me()?;
    log::info!("Connected as @{username}");

    let mut router = Router::new(service, config.admin_id);
    poll_loop(&client, &mut router)
}

/// Long-poll forever, handling one update at a time.
fn poll_loop(client: &TelegramClient, router: &mut Router) -> Result<(), BotError> {
    let mut offset = 0i64;
    loop {
        let updates = match client.get_updates(offset) {
            Ok(updates) => updates,
            Err(e) => {
                log::warn!("poll failed: {e}");
                std::thread::sleep(POLL_RETRY_PAUSE);
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            handle_update(client, router, update);
        }
    }
}

/// Route one update and send the reply back over the transport.
///
/// Updates without a text message are skipped; a failed send is
/// logged and the loop carries on.
fn handle_update(transport: &dyn ChatTransport, router: &mut Router, update: Update) {
    let Some(message) = update.message else {
        return;
    };
    let Some(text) = message.text.as_deref() else {
        return;
    };
    // A message with no sender can never be the admin.
    let from_id = message.from.as_ref().map_or(0, |u| u.id);

    let reply = router.handle(&Inbound { from_id, text });
    if let Err(e) = transport.send_reply(message.chat.id, Some(message.message_id), &reply) {
        log::warn!("failed to send reply to chat {}: {e}", message.chat.id);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use gamedex_catalog::{CatalogService, DuplicatePolicy, JsonFileStore};

    use super::*;
    use crate::telegram::{Chat, Message, User};

    /// Records every reply instead of talking to the Bot API.
    #[derive(Default)]
    struct RecordingTransport {
        sent: RefCell<Vec<(i64, Option<i64>, String)>>,
        fail: bool,
    }

    impl ChatTransport for RecordingTransport {
        fn send_reply(
            &self,
            chat_id: i64,
            reply_to: Option<i64>,
            text: &str,
        ) -> Result<(), BotError> {
            self.sent
                .borrow_mut()
                .push((chat_id, reply_to, text.to_string()));
            if self.fail {
                return Err(BotError::transport("wire down"));
            }
            Ok(())
        }
    }

    fn test_router(dir: &tempfile::TempDir, admin_id: i64) -> Router {
        let store = JsonFileStore::open(dir.path().join("catalog.json")).unwrap();
        let service = CatalogService::open(Box::new(store), DuplicatePolicy::Reject).unwrap();
        Router::new(service, admin_id)
    }

    fn text_update(update_id: i64, from: Option<i64>, text: &str) -> Update {
        Update {
            update_id,
            message: Some(Message {
                message_id: update_id * 10,
                from: from.map(|id| User { id }),
                chat: Chat { id: 99 },
                text: Some(text.to_string()),
            }),
        }
    }

    #[test]
    fn text_message_gets_a_reply_in_its_chat() {
        let dir = tempfile::tempdir().unwrap();
        let mut router = test_router(&dir, 42);
        let transport = RecordingTransport::default();

        handle_update(&transport, &mut router, text_update(1, Some(7), "/start"));

        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        let (chat_id, reply_to, text) = &sent[0];
        assert_eq!(*chat_id, 99);
        assert_eq!(*reply_to, Some(10));
        assert!(text.contains("/games"));
    }

    #[test]
    fn updates_without_text_send_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut router = test_router(&dir, 42);
        let transport = RecordingTransport::default();

        handle_update(
            &transport,
            &mut router,
            Update {
                update_id: 1,
                message: None,
            },
        );
        let mut sticker = text_update(2, Some(7), "");
        sticker.message.as_mut().unwrap().text = None;
        handle_update(&transport, &mut router, sticker);

        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn senderless_message_is_not_the_admin() {
        let dir = tempfile::tempdir().unwrap();
        let mut router = test_router(&dir, 42);
        let transport = RecordingTransport::default();

        handle_update(&transport, &mut router, text_update(1, None, "/report"));

        let sent = transport.sent.borrow();
        assert!(sent[0].2.contains("not authorized"));
    }

    #[test]
    fn failed_send_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let mut router = test_router(&dir, 42);
        let transport = RecordingTransport {
            fail: true,
            ..RecordingTransport::default()
        };

        handle_update(&transport, &mut router, text_update(1, Some(7), "/start"));
        handle_update(&transport, &mut router, text_update(2, Some(7), "/games"));

        assert_eq!(transport.sent.borrow().len(), 2);
    }
}
