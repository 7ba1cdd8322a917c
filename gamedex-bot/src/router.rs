//! Command routing.
//!
//! The first whitespace-delimited token selects the handler; anything
//! that is not a recognized command is treated as a free-text search,
//! tried against categories first, then name substrings. This is also
//! the error boundary: every failure becomes a formatted reply and
//! nothing propagates to the poll loop.

use gamedex_catalog::{CatalogError, CatalogService, SUBMISSION_FORMAT, parse_submission};

use crate::error::BotError;
use crate::replies;

/// Default trailing window for /top_games, in days.
const DEFAULT_TOP_WINDOW_DAYS: i64 = 7;

/// One inbound text message, stripped to what routing needs.
pub(crate) struct Inbound<'a> {
    pub from_id: i64,
    pub text: &'a str,
}

pub(crate) struct Router {
    service: CatalogService,
    admin_id: i64,
}

impl Router {
    pub(crate) fn new(service: CatalogService, admin_id: i64) -> Self {
        Self { service, admin_id }
    }

    /// Handle one message and produce the reply text.
    pub(crate) fn handle(&mut self, msg: &Inbound<'_>) -> String {
        match self.dispatch(msg) {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("request from {} failed: {e}", msg.from_id);
                replies::error(&e)
            }
        }
    }

    fn dispatch(&mut self, msg: &Inbound<'_>) -> Result<String, BotError> {
        let text = msg.text.trim();
        let (keyword, rest) = split_command(text);

        match keyword {
            "/start" => Ok(replies::welcome()),
            "/games" => Ok(replies::game_list(self.service.list())),
            "/download" => self.download(rest),
            "/top_games" => self.top_games(rest),
            "/add_game" => {
                self.require_admin(msg.from_id)?;
                self.add_game(rest)
            }
            "/edit_game" => {
                self.require_admin(msg.from_id)?;
                self.edit_game(rest)
            }
            "/remove_game" => {
                self.require_admin(msg.from_id)?;
                self.remove_game(rest)
            }
            "/report" => {
                self.require_admin(msg.from_id)?;
                Ok(replies::report(&self.service.download_report()))
            }
            "/reset_downloads" => {
                self.require_admin(msg.from_id)?;
                self.service.reset_downloads()?;
                Ok(replies::reset_done())
            }
            _ => self.search(text),
        }
    }

    fn require_admin(&self, from_id: i64) -> Result<(), BotError> {
        if from_id == self.admin_id {
            Ok(())
        } else {
            Err(BotError::Unauthorized)
        }
    }

    fn add_game(&mut self, body: &str) -> Result<String, BotError> {
        let draft = parse_submission(body);
        let record = self.service.add(draft)?;
        Ok(replies::added(&record))
    }

    fn edit_game(&mut self, body: &str) -> Result<String, BotError> {
        let draft = parse_submission(body);
        if draft.name.is_empty() {
            return Err(CatalogError::validation(format!(
                "Missing 'Game Name:-' line. Please use:\n\n{SUBMISSION_FORMAT}"
            ))
            .into());
        }
        let name = draft.name.clone();
        let record = self.service.edit(&name, &draft)?;
        Ok(replies::edited(&record))
    }

    fn remove_game(&mut self, rest: &str) -> Result<String, BotError> {
        let name = rest.trim();
        if name.is_empty() {
            return Err(CatalogError::validation("Usage: /remove_game <name>").into());
        }
        let removed = self.service.remove(name)?;
        Ok(replies::removed(name, removed))
    }

    fn download(&mut self, rest: &str) -> Result<String, BotError> {
        let name = rest.trim();
        if name.is_empty() {
            return Err(CatalogError::validation("Usage: /download <name>").into());
        }
        let record = self.service.record_download(name)?;
        Ok(replies::download(&record))
    }

    fn top_games(&self, rest: &str) -> Result<String, BotError> {
        let days = match rest.trim() {
            "" => DEFAULT_TOP_WINDOW_DAYS,
            raw => raw.parse::<i64>().ok().filter(|d| *d > 0).ok_or_else(|| {
                CatalogError::validation("Usage: /top_games [days]")
            })?,
        };
        Ok(replies::top_games(&self.service.top_games(days), days))
    }

    /// Free-text fallback: category match, then name substring, then
    /// "nothing found".
    fn search(&self, text: &str) -> Result<String, BotError> {
        let query = text.to_lowercase();

        let by_category = self.service.search_by_category(&query)?;
        if !by_category.is_empty() {
            return Ok(replies::category_results(&query, &by_category));
        }

        let by_name = self.service.search_by_name(&query)?;
        if !by_name.is_empty() {
            return Ok(replies::name_results(&by_name));
        }

        Ok(replies::nothing_found())
    }
}

/// Split the leading command keyword from the remainder of the message.
fn split_command(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], &text[i..]),
        None => (text, ""),
    }
}
