//! Reply text formatting.
//!
//! All user-visible text lives here so the router stays pure dispatch.
//! Names and tags are stored lowercase and title-cased for display.

use gamedex_catalog::GameRecord;

use crate::error::BotError;

/// Uppercase the first letter of each whitespace-separated word.
pub(crate) fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn category_list(record: &GameRecord) -> String {
    title_case(&record.categories.join(", "))
}

pub(crate) fn error(e: &BotError) -> String {
    format!("❌ {e}")
}

pub(crate) fn welcome() -> String {
    "👋 Welcome to GameDex!\n\n\
     🔍 Send me a game name or category (e.g. 'racing', 'action') and I'll \
     reply with details and a download link.\n\n\
     💬 Commands:\n\
     /games – list all available games\n\
     /download <name> – get the link and log a download\n\
     /top_games [days] – most downloaded games recently\n\
     /add_game – add a new game (admin only)\n\
     /edit_game – update a game (admin only)\n\
     /remove_game <name> – remove a game (admin only)\n\n\
     Let's find your next favorite game! 🎮"
        .to_string()
}

pub(crate) fn empty_catalog() -> String {
    "❌ No games added yet.".to_string()
}

pub(crate) fn game_list(records: &[GameRecord]) -> String {
    if records.is_empty() {
        return empty_catalog();
    }
    let mut out = String::from("📋 Available Games:\n");
    for record in records {
        out.push_str(&format!(
            "- {} ({})\n",
            title_case(&record.name),
            category_list(record),
        ));
    }
    out
}

pub(crate) fn category_results(tag: &str, records: &[GameRecord]) -> String {
    let mut out = format!("📂 Games in '{}' category:\n", title_case(tag));
    for record in records {
        out.push_str(&format!(
            "\n🎮 {}\n{}\n🔗 {}\n",
            title_case(&record.name),
            record.description,
            record.link,
        ));
    }
    out
}

pub(crate) fn name_results(records: &[GameRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "🎮 {}\n\n{}\n\n🔗 Download Link:\n{}\n\n",
            title_case(&record.name),
            record.description,
            record.link,
        ));
    }
    out
}

pub(crate) fn nothing_found() -> String {
    "❌ No game or category found. Try another name or category.".to_string()
}

pub(crate) fn added(record: &GameRecord) -> String {
    format!(
        "✅ Game '{}' added successfully under categories: {}!",
        title_case(&record.name),
        category_list(record),
    )
}

pub(crate) fn edited(record: &GameRecord) -> String {
    format!("✅ Game '{}' updated.", title_case(&record.name))
}

pub(crate) fn removed(name: &str, count: usize) -> String {
    if count == 0 {
        format!("No game named '{}' was in the catalog.", title_case(name))
    } else {
        format!("✅ Removed '{}'.", title_case(name))
    }
}

pub(crate) fn download(record: &GameRecord) -> String {
    format!(
        "🎮 {}\n🔗 Download Link:\n{}",
        title_case(&record.name),
        record.link,
    )
}

pub(crate) fn top_games(records: &[&GameRecord], days: i64) -> String {
    if records.is_empty() {
        return format!("❌ No downloads recorded in the last {days} days.");
    }
    let mut out = format!("🏆 Top games of the last {days} days:\n");
    for (i, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} – {} downloads\n",
            i + 1,
            title_case(&record.name),
            record.downloads,
        ));
    }
    out
}

pub(crate) fn report(entries: &[(String, u64)]) -> String {
    if entries.is_empty() {
        return empty_catalog();
    }
    let mut out = String::from("📊 Download report:\n");
    for (name, downloads) in entries {
        out.push_str(&format!("- {}: {downloads}\n", title_case(name)));
    }
    out
}

pub(crate) fn reset_done() -> String {
    "✅ Download counters reset.".to_string()
}
