//! Parser for the admin submission grammar.
//!
//! Add/edit commands carry a multi-line body of prefixed fields:
//! ```text
//! Game Name:- Speed Racer
//! Download Here:- http://example.com/speed-racer
//! Short Intro:- A racing game
//! Category:- racing, action
//! ```
//!
//! Prefixes are case-insensitive and field order is not enforced. Any
//! line after `Short Intro:-` that matches no known prefix continues
//! the description.

use crate::types::GameDraft;

/// Usage text echoed back when a submission is missing required fields.
pub const SUBMISSION_FORMAT: &str = "Game Name:- <name>\n\
Download Here:- <link>\n\
Short Intro:- <description>\n\
Category:- <tag1>, <tag2>, ...";

/// Parse a submission body into a draft record.
///
/// Never fails: missing fields are simply left blank in the draft and
/// caught by service-level validation. Name and categories are
/// case-folded here; the description is flattened to a single line.
pub fn parse_submission(text: &str) -> GameDraft {
    let mut draft = GameDraft::default();
    let mut description_lines: Vec<String> = Vec::new();

    for line in text.lines() {
        if let Some(rest) = strip_prefix_ci(line, "game name:-") {
            draft.name = rest.trim().to_lowercase();
        } else if let Some(rest) = strip_prefix_ci(line, "download here:-") {
            draft.link = rest.trim().to_string();
        } else if let Some(rest) = strip_prefix_ci(line, "short intro:-") {
            // A repeated prefix restarts the description; continuation
            // only starts once the intro itself has text.
            description_lines.clear();
            let intro = rest.trim();
            if !intro.is_empty() {
                description_lines.push(intro.to_string());
            }
        } else if let Some(rest) = strip_prefix_ci(line, "category:-") {
            draft.categories = parse_categories(rest);
        } else if !description_lines.is_empty() {
            description_lines.push(line.trim().to_string());
        }
    }

    draft.description = description_lines.join(" ").trim().to_string();
    draft
}

/// Split a comma-separated tag list, case-folding and deduplicating
/// while preserving first-seen order.
fn parse_categories(raw: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for part in raw.split(',') {
        let tag = part.trim().to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Case-insensitive prefix match returning the remainder of the line.
fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let bytes = line.as_bytes();
    if bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    {
        // The matched bytes are ASCII, so the slice boundary is valid.
        Some(&line[prefix.len()..])
    } else {
        None
    }
}
