//! Exhibit records parsed from the museum listings feed.
//!
//! Each feed entry carries a display title and a `meta1` phrase such as
//! `"Through March 1, 2016"` or `"Through March 1"`. A record is only built when
//! that phrase parses; the title is sanitized lazily when speech is rendered.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `Through {Month} {day}[, {year}]`, with single spaces and a four-digit year.
static END_DATE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Through ([A-Za-z]+) (\d{1,2})(?:, (\d{4}))?$").expect("valid end date regex")
});

/// Wordy lead-in that reads badly when spoken.
const WORDY_PHRASE: &str = "selections from";

/// First `(` through the first `)` after it. Not nesting-aware.
static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid parenthetical regex"));

/// First `<` through the first `>` after it. Not nesting-aware.
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// One entry of the listings feed's `results` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListing {
    pub title: String,
    /// End-date phrase, e.g. `"Through March 1, 2016"`.
    pub meta1: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    #[error("invalid end date {phrase:?} for exhibit {title:?}: {reason}")]
    InvalidEndDate {
        title: String,
        phrase: String,
        reason: String,
    },
}

/// An exhibit with a resolved end date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhibitRecord {
    title: String,
    end_date: NaiveDate,
    end_date_text: String,
}

impl ExhibitRecord {
    /// Build a record from a feed entry.
    ///
    /// When the phrase has no year, `current_year` is assumed.
    pub fn from_raw(raw: &RawListing, current_year: i32) -> Result<Self, ListingError> {
        let invalid = |reason: String| ListingError::InvalidEndDate {
            title: raw.title.clone(),
            phrase: raw.meta1.clone(),
            reason,
        };

        let phrase = raw.meta1.trim();
        let captures = END_DATE_PHRASE
            .captures(phrase)
            .ok_or_else(|| invalid("expected \"Through Month D[, YYYY]\"".to_string()))?;
        let month = &captures[1];
        let day = &captures[2];
        let year = captures
            .get(3)
            .map_or_else(|| current_year.to_string(), |m| m.as_str().to_string());

        let end_date = NaiveDate::parse_from_str(&format!("{month} {day} {year}"), "%B %d %Y")
            .map_err(|e| invalid(e.to_string()))?;
        // %B also accepts abbreviations; the spoken text needs the full name.
        if end_date.format("%B").to_string() != month {
            return Err(invalid(format!("month {month:?} is not spelled out")));
        }

        Ok(Self {
            title: raw.title.clone(),
            end_date,
            end_date_text: format!("{month} {day}"),
        })
    }

    /// Raw title as it appeared in the feed.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// End-date phrase without the `Through ` prefix or year, e.g. `"March 1"`.
    pub fn end_date_text(&self) -> &str {
        &self.end_date_text
    }

    /// Speakable fragment: `"{title} ending on {month day}"`.
    pub fn speech_text(&self) -> String {
        format!(
            "{} ending on {}",
            sanitize_title(&self.title),
            self.end_date_text
        )
    }
}

/// Lowercase a title and strip the parts that do not read well aloud.
///
/// Parenthetical spans and tag-like spans are each replaced by a single space,
/// then "selections from" and periods are blanked out. Whitespace is not
/// collapsed.
pub fn sanitize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let without_parens = PARENTHETICAL.replace_all(&lowered, " ");
    let without_tags = TAG.replace_all(&without_parens, " ");
    without_tags.replace(WORDY_PHRASE, " ").replace('.', " ")
}
