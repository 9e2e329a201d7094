//! Speakable text rendering.

use chrono::NaiveDate;

use crate::listing::ExhibitRecord;

/// Spoken when no exhibit ends on or after the requested date.
pub const NO_EXHIBITS: &str = "Sorry, there are no ongoing Met exhibits after that date.";

/// Lead-in for the listing sentence.
const LISTING_PREFIX: &str = "The next ending exhibits are";

/// Render the selected exhibits as one sentence.
///
/// Items are joined with `", "` and a standalone `"and"` element is inserted
/// before the last one, so two items read `"a, and, b"`.
pub fn format_listings(records: &[ExhibitRecord]) -> String {
    if records.is_empty() {
        return NO_EXHIBITS.to_string();
    }

    let mut parts: Vec<String> = records.iter().map(ExhibitRecord::speech_text).collect();
    if parts.len() > 1 {
        parts.insert(parts.len() - 1, "and".to_string());
    }

    format!("{LISTING_PREFIX} {}", parts.join(", "))
}

/// `"March 1"` style rendering of a date.
pub fn month_day(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}
