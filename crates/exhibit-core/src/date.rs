//! Date slot resolution.
//!
//! Turns the loosely structured `Date` slot emitted by the voice platform into a
//! concrete calendar date. The platform sends ISO-like tokens at several
//! granularities (`2016`, `2016-03`, `2016-03-01`) plus a `PRESENT_REF`
//! sentinel for "now", and has a known defect where "this month" arrives as the
//! current month of *next* year.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Platform sentinel meaning "the present".
pub const PRESENT_REF: &str = "PRESENT_REF";

/// Separator between the year, month and day components of a slot token.
const DATE_SEPARATOR: char = '-';

/// Four-digit year, then one- or two-digit month and day. chrono alone would
/// also take short or signed years and leading whitespace.
static DAY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").expect("valid day token regex"));

/// Hour before which an early-morning request still belongs to the previous day.
pub const DEFAULT_EARLY_MORNING_CUTOFF_HOUR: u32 = 4;

/// How the "today" anchor is derived from the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodayPolicy {
    /// Always one day before now (exhibits skill).
    PreviousDay,
    /// One day before now only when the hour is before the cutoff (color skill).
    EarlyMorning,
    /// The current date, unadjusted.
    SameDay,
}

impl TodayPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreviousDay => "previous_day",
            Self::EarlyMorning => "early_morning",
            Self::SameDay => "same_day",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "previous_day" => Some(Self::PreviousDay),
            "early_morning" => Some(Self::EarlyMorning),
            "same_day" => Some(Self::SameDay),
            _ => None,
        }
    }
}

/// Which token shapes are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Only `YYYY-MM-DD`.
    Day,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    Any,
}

/// Resolution rules for one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverPolicy {
    pub today: TodayPolicy,
    pub early_morning_cutoff_hour: u32,
    /// Treat `{year + 1}-{month}` as "today" (platform "this month" defect).
    pub month_bug_workaround: bool,
    pub granularity: Granularity,
}

impl ResolverPolicy {
    /// Rules used by the exhibits skill.
    pub fn exhibits() -> Self {
        Self {
            today: TodayPolicy::PreviousDay,
            early_morning_cutoff_hour: DEFAULT_EARLY_MORNING_CUTOFF_HOUR,
            month_bug_workaround: true,
            granularity: Granularity::Any,
        }
    }

    /// Rules used by the building color skill.
    pub fn color_schedule() -> Self {
        Self {
            today: TodayPolicy::EarlyMorning,
            early_morning_cutoff_hour: DEFAULT_EARLY_MORNING_CUTOFF_HOUR,
            month_bug_workaround: false,
            granularity: Granularity::Day,
        }
    }
}

/// Outcome of resolving a date slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateResolution {
    Date(NaiveDate),
    /// The slot carried a value that could not be turned into a date.
    Unparseable { token: String, reason: String },
    /// No slot value was captured at all.
    NotSupplied,
}

impl DateResolution {
    fn unparseable(token: &str, reason: impl Into<String>) -> Self {
        Self::Unparseable {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

/// Resolves raw slot tokens against a [`ResolverPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct DateResolver {
    policy: ResolverPolicy,
}

impl DateResolver {
    pub fn new(policy: ResolverPolicy) -> Self {
        Self { policy }
    }

    /// Resolve an optional slot value. `None` means the slot was never filled.
    pub fn resolve_slot(&self, raw: Option<&str>, now: NaiveDateTime) -> DateResolution {
        match raw {
            Some(token) => self.resolve(token, now),
            None => DateResolution::NotSupplied,
        }
    }

    /// Resolve a slot value that was present (possibly empty).
    pub fn resolve(&self, raw: &str, now: NaiveDateTime) -> DateResolution {
        if raw.is_empty() {
            return DateResolution::unparseable(raw, "empty slot value");
        }

        if raw == PRESENT_REF {
            return DateResolution::Date(self.today(now));
        }

        if self.policy.month_bug_workaround && raw == this_month_bug_token(now) {
            return DateResolution::Date(self.today(now));
        }

        let separators = raw.matches(DATE_SEPARATOR).count();
        match (separators, self.policy.granularity) {
            (0, Granularity::Any) if is_bare_year(raw) => DateResolution::Date(self.today(now)),
            (0, _) => DateResolution::unparseable(raw, "no date separator"),
            (1, Granularity::Any) => parse_day(raw, &format!("{raw}-01")),
            (2, _) => parse_day(raw, raw),
            _ => DateResolution::unparseable(raw, "unsupported date granularity"),
        }
    }

    /// The "today" anchor for `now` under this policy.
    pub fn today(&self, now: NaiveDateTime) -> NaiveDate {
        let date = now.date();
        let roll_back = match self.policy.today {
            TodayPolicy::PreviousDay => true,
            TodayPolicy::EarlyMorning => now.hour() < self.policy.early_morning_cutoff_hour,
            TodayPolicy::SameDay => false,
        };
        if roll_back {
            date.checked_sub_days(Days::new(1)).unwrap_or(date)
        } else {
            date
        }
    }
}

/// The token the platform emits for "this month": next year, current month.
pub fn this_month_bug_token(now: NaiveDateTime) -> String {
    format!("{}{DATE_SEPARATOR}{:02}", now.year() + 1, now.month())
}

fn is_bare_year(token: &str) -> bool {
    token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit())
}

fn parse_day(token: &str, normalized: &str) -> DateResolution {
    if !DAY_TOKEN.is_match(normalized) {
        return DateResolution::unparseable(token, "expected YYYY-MM-DD");
    }
    match NaiveDate::parse_from_str(normalized, "%Y-%m-%d") {
        Ok(date) => DateResolution::Date(date),
        Err(e) => DateResolution::unparseable(token, e.to_string()),
    }
}
