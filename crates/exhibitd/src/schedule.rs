//! Lighting schedule for the building color skill.
//!
//! The schedule is a YAML list of `{date, lighting}` entries loaded once at
//! startup, e.g.
//!
//! ```yaml
//! - date: 2016-03-17
//!   lighting: green in honor of St. Patrick's Day
//! ```

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("failed to read schedule file: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid schedule file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Lookup of what the building is lit for on a given date.
pub trait LightingSchedule: Send + Sync + std::fmt::Debug {
    fn lighting_for(&self, date: NaiveDate) -> Option<String>;
}

#[derive(Debug, Deserialize)]
struct ScheduleEntry {
    date: NaiveDate,
    lighting: String,
}

/// Schedule backed by a YAML file.
#[derive(Debug, Clone, Default)]
pub struct ScheduleFile {
    entries: HashMap<NaiveDate, String>,
}

impl ScheduleFile {
    pub fn load(path: &Path) -> Result<Self, ScheduleError> {
        let content = std::fs::read_to_string(path)?;
        let schedule = Self::from_yaml(&content)?;
        debug!(path = %path.display(), entries = schedule.len(), "loaded lighting schedule");
        Ok(schedule)
    }

    /// Parse schedule entries. A later entry for the same date replaces an earlier one.
    pub fn from_yaml(content: &str) -> Result<Self, ScheduleError> {
        let entries: Vec<ScheduleEntry> = serde_yaml::from_str(content)?;
        Ok(Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.date, entry.lighting))
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LightingSchedule for ScheduleFile {
    fn lighting_for(&self, date: NaiveDate) -> Option<String> {
        self.entries.get(&date).cloned()
    }
}
