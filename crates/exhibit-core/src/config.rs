//! Configuration parsing for the skill daemon.
//!
//! Plain `key=value` lines with `#` comments, same as the daemon's other
//! config files. Precedence: CLI flags > `--config` file > defaults.

use crate::date::{Granularity, ResolverPolicy, TodayPolicy, DEFAULT_EARLY_MORNING_CUTOFF_HOUR};
use crate::select::DEFAULT_LIMIT;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Current exhibitions listing across all three Met locations.
pub const DEFAULT_FEED_URL: &str = "http://www.metmuseum.org/api/Exhibitions/CurrentExhibitionsListing?location=main%7Cbreuer%7Ccloisters&null=&page=1";

pub const DEFAULT_EXHIBITS_APP_ID: &str = "amzn1.ask.skill.31de1985-df73-45f5-bb6a-22a5c62b2c43";
pub const DEFAULT_COLOR_APP_ID: &str = "amzn1.echo-sdk-ams.app.31643b52-4268-49fe-be40-89ecce49118d";

pub const DEFAULT_PORT: u16 = 7710;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid config line: {0}")]
    InvalidLine(String),
    #[error("invalid boolean value for {key}: {value}")]
    InvalidBool { key: String, value: String },
    #[error("invalid integer value for {key}: {value}")]
    InvalidInt { key: String, value: String },
}

/// Skill daemon configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    // Listings feed
    pub feed_url: String,
    pub listing_limit: usize,

    // Date resolution
    pub exhibits_today_policy: TodayPolicy,
    pub color_today_policy: TodayPolicy,
    /// Hour before which `early_morning` rolls "today" back a day (default: 4).
    pub early_morning_cutoff_hour: u32,
    /// Treat next year's current month as "today" in the exhibits skill (default: true).
    pub month_bug_workaround: bool,

    // Platform
    /// Expected application ID for the exhibits skill. Empty disables the check.
    pub exhibits_app_id: String,
    /// Expected application ID for the color skill. Empty disables the check.
    pub color_app_id: String,
    /// Keep the session open with a reprompt after an unparseable date (default: false).
    pub reprompt_on_bad_date: bool,

    // Lighting schedule
    pub schedule_path: Option<PathBuf>,

    // Server
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            listing_limit: DEFAULT_LIMIT,
            exhibits_today_policy: TodayPolicy::PreviousDay,
            color_today_policy: TodayPolicy::EarlyMorning,
            early_morning_cutoff_hour: DEFAULT_EARLY_MORNING_CUTOFF_HOUR,
            month_bug_workaround: true,
            exhibits_app_id: DEFAULT_EXHIBITS_APP_ID.to_string(),
            color_app_id: DEFAULT_COLOR_APP_ID.to_string(),
            reprompt_on_bad_date: false,
            schedule_path: None,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Load config from a file, merging with defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.load_file(path)?;
        Ok(config)
    }

    /// Load and merge values from a config file.
    pub fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_content(&content)
    }

    /// Parse config content (key=value format).
    fn parse_content(&mut self, content: &str) -> Result<(), ConfigError> {
        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine(line.to_string()));
            };

            let key = key.trim();
            let value = Self::unquote(value.trim());

            self.apply_value(key, &value)?;
        }
        Ok(())
    }

    /// Remove surrounding quotes from a value.
    fn unquote(value: &str) -> String {
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            return value[1..value.len() - 1].to_string();
        }
        value.to_string()
    }

    /// Apply a single config value.
    fn apply_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "feed_url" => self.feed_url = value.to_string(),
            "listing_limit" => self.listing_limit = Self::parse_int(key, value)?,
            "exhibits_today_policy" => {
                self.exhibits_today_policy = Self::parse_today_policy(key, value)?;
            }
            "color_today_policy" => {
                self.color_today_policy = Self::parse_today_policy(key, value)?;
            }
            "early_morning_cutoff_hour" => {
                let hour: u32 = Self::parse_int(key, value)?;
                if hour > 23 {
                    return Err(ConfigError::InvalidInt {
                        key: key.to_string(),
                        value: value.to_string(),
                    });
                }
                self.early_morning_cutoff_hour = hour;
            }
            "month_bug_workaround" => self.month_bug_workaround = Self::parse_bool(key, value)?,
            "exhibits_app_id" => self.exhibits_app_id = value.to_string(),
            "color_app_id" => self.color_app_id = value.to_string(),
            "reprompt_on_bad_date" => self.reprompt_on_bad_date = Self::parse_bool(key, value)?,
            "schedule_path" => {
                self.schedule_path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            "port" => self.port = Self::parse_int(key, value)?,
            _ => {
                // Warn but don't fail for unknown keys.
                warn!(key = %key, "unknown config key");
            }
        }
        Ok(())
    }

    fn parse_int<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
        value.parse().map_err(|_| ConfigError::InvalidInt {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Parse a boolean value.
    fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "on" => Ok(true),
            "false" | "0" | "no" | "n" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidBool {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    fn parse_today_policy(key: &str, value: &str) -> Result<TodayPolicy, ConfigError> {
        TodayPolicy::parse(value).ok_or_else(|| {
            ConfigError::InvalidLine(format!(
                "{key} must be 'previous_day', 'early_morning', or 'same_day', got '{value}'"
            ))
        })
    }

    /// Date resolution rules for the exhibits skill.
    pub fn exhibits_policy(&self) -> ResolverPolicy {
        ResolverPolicy {
            today: self.exhibits_today_policy,
            early_morning_cutoff_hour: self.early_morning_cutoff_hour,
            month_bug_workaround: self.month_bug_workaround,
            granularity: Granularity::Any,
        }
    }

    /// Date resolution rules for the color skill.
    pub fn color_policy(&self) -> ResolverPolicy {
        ResolverPolicy {
            today: self.color_today_policy,
            early_morning_cutoff_hour: self.early_morning_cutoff_hour,
            ..ResolverPolicy::color_schedule()
        }
    }

    /// Resolve a relative schedule path against a base directory.
    pub fn resolve_paths(&mut self, base: &Path) {
        if let Some(ref schedule_path) = self.schedule_path {
            if schedule_path.is_relative() {
                self.schedule_path = Some(base.join(schedule_path));
            }
        }
    }
}
