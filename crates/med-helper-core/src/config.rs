//! Process configuration, resolved once at startup.

use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;

use crate::scheduler::ReminderPolicy;

pub const APP_NAME: &str = "Med Helper";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_DATABASE_PATH: &str = "medications.db";
pub const DEFAULT_POLL_SECS: u64 = 60;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Configuration errors.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("No SECRET_KEY set in environment")]
    MissingSecretKey,

    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabase(String),

    #[error("Invalid UTC offset {0:?}, expected +HH:MM or -HH:MM")]
    InvalidOffset(String),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

/// Everything the process needs to know about its surroundings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Opaque secret for the presentation layer's session signing
    pub secret_key: String,
    pub environment: Environment,
    /// SQLite database file
    pub database_path: PathBuf,
    /// The single local time zone all reminders are evaluated in
    pub utc_offset: FixedOffset,
    /// How often the reminder service checks for due medications
    pub poll_interval: StdDuration,
    /// SQLite busy timeout
    pub busy_timeout: StdDuration,
    pub reminder_policy: ReminderPolicy,
}

impl AppConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("SECRET_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingSecretKey)?;

        let environment = match lookup("MED_HELPER_ENV").as_deref() {
            Some("development") => Environment::Development,
            _ => Environment::Production,
        };

        let database_path = match lookup("DATABASE_URL") {
            Some(url) => parse_database_url(&url)?,
            None => PathBuf::from(DEFAULT_DATABASE_PATH),
        };

        let utc_offset = match lookup("MED_HELPER_UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw)?,
            None => FixedOffset::east_opt(0).ok_or(ConfigError::InvalidOffset("+00:00".into()))?,
        };

        let poll_secs = parse_number(&lookup, "MED_HELPER_POLL_SECS", DEFAULT_POLL_SECS)?;
        if poll_secs == 0 {
            return Err(ConfigError::InvalidNumber {
                name: "MED_HELPER_POLL_SECS",
                value: "0".into(),
            });
        }
        let busy_ms = parse_number(&lookup, "MED_HELPER_BUSY_TIMEOUT_MS", DEFAULT_BUSY_TIMEOUT_MS)?;

        Ok(Self {
            secret_key,
            environment,
            database_path,
            utc_offset,
            poll_interval: StdDuration::from_secs(poll_secs),
            busy_timeout: StdDuration::from_millis(busy_ms),
            reminder_policy: ReminderPolicy::default(),
        })
    }

    /// Current time in the configured zone.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.utc_offset)
    }

    /// Default `tracing` filter for this environment.
    pub fn default_log_filter(&self) -> &'static str {
        match self.environment {
            Environment::Development => "debug",
            Environment::Production => "info",
        }
    }
}

/// Accept `sqlite://path`, `sqlite:path`, or a bare file path.
fn parse_database_url(url: &str) -> Result<PathBuf, ConfigError> {
    let url = url.trim();
    if let Some(path) = url.strip_prefix("sqlite://") {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = url.strip_prefix("sqlite:") {
        return Ok(PathBuf::from(path));
    }
    if url.contains("://") || url.is_empty() {
        return Err(ConfigError::UnsupportedDatabase(url.to_string()));
    }
    Ok(PathBuf::from(url))
}

/// Parse `+HH:MM` / `-HH:MM` (also `Z`).
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidOffset(raw.to_string());
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(invalid());
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..=14).contains(&hours) || !(0..=59).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn parse_number<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
