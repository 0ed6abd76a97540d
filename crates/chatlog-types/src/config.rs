//! Service configuration types for Chatlog.
//!
//! `ServiceConfig` represents the `config.toml` that controls the listen
//! address, database location, pagination limits, and the civil timezone used
//! for default timestamps.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest accepted civil UTC offset, in minutes (UTC-18:00 .. UTC+18:00).
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Top-level configuration for the Chatlog service.
///
/// Loaded from `~/.chatlog/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// sqlx connection URL. `None` means `{data_dir}/chatlog.db`.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Page size used when a request omits `limit` or sends an unusable one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound for `limit`; larger values are clamped.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Offset of the civil timezone from UTC, in minutes (UTC-4 is `-240`).
    #[serde(default = "default_civil_offset")]
    pub civil_utc_offset_minutes: i32,

    /// Expose underlying error detail in 500 responses.
    #[serde(default)]
    pub debug_errors: bool,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_page_size() -> u32 {
    100
}

fn default_max_page_size() -> u32 {
    1000
}

fn default_civil_offset() -> i32 {
    -240
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            civil_utc_offset_minutes: default_civil_offset(),
            debug_errors: false,
            log_format: LogFormat::default(),
        }
    }
}

impl ServiceConfig {
    /// Check cross-field rules that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(ConfigError::Invalid(
                "page sizes must be at least 1".to_string(),
            ));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "default_page_size ({}) exceeds max_page_size ({})",
                self.default_page_size, self.max_page_size
            )));
        }
        if self.civil_utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "civil_utc_offset_minutes ({}) is outside +/-{MAX_OFFSET_MINUTES}",
                self.civil_utc_offset_minutes
            )));
        }
        Ok(())
    }

    /// The civil timezone as a chrono offset. Falls back to UTC for an
    /// out-of-range value (rejected earlier by `validate`).
    pub fn civil_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.civil_utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("invalid log format: '{other}'")),
        }
    }
}
