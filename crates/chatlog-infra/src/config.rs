//! Service configuration loader for Chatlog.
//!
//! Reads `config.toml` from the data directory (`~/.chatlog/` in production)
//! or from an explicit path and deserializes it into [`ServiceConfig`]. Falls
//! back to defaults when the file is missing or malformed, then applies
//! environment overrides.

use std::path::{Path, PathBuf};

use chatlog_types::config::ServiceConfig;

use crate::sqlite::pool::default_database_url;

/// Resolve the data directory.
///
/// Uses `CHATLOG_DATA_DIR` if set, otherwise `~/.chatlog`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATLOG_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatlog");
    }

    // Last resort: current directory
    PathBuf::from(".chatlog")
}

/// Something noteworthy that happened while loading configuration.
///
/// Loading runs before the tracing subscriber exists, so these are returned
/// to the caller and logged with [`ConfigDiagnostic::emit`] once it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigDiagnostic {
    /// `{data_dir}/config.toml` does not exist.
    DefaultFileMissing(PathBuf),
    /// A file named with `--config` does not exist.
    ExplicitFileMissing(PathBuf),
    Unreadable { path: PathBuf, error: String },
    Malformed { path: PathBuf, error: String },
    /// An environment override could not be parsed and was ignored.
    InvalidEnv { key: String, value: String },
}

impl ConfigDiagnostic {
    /// Log at debug for a missing default file, warn for everything else.
    pub fn emit(&self) {
        match self {
            ConfigDiagnostic::DefaultFileMissing(path) => {
                tracing::debug!("No config.toml found at {}, using defaults", path.display());
            }
            ConfigDiagnostic::ExplicitFileMissing(path) => {
                tracing::warn!("Config file {} not found, using defaults", path.display());
            }
            ConfigDiagnostic::Unreadable { path, error } => {
                tracing::warn!("Failed to read {}: {error}, using defaults", path.display());
            }
            ConfigDiagnostic::Malformed { path, error } => {
                tracing::warn!("Failed to parse {}: {error}, using defaults", path.display());
            }
            ConfigDiagnostic::InvalidEnv { key, value } => {
                tracing::warn!(%key, %value, "ignoring unparseable environment override");
            }
        }
    }
}

/// Load configuration from `explicit` or `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ServiceConfig::default()`].
/// - If the file exists but fails to parse, returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
///
/// The fallback cases push a diagnostic. Environment overrides are not
/// applied here; see [`apply_env_overrides`].
pub async fn load_service_config(
    explicit: Option<&Path>,
    data_dir: &Path,
    diagnostics: &mut Vec<ConfigDiagnostic>,
) -> ServiceConfig {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => data_dir.join("config.toml"),
    };

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            diagnostics.push(if explicit.is_some() {
                ConfigDiagnostic::ExplicitFileMissing(config_path)
            } else {
                ConfigDiagnostic::DefaultFileMissing(config_path)
            });
            return ServiceConfig::default();
        }
        Err(err) => {
            diagnostics.push(ConfigDiagnostic::Unreadable {
                path: config_path,
                error: err.to_string(),
            });
            return ServiceConfig::default();
        }
    };

    match toml::from_str::<ServiceConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            diagnostics.push(ConfigDiagnostic::Malformed {
                path: config_path,
                error: err.to_string(),
            });
            ServiceConfig::default()
        }
    }
}

/// Apply `CHATLOG_*` (and `PORT`) overrides using `lookup` to read variables.
///
/// Unparseable values are ignored and reported in `diagnostics`.
pub fn apply_env_overrides(
    config: &mut ServiceConfig,
    lookup: impl Fn(&str) -> Option<String>,
    diagnostics: &mut Vec<ConfigDiagnostic>,
) {
    if let Some(host) = lookup("CHATLOG_HOST").filter(|h| !h.trim().is_empty()) {
        config.host = host.trim().to_string();
    }
    if let Some(url) = lookup("CHATLOG_DATABASE_URL").filter(|u| !u.trim().is_empty()) {
        config.database_url = Some(url.trim().to_string());
    }
    override_parsed(&lookup, "PORT", &mut config.port, diagnostics);
    override_parsed(
        &lookup,
        "CHATLOG_UTC_OFFSET_MINUTES",
        &mut config.civil_utc_offset_minutes,
        diagnostics,
    );
    override_parsed(&lookup, "CHATLOG_DEBUG_ERRORS", &mut config.debug_errors, diagnostics);
    override_parsed(&lookup, "CHATLOG_LOG_FORMAT", &mut config.log_format, diagnostics);
}

fn override_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
    diagnostics: &mut Vec<ConfigDiagnostic>,
) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *target = value,
        Err(_) => diagnostics.push(ConfigDiagnostic::InvalidEnv {
            key: key.to_string(),
            value: raw,
        }),
    }
}

/// The configured database URL, or `{data_dir}/chatlog.db`.
pub fn resolve_database_url(config: &ServiceConfig, data_dir: &Path) -> String {
    config
        .database_url
        .clone()
        .unwrap_or_else(|| default_database_url(data_dir))
}
