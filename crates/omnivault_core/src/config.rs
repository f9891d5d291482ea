//! Runtime configuration for the vault core.
//!
//! Hosts build a [`CoreConfig`] either from defaults or from `OMNIVAULT_*`
//! environment variables, then hand it to logging and database bootstrap.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "OMNIVAULT_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "OMNIVAULT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "OMNIVAULT_LOG_DIR";
pub const ENV_INSIGHT_TIMEOUT_SECS: &str = "OMNIVAULT_INSIGHT_TIMEOUT_SECS";
pub const ENV_STORAGE_QUOTA_BYTES: &str = "OMNIVAULT_STORAGE_QUOTA_BYTES";

/// Insight responses older than this are dropped.
pub const DEFAULT_INSIGHT_TIMEOUT: Duration = Duration::from_secs(30);
/// Per-value write limit, sized like a browser local-storage origin quota.
pub const DEFAULT_STORAGE_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { variable: &'static str, message: String },
    Logging(LoggingError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { variable, message } => {
                write!(f, "invalid value for {variable}: {message}")
            }
            Self::Logging(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

/// Logging backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Top-level core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file path. `None` keeps the vault in memory.
    pub db_path: Option<PathBuf>,
    pub log: LogSettings,
    pub insight_timeout: Duration,
    /// Maximum serialized size of one stored value. `None` means unlimited.
    pub storage_quota_bytes: Option<usize>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log: LogSettings::default(),
            insight_timeout: DEFAULT_INSIGHT_TIMEOUT,
            storage_quota_bytes: Some(DEFAULT_STORAGE_QUOTA_BYTES),
        }
    }
}

impl CoreConfig {
    /// Builds a config from defaults overlaid with `OMNIVAULT_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = non_blank(lookup(ENV_DB_PATH)) {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(level) = non_blank(lookup(ENV_LOG_LEVEL)) {
            config.log.level = normalize_level(&level)?.to_string();
        }
        if let Some(dir) = non_blank(lookup(ENV_LOG_DIR)) {
            config.log.dir = Some(normalize_log_dir(&dir)?);
        }
        if let Some(raw) = non_blank(lookup(ENV_INSIGHT_TIMEOUT_SECS)) {
            let secs = parse_number::<u64>(ENV_INSIGHT_TIMEOUT_SECS, &raw)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    variable: ENV_INSIGHT_TIMEOUT_SECS,
                    message: "timeout must be positive".to_string(),
                });
            }
            config.insight_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = non_blank(lookup(ENV_STORAGE_QUOTA_BYTES)) {
            let bytes = parse_number::<usize>(ENV_STORAGE_QUOTA_BYTES, &raw)?;
            // 0 lifts the quota entirely.
            config.storage_quota_bytes = (bytes > 0).then_some(bytes);
        }

        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn parse_number<T: std::str::FromStr>(variable: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.parse::<T>().map_err(|err| ConfigError::InvalidValue {
        variable,
        message: format!("`{raw}`: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.db_path.is_none());
        assert_eq!(config.storage_quota_bytes, Some(DEFAULT_STORAGE_QUOTA_BYTES));
    }

    #[test]
    fn overrides_are_applied_and_normalized() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/tmp/vault.sqlite3"),
            (ENV_LOG_LEVEL, " WARNING "),
            (ENV_INSIGHT_TIMEOUT_SECS, "5"),
            (ENV_STORAGE_QUOTA_BYTES, "0"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/vault.sqlite3")));
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.insight_timeout, Duration::from_secs(5));
        assert_eq!(config.storage_quota_bytes, None);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_INSIGHT_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                variable: ENV_INSIGHT_TIMEOUT_SECS,
                ..
            }
        ));

        let err = CoreConfig::from_lookup(lookup_from(&[(ENV_LOG_DIR, "relative/logs")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Logging(_)));
    }
}
