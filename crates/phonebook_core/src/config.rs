//! Runtime configuration for the phonebook.
//!
//! # Responsibility
//! - Hold the store path and logging settings resolved by the binary.
//! - Normalize and validate settings before anything touches the disk.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Store file used when no path is configured.
pub const DEFAULT_STORE_FILE: &str = "phonebook.json";
const DEFAULT_LOG_DIR_NAME: &str = "phonebook-logs";

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedLogLevel(String),
    RelativeLogDir(PathBuf),
    EmptyStorePath,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLogLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(path) => write!(
                f,
                "log directory must be an absolute path, got `{}`",
                path.display()
            ),
            Self::EmptyStorePath => write!(f, "store path cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved phonebook settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonebookConfig {
    /// JSON file holding the directory.
    pub store_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl Default for PhonebookConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            log_level: default_log_level().to_string(),
            log_dir: default_log_dir(),
        }
    }
}

impl PhonebookConfig {
    /// Normalizes the log level in place and checks path invariants.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyStorePath);
        }
        if !self.log_dir.is_absolute() {
            return Err(ConfigError::RelativeLogDir(self.log_dir.clone()));
        }
        self.log_level = normalize_level(&self.log_level)?.to_string();
        Ok(())
    }
}

/// Returns the default log level for current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Default log directory under the system temp dir.
pub fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME)
}

/// Maps user-supplied level text to a canonical `log` level name.
pub fn normalize_level(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(ConfigError::UnsupportedLogLevel(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_level, ConfigError, PhonebookConfig};
    use std::path::PathBuf;

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level(" warning ").unwrap(), "warn");
        assert!(matches!(
            normalize_level("loud"),
            Err(ConfigError::UnsupportedLogLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn validate_normalizes_level() {
        let mut config = PhonebookConfig {
            log_level: "WARNING".to_string(),
            ..PhonebookConfig::default()
        };
        config.validate().unwrap();
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn validate_rejects_relative_log_dir() {
        let mut config = PhonebookConfig {
            log_dir: PathBuf::from("logs/dev"),
            ..PhonebookConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err, ConfigError::RelativeLogDir(PathBuf::from("logs/dev")));
    }

    #[test]
    fn validate_rejects_empty_store_path() {
        let mut config = PhonebookConfig {
            store_path: PathBuf::new(),
            ..PhonebookConfig::default()
        };
        assert_eq!(config.validate().unwrap_err(), ConfigError::EmptyStorePath);
    }
}
