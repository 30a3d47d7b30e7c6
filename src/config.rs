//! Harness configuration
//!
//! Report layout and logging are read from an optional JSON file so a
//! project can pin its settings without touching the test binary. Every
//! field has a default; a missing or malformed file falls back to them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default file looked up in the working directory by [`HarnessConfig::load`].
pub const DEFAULT_CONFIG_FILE: &str = "tinytest.json";

/// Complete harness configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

/// Report stream layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of dashes in the separator lines
    pub separator_width: usize,
    /// Wrap `[Passed]`/`[Failed]` in ANSI colors
    pub color: bool,
    /// Print a `Found <name>.` line per test before the banner
    pub announce_registrations: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            separator_width: 24,
            color: false,
            announce_registrations: false,
        }
    }
}

/// Diagnostics logging on stderr
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Why a config file could not be used
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read (usually it does not exist)
    Read { path: PathBuf, source: io::Error },
    /// The file exists but is not a valid configuration
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Log the fallback to defaults. A missing file is routine and only
    /// shows at `debug`; a malformed one is a warning.
    pub fn log_fallback(&self) {
        match self {
            ConfigError::Read { path, source } => {
                log::debug!(
                    "[Config] No config file at {:?}: {}. Using defaults.",
                    path,
                    source
                );
            }
            ConfigError::Parse { path, source } => {
                log::warn!(
                    "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                    path,
                    source
                );
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read {:?}: {}", path, source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config {:?}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl HarnessConfig {
    /// Read and parse a JSON config file without falling back.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("[Config] Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults when the file is missing
    /// or is not valid JSON. The fallback is logged, so logging should be
    /// initialised first.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        Self::read_from_file(path).unwrap_or_else(|err| {
            err.log_fallback();
            Self::default()
        })
    }

    /// Load `tinytest.json` from the working directory.
    pub fn load() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tinytest-config-{}-{}.json",
            std::process::id(),
            name
        ));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.report.separator_width, 24);
        assert!(!config.report.color);
        assert!(!config.report.announce_registrations);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: HarnessConfig =
            serde_json::from_str(r#"{ "report": { "color": true } }"#).unwrap();
        assert!(config.report.color);
        assert_eq!(config.report.separator_width, 24);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_file(
            "valid",
            r#"{ "report": { "separator_width": 8 }, "logging": { "level": "debug" } }"#,
        );
        let config = HarnessConfig::load_from_file(&path);
        fs::remove_file(&path).ok();

        assert_eq!(config.report.separator_width, 8);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_json_falls_back_to_defaults() {
        let path = temp_file("invalid", "{ not json");
        let config = HarnessConfig::load_from_file(&path);
        fs::remove_file(&path).ok();

        assert_eq!(config, HarnessConfig::default());
    }

    #[test]
    fn test_read_from_file_reports_the_problem() {
        let path = temp_file("unparsed", "{ not json");
        let result = HarnessConfig::read_from_file(&path);
        fs::remove_file(&path).ok();

        match result {
            Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(matches!(
            HarnessConfig::read_from_file("/nonexistent/tinytest.json"),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = HarnessConfig::load_from_file("/nonexistent/tinytest.json");
        assert_eq!(config, HarnessConfig::default());
    }
}
