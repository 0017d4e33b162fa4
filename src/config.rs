//! Console configuration file support.
//!
//! Settings are read from TOML. Every field has a default, so an empty
//! file yields the stock configuration:
//!
//! ```toml
//! [working_day]
//! start_hour = 8
//! end_hour = 18
//! interval_minutes = 30
//!
//! [validation]
//! enforce_deadline_order = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::WorkingDay;
use crate::validation::{validate_working_day, ValidationError};

/// Error loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// Console configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Window the start-time slots are drawn from.
    #[serde(default)]
    pub working_day: WorkingDay,
    #[serde(default)]
    pub validation: ValidationSettings,
}

/// Optional hardening of schedule validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Reject a start time at or after the due date.
    #[serde(default)]
    pub enforce_deadline_order: bool,
}

impl ConsoleConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ConsoleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_working_day(&self.working_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ConsoleConfig::from_toml_str("").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.working_day, WorkingDay::new(8, 18, 30));
        assert!(!config.validation.enforce_deadline_order);
    }

    #[test]
    fn test_partial_override() {
        let config = ConsoleConfig::from_toml_str(
            "[working_day]\ninterval_minutes = 15\n\n[validation]\nenforce_deadline_order = true\n",
        )
        .unwrap();
        assert_eq!(config.working_day, WorkingDay::new(8, 18, 15));
        assert!(config.validation.enforce_deadline_order);
    }

    #[test]
    fn test_invalid_window_rejected() {
        let err = ConsoleConfig::from_toml_str("[working_day]\nstart_hour = 19\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = ConsoleConfig::from_toml_str("[working_day\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[working_day]\nend_hour = 16").unwrap();
        let config = ConsoleConfig::from_file(file.path()).unwrap();
        assert_eq!(config.working_day.end_hour, 16);

        assert!(matches!(
            ConsoleConfig::from_file("/nonexistent/console.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
