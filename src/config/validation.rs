//! Configuration validation logic
//!
//! Provider credentials are deliberately not checked here: a provider with
//! missing credentials degrades to the mock adapter at service construction.
//! Only settings that would stop the process from starting are rejected.

use crate::config::error::ConfigError;
use crate::config::settings::{ConsoleSettings, FileSettings, LoggerSettings, Settings};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

fn validate_format(field: &str, format: &str) -> Result<(), ConfigError> {
    if !VALID_LOG_FORMATS.contains(&format.to_lowercase().as_str()) {
        return Err(ConfigError::ValidationError {
            field: field.to_string(),
            message: format!(
                "Invalid log format '{}'. Valid formats are: {}",
                format,
                VALID_LOG_FORMATS.join(", ")
            ),
        });
    }
    Ok(())
}

impl ConsoleSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        validate_format("logger.console.format", &self.format)
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        validate_format("logger.file.format", &self.format)
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - At least one of console or file output must be enabled
    /// - Formats must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.console.validate()?;
        self.file.validate()?;

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings, returning the first error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.trim().is_empty() {
            return Err(ConfigError::validation("app.name", "Application name cannot be empty."));
        }

        self.logger.validate()?;
        Ok(())
    }
}
