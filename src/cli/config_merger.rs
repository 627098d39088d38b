//! Configuration merger for CLI arguments and config files
//!
//! Global flags override file-based configuration: `--config` picks the
//! source, `--env` the overlay, and `--verbose`/`--quiet` the log level.

use super::parser::Cli;
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

/// Applies CLI overrides on top of a loaded configuration
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration the CLI asks for
    ///
    /// `--config` loads that single file; otherwise the layered loader is
    /// driven by `SENDSEN_CONFIG_DIR` / `SENDSEN_CONFIG_FILE`.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Self::loader_for(cli)?.load().map(Self::new)
    }

    fn loader_for(cli: &Cli) -> Result<ConfigLoader, ConfigError> {
        let loader = match cli.config {
            Some(ref path) => ConfigLoader::from_file(path),
            None => ConfigLoader::new()?,
        };

        Ok(match cli.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        })
    }

    /// Apply CLI overrides and re-validate
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if let Some(level) = cli.log_level_override() {
            config.logger.level = level.to_string();
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmailProvider, Environment as AppEnvironment};
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_configuration_merger_new() {
        let base_config = Settings::default();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_merge_verbose_flag() {
        let merger = ConfigurationMerger::new(Settings::default());
        let cli = Cli::try_parse_from(["send-sen", "--verbose", "check"]).unwrap();

        let merged = merger.merge_cli_args(&cli).unwrap();
        assert_eq!(merged.logger.level, "debug");
    }

    #[test]
    fn test_merge_quiet_flag() {
        let merger = ConfigurationMerger::new(Settings::default());
        let cli = Cli::try_parse_from(["send-sen", "-q", "check"]).unwrap();

        let merged = merger.merge_cli_args(&cli).unwrap();
        assert_eq!(merged.logger.level, "error");
    }

    #[test]
    fn test_merge_without_flags_keeps_level() {
        let mut base = Settings::default();
        base.logger.level = "warn".to_string();
        let merger = ConfigurationMerger::new(base);
        let cli = Cli::try_parse_from(["send-sen", "check"]).unwrap();

        assert_eq!(merger.merge_cli_args(&cli).unwrap().logger.level, "warn");
    }

    #[test]
    fn test_loader_for_explicit_file_and_env() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "adapter:\n  email: sendgrid").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from(["send-sen", "--config", &path, "--env", "stage", "check"])
            .unwrap();
        let loader = ConfigurationMerger::loader_for(&cli).unwrap();
        assert_eq!(loader.environment(), AppEnvironment::Staging);
    }

    #[test]
    fn test_from_cli_reads_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "app:\n  name: cli-test\nadapter:\n  email: sendgrid").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from(["send-sen", "--config", &path, "check"]).unwrap();
        let merger = ConfigurationMerger::from_cli(&cli).unwrap();
        assert_eq!(merger.config().app.name, "cli-test");
        assert_eq!(merger.config().adapter.email, EmailProvider::SendGrid);
    }
}
