//! Configuration management module for send-sen
//!
//! Layered YAML configuration with environment variable overrides.
//!
//! # Configuration Priority (lowest to highest)
//! 1. `config.yaml` - Base configuration
//! 2. `{environment}.yaml` - Environment-specific configuration
//! 3. `local.yaml` - Local overrides (not committed to version control)
//! 4. `SENDSEN_*` environment variables, `__` separating nested keys

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    AdapterConfig, AppConfig, BrevoConfig, ConsoleSettings, EmailProvider, FileSettings,
    LoggerSettings, NotifyProvider, SendGridConfig, Settings, SmsProvider, TelegramConfig,
    TwilioConfig,
};
