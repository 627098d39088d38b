//! Configuration settings structures for send-sen
//!
//! This module defines all configuration structures that can be loaded from
//! YAML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "send-sen".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/send-sen.log".to_string()
}

fn default_console_format() -> String {
    "full".to_string()
}

fn default_file_format() -> String {
    "json".to_string()
}

fn default_brevo_base_url() -> String {
    "https://api.brevo.com/v3".to_string()
}

fn default_sendgrid_base_url() -> String {
    "https://api.sendgrid.com".to_string()
}

fn default_twilio_base_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name, attached to startup logs
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

// ============================================================================
// Provider selection
// ============================================================================

/// Email provider selected by `adapter.email`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    #[default]
    Mock,
    Brevo,
    SendGrid,
}

impl EmailProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailProvider::Mock => "mock",
            EmailProvider::Brevo => "brevo",
            EmailProvider::SendGrid => "sendgrid",
        }
    }
}

/// SMS provider selected by `adapter.sms`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    #[default]
    Mock,
    Brevo,
    Twilio,
}

impl SmsProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmsProvider::Mock => "mock",
            SmsProvider::Brevo => "brevo",
            SmsProvider::Twilio => "twilio",
        }
    }
}

/// Chat notification provider selected by `adapter.notify`
///
/// `slack` is accepted for compatibility with existing configuration files
/// but has no adapter; it always degrades to the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyProvider {
    #[default]
    Mock,
    Telegram,
    Slack,
}

impl NotifyProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyProvider::Mock => "mock",
            NotifyProvider::Telegram => "telegram",
            NotifyProvider::Slack => "slack",
        }
    }
}

macro_rules! impl_provider_display {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_provider_display!(EmailProvider, SmsProvider, NotifyProvider);

/// Which provider backs each channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    #[serde(default)]
    pub email: EmailProvider,

    #[serde(default)]
    pub sms: SmsProvider,

    #[serde(default)]
    pub notify: NotifyProvider,

    /// Fail service construction instead of falling back to the mock adapter
    #[serde(default)]
    pub strict: bool,
}

// ============================================================================
// Provider credentials
// ============================================================================
//
// Credential keys also accept camelCase (`apiKey`, `botToken`, ...) and its
// lowercased form, which is how `config` may hand file keys to serde.

/// SendGrid v3 mail API credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendGridConfig {
    #[serde(default, alias = "apiKey", alias = "apikey")]
    pub api_key: String,

    #[serde(default, alias = "fromEmail", alias = "fromemail")]
    pub from_email: String,

    #[serde(default, alias = "fromName", alias = "fromname")]
    pub from_name: String,

    #[serde(default = "default_sendgrid_base_url")]
    pub base_url: String,
}

impl Default for SendGridConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            from_email: String::new(),
            from_name: String::new(),
            base_url: default_sendgrid_base_url(),
        }
    }
}

/// Twilio Messages API credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwilioConfig {
    #[serde(default, alias = "accountSid", alias = "accountsid")]
    pub account_sid: String,

    #[serde(default, alias = "authToken", alias = "authtoken")]
    pub auth_token: String,

    /// Sender phone number, used when no messaging service is set
    #[serde(default, alias = "fromNumber", alias = "fromnumber")]
    pub from_number: String,

    /// Messaging Service SID, preferred over `from_number` when present
    #[serde(default, alias = "messagingSid", alias = "messagingsid")]
    pub messaging_sid: String,

    #[serde(default = "default_twilio_base_url")]
    pub base_url: String,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            messaging_sid: String::new(),
            base_url: default_twilio_base_url(),
        }
    }
}

/// Telegram Bot API credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default, alias = "botToken", alias = "bottoken")]
    pub bot_token: String,

    /// Numeric chat id or `@channel` username messages are delivered to
    #[serde(default, alias = "chatId", alias = "chatid")]
    pub chat_id: String,

    /// Log request and response payloads at debug level
    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            debug: false,
            api_url: default_telegram_api_url(),
        }
    }
}

/// Brevo (formerly Sendinblue) credentials, shared by email and SMS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrevoConfig {
    #[serde(default, alias = "apiKey", alias = "apikey")]
    pub api_key: String,

    #[serde(default, alias = "senderEmail", alias = "senderemail")]
    pub sender_email: String,

    #[serde(default, alias = "senderName", alias = "sendername")]
    pub sender_name: String,

    /// Alphanumeric sender (max 11 chars) or phone number for SMS
    #[serde(default, alias = "smsSender", alias = "smssender")]
    pub sms_sender: String,

    #[serde(default = "default_brevo_base_url")]
    pub base_url: String,
}

impl Default for BrevoConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            sender_email: String::new(),
            sender_name: String::new(),
            sms_sender: String::new(),
            base_url: default_brevo_base_url(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_console_format")]
    pub format: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
            format: default_console_format(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_file_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_file_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// One of `trace`, `debug`, `info`, `warn`, `error` (case-insensitive)
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime `LoggerConfig`
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console = ConsoleConfig::new(
            self.console.enabled,
            self.console.colored,
            parse_format("logger.console.format", &self.console.format)?,
        );
        let file = FileConfig::new(
            self.file.enabled,
            PathBuf::from(self.file.path),
            self.file.append,
            parse_format("logger.file.format", &self.file.format)?,
        );

        LoggerConfig::new(console, file, self.level).map_err(|e| ConfigError::ValidationError {
            field: "logger".to_string(),
            message: e.to_string(),
        })
    }
}

fn parse_format(field: &str, value: &str) -> Result<LogFormat, ConfigError> {
    value
        .parse::<LogFormat>()
        .map_err(|e| ConfigError::ValidationError {
            field: field.to_string(),
            message: e.to_string(),
        })
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration loaded once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub adapter: AdapterConfig,

    #[serde(default)]
    pub sendgrid: SendGridConfig,

    #[serde(default)]
    pub twilio: TwilioConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub brevo: BrevoConfig,
}
