//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::build;
use crate::models::{Level, ParseMode};

/// Send email, SMS and chat notifications through configured providers
#[derive(Parser, Debug)]
#[command(name = "send-sen")]
#[command(about = "Send email, SMS and chat notifications through configured providers")]
#[command(long_about = "
send-sen delivers email (Brevo, SendGrid), SMS (Brevo, Twilio) and chat
notifications (Telegram) through whichever provider is configured. A
provider that cannot be initialised is replaced by a mock that only logs.

EXAMPLES:
    # Send a plain email
    send-sen email send --to ada@example.com --subject Hi --body 'Hello there'

    # Send a verification code by SMS
    send-sen sms code --to +15550100 --code 824193

    # Raise an alert on the chat channel
    send-sen notify --level error --subject db-1 'replica lag above 30s'

    # Show which adapters the current configuration resolves to
    send-sen --env production check

    # Use a single configuration file
    send-sen --config /etc/send-sen/config.yaml check
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load only this YAML file instead of the layered configuration
    /// directory. `SENDSEN_*` environment variables still apply on top.
    ///
    /// Example: --config /etc/send-sen/config.yaml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.yaml` overlay is loaded.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send an email
    Email {
        #[command(subcommand)]
        action: EmailAction,
    },
    /// Send an SMS
    Sms {
        #[command(subcommand)]
        action: SmsAction,
    },
    /// Send a chat notification
    ///
    /// Examples:
    ///   send-sen notify 'deploy finished'
    ///   send-sen notify --level warning --subject disk '85% used'
    Notify(NotifyArgs),
    /// Resolve every provider and report which adapter is in use
    ///
    /// Builds all services exactly as a send would (including the Telegram
    /// token check) without sending anything. Exits non-zero in strict mode
    /// when a provider cannot be initialised.
    Check,
}

#[derive(Subcommand, Debug)]
pub enum EmailAction {
    /// Send a message with explicit subject and body
    Send(EmailArgs),
    /// Send a password reset link
    PasswordReset {
        #[arg(long, value_name = "ADDRESS")]
        to: String,
        #[arg(long, value_name = "URL")]
        link: String,
    },
    /// Send a verification code
    VerificationCode {
        #[arg(long, value_name = "ADDRESS")]
        to: String,
        #[arg(long, value_parser = super::validation::validate_code)]
        code: String,
    },
    /// Send the welcome email
    Welcome {
        #[arg(long, value_name = "ADDRESS")]
        to: String,
        #[arg(long)]
        name: String,
    },
    /// Warn about a login from a new location
    LoginWarning {
        #[arg(long, value_name = "ADDRESS")]
        to: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        time: String,
    },
}

#[derive(Args, Debug)]
pub struct EmailArgs {
    /// Recipient address, repeatable
    #[arg(long, value_name = "ADDRESS", required = true)]
    pub to: Vec<String>,

    #[arg(long, value_name = "ADDRESS")]
    pub cc: Vec<String>,

    #[arg(long, value_name = "ADDRESS")]
    pub bcc: Vec<String>,

    #[arg(short, long)]
    pub subject: String,

    /// Plain-text body
    #[arg(short, long)]
    pub body: String,

    /// Optional HTML alternative
    #[arg(long)]
    pub html: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SmsAction {
    /// Send a text message
    Send {
        /// Recipient phone number, E.164 recommended
        #[arg(long, value_name = "PHONE")]
        to: String,
        #[arg(short, long)]
        message: String,
    },
    /// Send a verification code that expires in 10 minutes
    Code {
        #[arg(long, value_name = "PHONE")]
        to: String,
        #[arg(long, value_parser = super::validation::validate_code)]
        code: String,
    },
}

#[derive(Args, Debug)]
pub struct NotifyArgs {
    /// Message body
    pub message: String,

    #[arg(short, long)]
    pub subject: Option<String>,

    #[arg(short, long, value_enum, default_value_t = NotifyLevel::Info)]
    pub level: NotifyLevel,

    /// Telegram parse mode, HTML when omitted
    #[arg(long, value_enum)]
    pub parse_mode: Option<ParseModeArg>,
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyLevel {
    Debug,
    Info,
    #[value(alias = "warn")]
    Warning,
    Error,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseModeArg {
    Html,
    Markdown,
    #[value(name = "markdownv2")]
    MarkdownV2,
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

impl From<NotifyLevel> for Level {
    fn from(level: NotifyLevel) -> Self {
        match level {
            NotifyLevel::Debug => Level::Debug,
            NotifyLevel::Info => Level::Info,
            NotifyLevel::Warning => Level::Warning,
            NotifyLevel::Error => Level::Error,
        }
    }
}

impl From<ParseModeArg> for ParseMode {
    fn from(mode: ParseModeArg) -> Self {
        match mode {
            ParseModeArg::Html => ParseMode::Html,
            ParseModeArg::Markdown => ParseMode::Markdown,
            ParseModeArg::MarkdownV2 => ParseMode::MarkdownV2,
        }
    }
}

impl Cli {
    /// Log level implied by `--verbose` / `--quiet`, if either was given
    pub fn log_level_override(&self) -> Option<&'static str> {
        match (self.verbose, self.quiet) {
            (true, _) => Some("debug"),
            (_, true) => Some("error"),
            _ => None,
        }
    }
}
