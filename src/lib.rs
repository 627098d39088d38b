//! send-sen library
//!
//! Multi-channel message dispatch: email, SMS and chat notifications sent
//! through pluggable provider adapters chosen from configuration.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod models;
pub mod services;

pub use error::{AppError, AppResult};
pub use services::Services;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
