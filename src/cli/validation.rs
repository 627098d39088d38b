//! CLI argument validation functions
//!
//! Checks clap cannot express on its own. Message content is validated by
//! the services, so only inputs that shape the invocation live here.

use std::fs;
use std::path::PathBuf;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read configuration file '{}': {}", path_str, e)),
    }
}

/// One-time codes: non-blank, no whitespace, at most 32 characters
pub fn validate_code(code: &str) -> Result<String, String> {
    let code = code.trim();

    if code.is_empty() {
        return Err("Code cannot be empty".to_string());
    }

    if code.chars().any(char::is_whitespace) {
        return Err("Code cannot contain whitespace".to_string());
    }

    if code.chars().count() > 32 {
        return Err("Code is too long (maximum 32 characters)".to_string());
    }

    Ok(code.to_string())
}
