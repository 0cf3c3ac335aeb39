//! Utility module
//!
//! Common utilities used across the application.

pub mod hash;
pub mod http;
pub mod path;

use std::path::PathBuf;

/// Get the configuration directory for depot-hashes
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("depot-hashes")
}
