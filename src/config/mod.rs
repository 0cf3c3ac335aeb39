//! Configuration module
//!
//! Handles loading the tool configuration.

mod schema;

pub use schema::{Config, NetworkConfig};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Get the default config file path
pub fn config_path() -> PathBuf {
    crate::util::config_dir().join("config.toml")
}

/// Load configuration from the default location
pub fn load() -> Result<Config> {
    load_from(&config_path())
}

/// Load configuration from disk, falling back to defaults when absent
pub fn load_from(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        tracing::debug!("Configuration loaded from {:?}", path);
        Ok(config)
    } else {
        tracing::debug!("No configuration at {:?}, using defaults", path);
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.endpoints.metadata_url, "https://steamdb.info");
        assert_eq!(config.network.timeout_seconds, 30);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[endpoints]\ncontent_url = \"http://localhost:8080\"\n",
        )
        .unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.endpoints.content_url, "http://localhost:8080");
        assert_eq!(config.endpoints.metadata_url, "https://steamdb.info");
        assert!(config.network.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[network]\ntimeout_seconds = \"soon\"\n").unwrap();
        assert!(load_from(&path).is_err());
    }
}
