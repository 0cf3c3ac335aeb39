//! Configuration schema
//!
//! Defines the structure of the configuration file.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// Network settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Remote hosts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Metadata website serving depot file lists
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,

    /// Content host serving manifests
    #[serde(default = "default_content_url")]
    pub content_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            metadata_url: default_metadata_url(),
            content_url: default_content_url(),
        }
    }
}

// Default value functions for serde
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/93.0.4577.82 Safari/537.36".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_metadata_url() -> String {
    "https://steamdb.info".to_string()
}
fn default_content_url() -> String {
    "https://cache2-scl1.steamcontent.com".to_string()
}
