//! HTTP utilities
//!
//! Both hosts reject requests without a browser user agent, so every
//! request goes through a client built here.

use crate::config::NetworkConfig;
use anyhow::{Context, Result};
use std::time::Duration;

/// Build the shared HTTP client
pub fn build_client(network: &NetworkConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(network.user_agent.as_str())
        .timeout(Duration::from_secs(network.timeout_seconds))
        .build()
        .context("Failed to build HTTP client")?;
    Ok(client)
}

/// GET a URL and return the body, failing on non-success status
pub async fn get_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    tracing::debug!("GET {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to request {}", url))?
        .error_for_status()?;

    let bytes = response.bytes().await?;
    tracing::debug!("Received {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}

/// GET a URL and decode the body as text
pub async fn get_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let bytes = get_bytes(client, url).await?;
    String::from_utf8(bytes).with_context(|| format!("Response from {} is not UTF-8", url))
}
