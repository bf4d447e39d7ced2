//! Client construction for Ollama's OpenAI-compatible API.

use crate::config::OllamaSettings;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Ollama ignores the key, but the OpenAI client always sends one.
const PLACEHOLDER_API_KEY: &str = "ollama";

/// Append `path` to the server root, keeping any path prefix on the root.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Build the `/v1` base URL from the server root.
pub fn api_base(base_url: &str) -> String {
    endpoint(base_url, "v1")
}

/// Create a client for the configured Ollama server.
pub fn create_client(settings: &OllamaSettings) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(
        &settings.base_url,
        Duration::from_secs(settings.request_timeout_secs),
    )
}

/// Create a client with a custom request timeout.
pub fn create_client_with_timeout(base_url: &str, timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let config = OpenAIConfig::new()
        .with_api_base(api_base(base_url))
        .with_api_key(PLACEHOLDER_API_KEY);

    Ok(Client::with_config(config).with_http_client(http_client))
}
