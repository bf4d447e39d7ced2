//! Readiness probe for the Ollama server.
//!
//! The probe never fails: any connection error, timeout or non-2xx status
//! is reported as offline.

use crate::ollama;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Path listing the models available on the server.
const TAGS_PATH: &str = "api/tags";

/// Outcome of a readiness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    /// Server answered; `models` lists the pulled model names.
    Online { models: Vec<String> },
    /// Server unreachable or unhealthy.
    Offline { reason: String },
}

impl ServiceStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, ServiceStatus::Online { .. })
    }

    /// Whether `model` is pulled. A bare name also matches its `:latest` tag.
    pub fn has_model(&self, model: &str) -> bool {
        match self {
            ServiceStatus::Online { models } => models
                .iter()
                .any(|m| m == model || m.strip_suffix(":latest") == Some(model)),
            ServiceStatus::Offline { .. } => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Return true only when the server answers the tags endpoint with a 2xx.
pub async fn check_service(base_url: &str, timeout: Duration) -> bool {
    probe(base_url, timeout).await.is_online()
}

/// Probe the server and list its models.
#[instrument(skip(timeout))]
pub async fn probe(base_url: &str, timeout: Duration) -> ServiceStatus {
    let url = match url::Url::parse(&ollama::endpoint(base_url, TAGS_PATH)) {
        Ok(url) => url,
        Err(e) => {
            return ServiceStatus::Offline {
                reason: format!("invalid base URL: {}", e),
            }
        }
    };

    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            return ServiceStatus::Offline {
                reason: format!("failed to build HTTP client: {}", e),
            }
        }
    };

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!("Readiness probe failed: {}", e);
            return ServiceStatus::Offline {
                reason: e.to_string(),
            };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return ServiceStatus::Offline {
            reason: format!("unexpected status {}", status),
        };
    }

    // A healthy server with an unexpected body still counts as online
    let models = response
        .json::<TagsResponse>()
        .await
        .map(|tags| tags.models.into_iter().map(|m| m.name).collect())
        .unwrap_or_default();

    ServiceStatus::Online { models }
}
