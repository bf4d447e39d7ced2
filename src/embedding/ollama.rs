//! Ollama embeddings implementation.

use super::Embedder;
use crate::config::OllamaSettings;
use crate::error::{AnalystError, Result};
use crate::ollama::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Embedder backed by a local Ollama model.
pub struct OllamaEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OllamaEmbedder {
    /// Create an embedder for `model` on the configured server.
    pub fn new(settings: &OllamaSettings, model: &str) -> Result<Self> {
        Ok(Self {
            client: create_client(settings)?,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| AnalystError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::StringArray(texts.to_vec()))
            .build()
            .map_err(|e| AnalystError::Embedding(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| AnalystError::Embedding(format!("Embedding API error: {}", e)))?;

        // Sort by index to ensure correct order
        let mut data = response.data;
        data.sort_by_key(|e| e.index);

        if data.len() != texts.len() {
            return Err(AnalystError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                data.len()
            )));
        }

        Ok(data.into_iter().map(|e| e.embedding).collect())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder = OllamaEmbedder::new(&OllamaSettings::default(), "mxbai-embed-large").unwrap();
        assert_eq!(embedder.model(), "mxbai-embed-large");
    }

    #[tokio::test]
    async fn test_empty_batch_skips_request() {
        let settings = OllamaSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            ..OllamaSettings::default()
        };
        let embedder = OllamaEmbedder::new(&settings, "mxbai-embed-large").unwrap();
        assert!(embedder.embed_batch(&[]).await.unwrap().is_empty());
    }
}
