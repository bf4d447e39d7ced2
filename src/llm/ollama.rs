//! Ollama completion model.

use super::LanguageModel;
use crate::config::OllamaSettings;
use crate::error::{AnalystError, Result};
use crate::ollama::create_client;
use async_openai::types::CreateCompletionRequestArgs;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Language model served by a local Ollama instance.
pub struct OllamaLlm {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OllamaLlm {
    /// Create a model handle for `model` on the configured server.
    pub fn new(settings: &OllamaSettings, model: &str) -> Result<Self> {
        Ok(Self {
            client: create_client(settings)?,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl LanguageModel for OllamaLlm {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = CreateCompletionRequestArgs::default()
            .model(&self.model)
            .prompt(prompt)
            .build()
            .map_err(|e| AnalystError::Llm(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .completions()
            .create(request)
            .await
            .map_err(|e| AnalystError::Llm(format!("Failed to generate response: {}", e)))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| AnalystError::Llm("Empty response from model".to_string()))?;

        debug!("Generated {} characters", text.len());
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_creation() {
        let llm = OllamaLlm::new(&OllamaSettings::default(), "gemma3").unwrap();
        assert_eq!(llm.model(), "gemma3");
    }
}
