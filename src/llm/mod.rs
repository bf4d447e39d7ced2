//! Language model access for answer generation.

mod ollama;

pub use ollama::OllamaLlm;

use crate::error::Result;
use async_trait::async_trait;

/// A text-in, text-out language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete `prompt` and return the model's text unmodified.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Name of the generation model.
    fn model(&self) -> &str;
}
