//! Configuration settings for cup-analyst.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub ollama: OllamaSettings,
    pub embedding: EmbeddingSettings,
    pub llm: LlmSettings,
    pub vector_store: VectorStoreSettings,
    pub dataset: DatasetSettings,
    pub indexing: IndexingSettings,
    pub rag: RagSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level when no -v flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.cup-analyst".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Connection settings for the local Ollama server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Timeout for the readiness probe.
    pub health_timeout_secs: u64,
    /// Timeout for embedding and generation requests.
    pub request_timeout_secs: u64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            health_timeout_secs: 5,
            request_timeout_secs: 300,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "mxbai-embed-large".to_string(),
        }
    }
}

/// Generation model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model used to answer questions.
    pub model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gemma3".to_string(),
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Path to the SQLite database holding the collection.
    pub sqlite_path: String,
    /// Name of the collection match documents are written to.
    pub collection: String,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            sqlite_path: "~/.cup-analyst/fifa_vector_db/vectors.db".to_string(),
            collection: "fifa_matches".to_string(),
        }
    }
}

/// Source dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Path to the match CSV.
    pub csv_path: String,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            csv_path: "WorldCupMatches.csv".to_string(),
        }
    }
}

/// Indexing pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingSettings {
    /// Documents embedded and written per batch.
    pub batch_size: usize,
}

impl Default for IndexingSettings {
    fn default() -> Self {
        Self { batch_size: 10 }
    }
}

/// RAG (Retrieval-Augmented Generation) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Number of matches retrieved per question (at most 5).
    pub top_k: usize,
    /// Prompt template with `{{context}}` and `{{question}}` placeholders.
    pub prompt_template: String,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            top_k: crate::rag::DEFAULT_TOP_K,
            prompt_template: crate::rag::DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::AnalystError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cup-analyst")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded SQLite database path.
    pub fn sqlite_path(&self) -> PathBuf {
        Self::expand_path(&self.vector_store.sqlite_path)
    }

    /// Get the expanded dataset path.
    pub fn csv_path(&self) -> PathBuf {
        Self::expand_path(&self.dataset.csv_path)
    }

    /// Tracing filter for this crate. Any `-v` flag overrides `general.log_level`.
    pub fn log_filter(&self, verbose: u8) -> String {
        let level = match verbose {
            0 => self.general.log_level.as_str(),
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        format!("cup_analyst={}", level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service_settings() {
        let settings = Settings::default();
        assert_eq!(settings.ollama.base_url, "http://localhost:11434");
        assert_eq!(settings.embedding.model, "mxbai-embed-large");
        assert_eq!(settings.llm.model, "gemma3");
        assert_eq!(settings.vector_store.collection, "fifa_matches");
        assert_eq!(settings.indexing.batch_size, 10);
        assert_eq!(settings.rag.top_k, 5);
    }

    #[test]
    fn test_log_filter_prefers_verbosity() {
        let mut settings = Settings::default();
        assert_eq!(settings.log_filter(0), "cup_analyst=warn");

        settings.general.log_level = "debug".to_string();
        assert_eq!(settings.log_filter(0), "cup_analyst=debug");
        assert_eq!(settings.log_filter(1), "cup_analyst=info");
        assert_eq!(settings.log_filter(5), "cup_analyst=trace");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [llm]
            model = "llama3.2"

            [indexing]
            batch_size = 25
            "#,
        )
        .unwrap();

        assert_eq!(settings.llm.model, "llama3.2");
        assert_eq!(settings.indexing.batch_size, 25);
        assert_eq!(settings.embedding.model, "mxbai-embed-large");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.dataset.csv_path = "/data/matches.csv".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.dataset.csv_path, "/data/matches.csv");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.vector_store.collection, "fifa_matches");
    }
}
