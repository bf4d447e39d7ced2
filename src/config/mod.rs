//! Configuration module for cup-analyst.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    DatasetSettings, EmbeddingSettings, GeneralSettings, IndexingSettings, LlmSettings,
    OllamaSettings, RagSettings, Settings, VectorStoreSettings,
};
