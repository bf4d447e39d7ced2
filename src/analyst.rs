//! Process-wide resource handles.
//!
//! Each handle is built on first use and shared afterwards, so the
//! embedder, store and answer engine exist at most once per process.

use crate::config::Settings;
use crate::embedding::{Embedder, OllamaEmbedder};
use crate::error::Result;
use crate::health::{self, ServiceStatus};
use crate::indexing::Indexer;
use crate::llm::{LanguageModel, OllamaLlm};
use crate::rag::{AnswerEngine, Retriever};
use crate::vector_store::{SqliteVectorStore, VectorStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::info;

/// Lazily constructed handles for the configured services.
pub struct Analyst {
    settings: Settings,
    embedder: OnceCell<Arc<dyn Embedder>>,
    store: OnceCell<Arc<dyn VectorStore>>,
    engine: OnceCell<Arc<AnswerEngine>>,
}

impl Analyst {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            embedder: OnceCell::new(),
            store: OnceCell::new(),
            engine: OnceCell::new(),
        }
    }

    /// Build from pre-made components (used by tests and embedders of the library).
    pub fn with_components(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            settings,
            embedder: OnceCell::new_with(Some(embedder)),
            store: OnceCell::new_with(Some(store)),
            engine: OnceCell::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Probe the Ollama server.
    pub async fn service_status(&self) -> ServiceStatus {
        health::probe(
            &self.settings.ollama.base_url,
            Duration::from_secs(self.settings.ollama.health_timeout_secs),
        )
        .await
    }

    /// Number of indexed documents, without creating the store on disk.
    pub async fn stored_documents(&self) -> Result<usize> {
        match self.store.get() {
            Some(store) => store.document_count().await,
            None => SqliteVectorStore::count_existing(
                &self.settings.sqlite_path(),
                &self.settings.vector_store.collection,
            ),
        }
    }

    /// Whether the match collection exists and holds documents.
    pub async fn store_present(&self) -> Result<bool> {
        Ok(self.stored_documents().await? > 0)
    }

    pub async fn embedder(&self) -> Result<Arc<dyn Embedder>> {
        self.embedder
            .get_or_try_init(|| async {
                let embedder = OllamaEmbedder::new(&self.settings.ollama, &self.settings.embedding.model)?;
                Ok::<Arc<dyn Embedder>, crate::error::AnalystError>(Arc::new(embedder))
            })
            .await
            .cloned()
    }

    pub async fn store(&self) -> Result<Arc<dyn VectorStore>> {
        self.store
            .get_or_try_init(|| async {
                let store = SqliteVectorStore::open(
                    &self.settings.sqlite_path(),
                    &self.settings.vector_store.collection,
                )?;
                Ok::<Arc<dyn VectorStore>, crate::error::AnalystError>(Arc::new(store))
            })
            .await
            .cloned()
    }

    /// Indexer over the shared embedder and store.
    pub async fn indexer(&self) -> Result<Indexer> {
        Ok(Indexer::new(self.embedder().await?, self.store().await?)
            .with_batch_size(self.settings.indexing.batch_size))
    }

    /// The answer engine, built once.
    pub async fn engine(&self) -> Result<Arc<AnswerEngine>> {
        self.engine
            .get_or_try_init(|| async {
                let llm: Arc<dyn LanguageModel> =
                    Arc::new(OllamaLlm::new(&self.settings.ollama, &self.settings.llm.model)?);
                self.engine_with(llm).await
            })
            .await
            .cloned()
    }

    /// Install an engine built around a specific language model.
    pub async fn engine_with_llm(&self, llm: Arc<dyn LanguageModel>) -> Result<Arc<AnswerEngine>> {
        self.engine
            .get_or_try_init(|| self.engine_with(llm))
            .await
            .cloned()
    }

    async fn engine_with(&self, llm: Arc<dyn LanguageModel>) -> Result<Arc<AnswerEngine>> {
        let retriever = Retriever::new(self.store().await?, self.embedder().await?)
            .with_top_k(self.settings.rag.top_k);

        info!(
            "Answer engine ready ({}, top {})",
            llm.model(),
            retriever.top_k()
        );

        Ok(Arc::new(
            AnswerEngine::new(retriever, llm).with_template(&self.settings.rag.prompt_template),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::NoProgress;
    use crate::records::MatchDocument;
    use crate::test_support::{FakeEmbedder, FakeLlm, RecordingStore};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_engine_is_memoized() {
        let analyst = Analyst::with_components(
            Settings::default(),
            Arc::new(FakeEmbedder::default()),
            Arc::new(RecordingStore::new()),
        );

        let first = analyst
            .engine_with_llm(Arc::new(FakeLlm::replying("a")))
            .await
            .unwrap();
        let second = analyst
            .engine_with_llm(Arc::new(FakeLlm::replying("b")))
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_index_then_answer() {
        let analyst = Analyst::with_components(
            Settings::default(),
            Arc::new(FakeEmbedder::default()),
            Arc::new(RecordingStore::new()),
        );

        let docs = vec![MatchDocument {
            content: "Year: 1998 | Brazil vs France | Result: 0-3".to_string(),
            metadata: BTreeMap::from([("year".to_string(), "1998".to_string())]),
        }];
        analyst.indexer().await.unwrap().index(&docs, &NoProgress).await.unwrap();

        let llm = Arc::new(FakeLlm::replying("France."));
        let engine = analyst.engine_with_llm(llm.clone()).await.unwrap();
        let answer = engine.answer("Brazil France final").await.unwrap();

        assert_eq!(answer.text, "France.");
        assert!(llm.prompts()[0].contains("Brazil vs France"));
    }

    #[tokio::test]
    async fn test_store_absent_without_creating_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.vector_store.sqlite_path = dir
            .path()
            .join("fifa_vector_db")
            .join("vectors.db")
            .to_string_lossy()
            .to_string();

        let analyst = Analyst::new(settings.clone());
        assert!(!analyst.store_present().await.unwrap());
        assert!(!settings.sqlite_path().exists());
    }
}
