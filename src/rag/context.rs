//! Retrieval and context building for RAG responses.

use super::DEFAULT_TOP_K;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{SearchResult, VectorStore};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Top-K similarity search over the match collection.
pub struct Retriever {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever returning up to five matches.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Lower the number of results. Values above five are clamped.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.min(DEFAULT_TOP_K);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Retrieve the most similar documents, best match first.
    #[instrument(skip(self), fields(top_k = self.top_k))]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;
        let results = self.vector_store.search(&query_embedding, self.top_k).await?;

        debug!("Retrieved {} documents", results.len());
        Ok(results)
    }
}

/// Join retrieved contents with newlines, keeping retrieval order.
pub fn build_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.document.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeEmbedder, RecordingStore};
    use crate::vector_store::Document;
    use std::collections::BTreeMap;

    async fn seeded_store(contents: &[&str]) -> Arc<RecordingStore> {
        let store = Arc::new(RecordingStore::new());
        let docs: Vec<Document> = contents
            .iter()
            .map(|c| Document::new(c.to_string(), BTreeMap::new(), FakeEmbedder::vector(c)))
            .collect();
        store.add_batch(&docs).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_requests_at_most_five() {
        let contents: Vec<String> = (0..12)
            .map(|i| format!("Year: 19{:02} | Home vs Away | Result: {}-0", 30 + i, i))
            .collect();
        let refs: Vec<&str> = contents.iter().map(String::as_str).collect();
        let store = seeded_store(&refs).await;

        let retriever = Retriever::new(store.clone(), Arc::new(FakeEmbedder::default()));
        let results = retriever.retrieve("Home vs Away").await.unwrap();
        assert_eq!(results.len(), 5);

        let clamped = Retriever::new(store.clone(), Arc::new(FakeEmbedder::default())).with_top_k(50);
        clamped.retrieve("anything").await.unwrap();

        assert_eq!(store.search_limits(), vec![5, 5]);
    }

    #[tokio::test]
    async fn test_best_match_first() {
        let store = seeded_store(&[
            "Year: 1966 | England vs Germany FR | Result: 4-2",
            "Year: 1950 | Uruguay vs Brazil | Result: 2-1",
        ])
        .await;

        let retriever = Retriever::new(store, Arc::new(FakeEmbedder::default()));
        let results = retriever.retrieve("Uruguay Brazil 1950").await.unwrap();

        assert_eq!(results[0].document.content, "Year: 1950 | Uruguay vs Brazil | Result: 2-1");
    }

    #[test]
    fn test_build_context() {
        let results: Vec<SearchResult> = ["a", "b"]
            .iter()
            .map(|c| SearchResult {
                document: Document::new(c.to_string(), BTreeMap::new(), vec![]),
                score: 1.0,
            })
            .collect();

        assert_eq!(build_context(&results), "a\nb");
        assert_eq!(build_context(&[]), "");
    }
}
