//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{rank, Document, SearchResult, VectorStore};
use crate::error::{AnalystError, Result};
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory vector store.
pub struct MemoryVectorStore {
    collection: String,
    documents: RwLock<Vec<Document>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            documents: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new("default")
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> AnalystError {
    AnalystError::VectorStore(format!("Lock poisoned: {}", e))
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn add_batch(&self, docs: &[Document]) -> Result<usize> {
        let mut store = self.documents.write().map_err(poisoned)?;
        store.extend_from_slice(docs);
        Ok(docs.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let docs = self.documents.read().map_err(poisoned)?;
        Ok(rank(docs.clone(), query_embedding, limit))
    }

    async fn document_count(&self) -> Result<usize> {
        Ok(self.documents.read().map_err(poisoned)?.len())
    }

    async fn clear(&self) -> Result<usize> {
        let mut docs = self.documents.write().map_err(poisoned)?;
        let removed = docs.len();
        docs.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new("fifa_matches");

        let doc1 = Document::new("Hello world".to_string(), BTreeMap::new(), vec![1.0, 0.0, 0.0]);
        let doc2 = Document::new("Goodbye world".to_string(), BTreeMap::new(), vec![0.0, 1.0, 0.0]);

        store.add_batch(&[doc1, doc2]).await.unwrap();

        assert_eq!(store.document_count().await.unwrap(), 2);
        assert_eq!(store.collection(), "fifa_matches");

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);

        let top = store.search(&[1.0, 0.0, 0.0], 1).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].document.content, "Hello world");

        assert_eq!(store.clear().await.unwrap(), 2);
        assert_eq!(store.document_count().await.unwrap(), 0);
    }
}
