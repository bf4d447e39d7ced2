//! Vector store abstraction for cup-analyst.
//!
//! Provides a trait-based interface for different vector database backends.
//! Each store instance is bound to a single named collection.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use crate::records::MatchDocument;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A document stored in the vector database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Generated document ID.
    pub id: Uuid,
    /// Text content that was embedded.
    pub content: String,
    /// Metadata carried over from the source document.
    pub metadata: BTreeMap<String, String>,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this document was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document with a fresh ID.
    pub fn new(content: String, metadata: BTreeMap<String, String>, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            metadata,
            embedding,
            indexed_at: Utc::now(),
        }
    }

    /// Pair a match document with its embedding.
    pub fn from_match(doc: &MatchDocument, embedding: Vec<f32>) -> Self {
        Self::new(doc.content.clone(), doc.metadata.clone(), embedding)
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document.
    pub document: Document,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Name of the collection this store reads and writes.
    fn collection(&self) -> &str;

    /// Append documents. Existing entries are never touched.
    async fn add_batch(&self, docs: &[Document]) -> Result<usize>;

    /// Search for the `limit` most similar documents.
    ///
    /// Results are ordered by score descending; equal scores keep insertion order.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Get total document count in the collection.
    async fn document_count(&self) -> Result<usize>;

    /// Remove every document in the collection.
    async fn clear(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Score, rank and truncate candidates in insertion order.
fn rank(candidates: Vec<Document>, query_embedding: &[f32], limit: usize) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = candidates
        .into_iter()
        .map(|doc| {
            let score = cosine_similarity(query_embedding, &doc.embedding);
            SearchResult { document: doc, score }
        })
        .collect();

    // Stable sort keeps insertion order for ties
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(limit);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_ties_keep_insertion_order() {
        let docs = vec![
            Document::new("first".into(), BTreeMap::new(), vec![1.0, 0.0]),
            Document::new("second".into(), BTreeMap::new(), vec![2.0, 0.0]),
            Document::new("other".into(), BTreeMap::new(), vec![0.0, 1.0]),
        ];

        let ranked = rank(docs, &[1.0, 0.0], 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].document.content, "first");
        assert_eq!(ranked[1].document.content, "second");
    }
}
