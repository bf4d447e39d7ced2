//! Batched ingestion of match documents into the vector store.
//!
//! Documents are embedded and written in consecutive fixed-size batches,
//! strictly one after another. A failure aborts the run; batches that were
//! already written stay in the store.

use crate::embedding::Embedder;
use crate::error::{AnalystError, Result};
use crate::records::MatchDocument;
use crate::vector_store::{Document, VectorStore};
use indicatif::ProgressBar;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Default number of documents per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Progress after a completed batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Documents written so far.
    pub processed: usize,
    /// Documents in the whole run.
    pub total: usize,
    /// `processed / total`, reaching exactly 1.0 on the last batch.
    pub fraction: f64,
    /// Human-readable status line.
    pub message: String,
}

impl ProgressUpdate {
    fn new(processed: usize, total: usize) -> Self {
        Self {
            processed,
            total,
            fraction: processed as f64 / total as f64,
            message: format!("Indexing match {} of {}...", processed, total),
        }
    }
}

/// Receives progress updates from an indexing run.
pub trait IndexProgress: Send + Sync {
    fn update(&self, progress: &ProgressUpdate);
}

/// Discards progress updates.
pub struct NoProgress;

impl IndexProgress for NoProgress {
    fn update(&self, _progress: &ProgressUpdate) {}
}

impl IndexProgress for ProgressBar {
    fn update(&self, progress: &ProgressUpdate) {
        self.set_length(progress.total as u64);
        self.set_position(progress.processed as u64);
        self.set_message(progress.message.clone());
    }
}

/// Summary of a finished indexing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    pub total: usize,
    pub indexed: usize,
    pub batches: usize,
}

/// Embeds documents and appends them to a vector store.
pub struct Indexer {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    batch_size: usize,
}

impl Indexer {
    /// Create an indexer with the default batch size.
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the batch size. Zero is rejected when indexing starts.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Index every document, reporting progress after each batch.
    ///
    /// Not idempotent: running twice against the same collection stores
    /// every document twice.
    #[instrument(skip_all, fields(total = docs.len(), collection = %self.store.collection()))]
    pub async fn index(
        &self,
        docs: &[MatchDocument],
        progress: &dyn IndexProgress,
    ) -> Result<IndexReport> {
        if self.batch_size == 0 {
            return Err(AnalystError::Config("batch size must be at least 1".to_string()));
        }

        let total = docs.len();
        let mut report = IndexReport {
            total,
            indexed: 0,
            batches: 0,
        };

        if total == 0 {
            info!("Nothing to index");
            return Ok(report);
        }

        info!(
            "Indexing {} documents in batches of {} with {}",
            total,
            self.batch_size,
            self.embedder.model()
        );

        for batch in docs.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|d| d.content.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;

            if embeddings.len() != batch.len() {
                return Err(AnalystError::Embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            let entries: Vec<Document> = batch
                .iter()
                .zip(embeddings)
                .map(|(doc, embedding)| Document::from_match(doc, embedding))
                .collect();

            report.indexed += self.store.add_batch(&entries).await?;
            report.batches += 1;

            debug!("Batch {} written ({}/{})", report.batches, report.indexed, total);
            progress.update(&ProgressUpdate::new(report.indexed, total));
        }

        info!("Indexed {} documents in {} batches", report.indexed, report.batches);
        Ok(report)
    }
}
