//! In-crate fakes for the embedding, storage and generation seams.

use crate::embedding::Embedder;
use crate::error::{AnalystError, Result};
use crate::llm::LanguageModel;
use crate::vector_store::{Document, MemoryVectorStore, SearchResult, VectorStore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Letter-frequency embedder: similar spellings give similar vectors.
#[derive(Default)]
pub struct FakeEmbedder {
    fail_after: Option<usize>,
    calls: AtomicUsize,
}

impl FakeEmbedder {
    /// Succeed for `calls` batch calls, then fail every call.
    pub fn failing_after(calls: usize) -> Self {
        Self {
            fail_after: Some(calls),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; 26];
        for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
            v[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
        }
        v
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| call >= limit) {
            return Err(AnalystError::Embedding("connection reset".to_string()));
        }
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn model(&self) -> &str {
        "fake-embed"
    }
}

/// Memory store that records every write size and search limit.
pub struct RecordingStore {
    inner: MemoryVectorStore,
    writes: Mutex<Vec<usize>>,
    limits: Mutex<Vec<usize>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryVectorStore::new("fifa_matches"),
            writes: Mutex::new(Vec::new()),
            limits: Mutex::new(Vec::new()),
        }
    }

    pub fn write_sizes(&self) -> Vec<usize> {
        self.writes.lock().unwrap().clone()
    }

    pub fn search_limits(&self) -> Vec<usize> {
        self.limits.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for RecordingStore {
    fn collection(&self) -> &str {
        self.inner.collection()
    }

    async fn add_batch(&self, docs: &[Document]) -> Result<usize> {
        self.writes.lock().unwrap().push(docs.len());
        self.inner.add_batch(docs).await
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        self.limits.lock().unwrap().push(limit);
        self.inner.search(query_embedding, limit).await
    }

    async fn document_count(&self) -> Result<usize> {
        self.inner.document_count().await
    }

    async fn clear(&self) -> Result<usize> {
        self.inner.clear().await
    }
}

/// Language model that echoes a canned reply and keeps the prompts it saw.
pub struct FakeLlm {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| AnalystError::Llm("connection refused".to_string()))
    }

    fn model(&self) -> &str {
        "fake-llm"
    }
}
