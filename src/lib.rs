//! cup-analyst - FIFA World Cup match analyst
//!
//! A local-first CLI that indexes historical World Cup matches into a vector
//! store and answers questions about them with a local language model.
//!
//! # Overview
//!
//! cup-analyst allows you to:
//! - Turn the World Cup matches CSV into one short document per match
//! - Embed and store those documents in batches, with progress reporting
//! - Ask questions and get answers grounded on the five most similar matches
//! - Chat interactively while keeping the transcript for the session
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `records` - CSV loading and match documents
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction
//! - `indexing` - Batched ingestion pipeline
//! - `llm` - Language model access
//! - `rag` - Retrieval and answer generation
//! - `health` - Ollama readiness probe
//! - `session` - Chat transcript state
//! - `analyst` - Lazily built, shared resource handles
//!
//! # Example
//!
//! ```rust,no_run
//! use cup_analyst::analyst::Analyst;
//! use cup_analyst::config::Settings;
//! use cup_analyst::indexing::NoProgress;
//! use cup_analyst::records::load_documents;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let analyst = Analyst::new(settings);
//!
//!     let docs = load_documents(&analyst.settings().csv_path())?;
//!     analyst.indexer().await?.index(&docs, &NoProgress).await?;
//!
//!     let answer = analyst.engine().await?.answer("Who won the 1998 final?").await?;
//!     println!("{}", answer.text);
//!
//!     Ok(())
//! }
//! ```

pub mod analyst;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod health;
pub mod indexing;
pub mod llm;
pub mod ollama;
pub mod rag;
pub mod records;
pub mod session;
pub mod vector_store;

#[cfg(test)]
mod test_support;

pub use error::{AnalystError, Result};
