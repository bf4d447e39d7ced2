//! RAG (Retrieval-Augmented Generation) for questions about matches.
//!
//! The [`Retriever`] finds the most similar match documents and the
//! [`AnswerEngine`] turns them into a prompt for the language model.

pub mod context;
pub mod prompt;
mod response;

pub use context::{build_context, Retriever};
pub use response::{Answer, AnswerEngine};

/// Maximum number of matches retrieved per question.
pub const DEFAULT_TOP_K: usize = 5;

/// Default prompt sent to the language model.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "Match Data: {{context}}\n\nQuestion: {{question}}";
