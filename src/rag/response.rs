//! RAG response generation.

use super::context::{build_context, Retriever};
use super::{prompt, DEFAULT_PROMPT_TEMPLATE};
use crate::error::Result;
use crate::llm::LanguageModel;
use crate::session::ChatSession;
use crate::vector_store::SearchResult;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Answers questions from retrieved match records.
pub struct AnswerEngine {
    retriever: Retriever,
    llm: Arc<dyn LanguageModel>,
    template: String,
}

impl AnswerEngine {
    /// Create an engine using the default prompt template.
    pub fn new(retriever: Retriever, llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            retriever,
            llm,
            template: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }

    /// Use a custom template with `{{context}}` and `{{question}}` placeholders.
    pub fn with_template(mut self, template: &str) -> Self {
        self.template = template.to_string();
        self
    }

    /// Fill the template with the context and the question, both verbatim.
    pub fn build_prompt(&self, context: &str, question: &str) -> String {
        let vars = HashMap::from([("context", context), ("question", question)]);
        prompt::render(&self.template, &vars)
    }

    /// Retrieve, prompt the model once, and return its reply unmodified.
    ///
    /// No retries; model errors propagate to the caller.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        info!("Processing question");

        let sources = self.retriever.retrieve(question).await?;
        let context = build_context(&sources);
        let prompt = self.build_prompt(&context, question);

        debug!("Prompting {} with {} source(s)", self.llm.model(), sources.len());
        let text = self.llm.generate(&prompt).await?;

        Ok(Answer { text, sources })
    }

    /// Answer within a chat session.
    ///
    /// The user turn is recorded before the model is called; the assistant
    /// turn only when an answer comes back.
    pub async fn respond(&self, session: &mut ChatSession, question: &str) -> Result<Answer> {
        session.push_user(question);
        let answer = self.answer(question).await?;
        session.push_assistant(answer.text.clone());
        Ok(answer)
    }
}

/// A generated answer with the records it was grounded on.
#[derive(Debug, Clone)]
pub struct Answer {
    /// Model output, unmodified.
    pub text: String,
    /// Retrieved documents, best match first.
    pub sources: Vec<SearchResult>,
}
