//! Retrieval contract consumed by answer synthesis.
//!
//! Ranking and relevance belong to the retriever. Synthesis uses the
//! excerpts in the order they are returned.

use crate::synthesis::AnswerSynthesizer;
use crate::types::SynthesisResult;
use docqa_core::AppResult;

/// Source of excerpts for a question.
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    /// Return excerpts for `question`, optionally limited to documents
    /// whose ids are in `scope`.
    async fn retrieve(&self, question: &str, scope: Option<&[String]>) -> AppResult<Vec<String>>;
}

/// Retriever over a fixed set of documents.
///
/// Returns every excerpt of the documents in scope, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRetriever {
    documents: Vec<(String, String)>,
}

impl InMemoryRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an excerpt belonging to `document_id`.
    pub fn add(&mut self, document_id: impl Into<String>, excerpt: impl Into<String>) {
        self.documents.push((document_id.into(), excerpt.into()));
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait::async_trait]
impl Retriever for InMemoryRetriever {
    async fn retrieve(&self, _question: &str, scope: Option<&[String]>) -> AppResult<Vec<String>> {
        let excerpts = self
            .documents
            .iter()
            .filter(|(id, _)| scope.map_or(true, |ids| ids.iter().any(|s| s == id)))
            .map(|(_, excerpt)| excerpt.clone())
            .collect();
        Ok(excerpts)
    }
}

/// Retrieve excerpts for `question` and synthesize an answer from them.
pub async fn ask(
    retriever: &dyn Retriever,
    synthesizer: &AnswerSynthesizer,
    question: &str,
    scope: Option<&[String]>,
) -> AppResult<SynthesisResult> {
    let excerpts = retriever.retrieve(question, scope).await?;
    tracing::debug!("Retrieved {} excerpts", excerpts.len());
    synthesizer.generate_answer(question, &excerpts).await
}
