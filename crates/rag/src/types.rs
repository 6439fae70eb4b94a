//! Answer synthesis request and result types.

use serde::{Deserialize, Serialize};

/// Answer returned when retrieval produced no excerpts.
pub const NO_CONTEXT_ANSWER: &str = "No relevant context found in the documents. Please try a different question or upload relevant documents.";

/// Answer returned when the model output could not be parsed.
pub const MALFORMED_OUTPUT_ANSWER: &str =
    "I am sorry, I cannot answer this question based on the provided context.";

/// Separator placed between excerpts when building the context.
pub const EXCERPT_SEPARATOR: &str = "\n\n";

/// A question together with the excerpts retrieved for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub question: String,

    /// Excerpts in retrieval order
    #[serde(default)]
    pub relevant_docs: Vec<String>,

    /// Provider identifier ("openai" or "gemini")
    pub provider: String,

    /// Model override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Answer with its supporting citation.
///
/// Both fields are always present; `references` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub answer: String,
    pub references: String,
}

impl SynthesisResult {
    pub fn new(answer: impl Into<String>, references: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            references: references.into(),
        }
    }

    /// Result for a question with no retrieved excerpts.
    pub fn no_context() -> Self {
        Self::new(NO_CONTEXT_ANSWER, "")
    }

    /// Result for model output that did not follow the expected format.
    pub fn malformed_output() -> Self {
        Self::new(MALFORMED_OUTPUT_ANSWER, "")
    }

    pub fn has_references(&self) -> bool {
        !self.references.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_results_have_empty_references() {
        assert_eq!(SynthesisResult::no_context().references, "");
        assert_eq!(SynthesisResult::malformed_output().references, "");
        assert!(!SynthesisResult::no_context().has_references());
    }

    #[test]
    fn test_result_serializes_both_fields() {
        let json = serde_json::to_value(SynthesisResult::malformed_output()).unwrap();
        assert_eq!(json["answer"], MALFORMED_OUTPUT_ANSWER);
        assert_eq!(json["references"], "");
    }

    #[test]
    fn test_request_model_is_optional() {
        let request: SynthesisRequest =
            serde_json::from_str(r#"{"question": "q", "provider": "gemini"}"#).unwrap();
        assert!(request.relevant_docs.is_empty());
        assert_eq!(request.model, None);
    }
}
