//! Answer synthesis orchestration.
//!
//! Turns a question and its retrieved excerpts into a [`SynthesisResult`]:
//! compile the grounded prompt, invoke the provider, parse the reply.

use crate::parser::{self, ParsedResponse};
use crate::types::{SynthesisRequest, SynthesisResult, EXCERPT_SEPARATOR};
use docqa_core::config::AppConfig;
use docqa_core::AppResult;
use docqa_llm::LlmClient;
use docqa_prompt::PromptCompiler;
use std::sync::Arc;

/// Answers questions with one resolved provider client.
///
/// Holds no per-question state; one synthesizer can serve concurrent
/// questions.
pub struct AnswerSynthesizer {
    client: Arc<dyn LlmClient>,
    compiler: PromptCompiler,
}

impl AnswerSynthesizer {
    pub fn new(client: Arc<dyn LlmClient>) -> AppResult<Self> {
        Ok(Self {
            client,
            compiler: PromptCompiler::new()?,
        })
    }

    /// Resolve `provider`/`model` from `config` and build a synthesizer.
    ///
    /// Fails with `AppError::Config` for an unknown provider or missing
    /// credentials.
    pub fn from_config(provider: &str, model: Option<&str>, config: &AppConfig) -> AppResult<Self> {
        let client = docqa_llm::resolve(provider, model, &config.provider_config(provider))?;
        Self::new(client)
    }

    pub fn client(&self) -> &dyn LlmClient {
        self.client.as_ref()
    }

    /// Answer `question` from `relevant_docs`.
    ///
    /// Empty `relevant_docs` returns the no-context result without calling
    /// the provider. Output that does not follow the answer/references
    /// format becomes the fixed apology result. Provider transport errors
    /// are returned as `Err`.
    pub async fn generate_answer(
        &self,
        question: &str,
        relevant_docs: &[String],
    ) -> AppResult<SynthesisResult> {
        if relevant_docs.is_empty() {
            tracing::info!("No relevant excerpts for question; skipping model call");
            return Ok(SynthesisResult::no_context());
        }

        let context = relevant_docs.join(EXCERPT_SEPARATOR);
        let prompt = self.compiler.compile(&context, question)?;

        tracing::info!(
            provider = self.client.provider_name(),
            model = self.client.model(),
            excerpts = relevant_docs.len(),
            "Prompt: {}",
            prompt
        );

        let raw = self.client.invoke(&prompt).await?;

        tracing::info!("Response: {}", raw);

        match parser::parse(&raw) {
            ParsedResponse::WellFormed { answer, references } => {
                Ok(SynthesisResult { answer, references })
            }
            ParsedResponse::Malformed => {
                tracing::warn!("Model output did not contain a references section");
                Ok(SynthesisResult::malformed_output())
            }
        }
    }
}

/// Resolve the provider named in `request` and answer it.
///
/// Provider resolution happens before the empty-context check, so a
/// misconfigured provider fails even when no excerpts were retrieved.
pub async fn generate_answer(
    request: &SynthesisRequest,
    config: &AppConfig,
) -> AppResult<SynthesisResult> {
    let synthesizer =
        AnswerSynthesizer::from_config(&request.provider, request.model.as_deref(), config)?;
    synthesizer
        .generate_answer(&request.question, &request.relevant_docs)
        .await
}
