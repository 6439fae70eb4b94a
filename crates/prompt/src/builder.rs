//! Prompt compiler.

use crate::template::{GROUNDED_QA_TEMPLATE, GROUNDED_QA_TEMPLATE_NAME, REFUSAL_SENTENCE};
use docqa_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Renders the grounded QA template.
///
/// The template is registered once; a compiler can be reused for any
/// number of questions.
pub struct PromptCompiler {
    handlebars: Handlebars<'static>,
}

impl PromptCompiler {
    /// Create a compiler with the grounded QA template registered.
    pub fn new() -> AppResult<Self> {
        let mut handlebars = Handlebars::new();

        // Plain text output, no HTML escaping
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_template_string(GROUNDED_QA_TEMPLATE_NAME, GROUNDED_QA_TEMPLATE)
            .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

        Ok(Self { handlebars })
    }

    /// Render the prompt for `context` and `question`.
    ///
    /// Both values are inserted verbatim. Template syntax inside them is
    /// not interpreted.
    pub fn compile(&self, context: &str, question: &str) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("context", context);
        variables.insert("question", question);
        variables.insert("refusal", REFUSAL_SENTENCE);

        let rendered = self
            .handlebars
            .render(GROUNDED_QA_TEMPLATE_NAME, &variables)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

        tracing::debug!("Compiled prompt ({} bytes)", rendered.len());

        Ok(rendered)
    }
}

/// Render the grounded QA prompt with a one-off compiler.
///
/// # Example
/// ```
/// use docqa_prompt::compile;
///
/// let prompt = compile("Paris is the capital of France.", "What is the capital of France?")
///     .unwrap();
/// assert!(prompt.contains("Question: What is the capital of France?"));
/// ```
pub fn compile(context: &str, question: &str) -> AppResult<String> {
    PromptCompiler::new()?.compile(context, question)
}
