//! Fixed grounded question-answering template.

/// Template name registered with Handlebars.
pub const GROUNDED_QA_TEMPLATE_NAME: &str = "grounded_qa";

/// Sentence the model must emit when the context does not contain the answer.
pub const REFUSAL_SENTENCE: &str = "I cannot answer this question based on the provided context.";

/// Grounded QA template. Variables: `context`, `question`, `refusal`.
pub const GROUNDED_QA_TEMPLATE: &str = r#"Answer the question using only the provided context. If the answer cannot be found in the context, say "{{refusal}}"

Also quote the section of the document that answers the question.

Context: {{context}}

Question: {{question}}

Answer in exactly this format:

<answer>
<answer to the question, based on the document>
</answer>

<references>
<the literal text of the document that answers the question>
</references>

Answer: "#;
