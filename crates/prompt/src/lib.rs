//! Prompt compilation for DocQA.
//!
//! Renders the fixed grounded question-answering template with Handlebars.
//! The template asks the model to answer only from the supplied context,
//! refuse with a fixed sentence otherwise, and reply in an
//! `<answer>`/`<references>` two-section format.

pub mod builder;
pub mod template;

pub use builder::{compile, PromptCompiler};
pub use template::{GROUNDED_QA_TEMPLATE, REFUSAL_SENTENCE};
