//! Grounded answer synthesis for DocQA.
//!
//! This crate turns a question plus retrieved document excerpts into an
//! `{answer, references}` result using a configurable LLM provider, and
//! resolves which models the UI can offer for each provider.
//!
//! # Components
//! - [`parser`]: extracts the answer and references sections from model output
//! - [`synthesis`]: compiles the prompt, invokes the provider, parses the reply
//! - [`catalog`]: model catalog with retry and fallback
//! - [`retrieval`]: the retriever contract synthesis consumes
//!
//! # Example
//! ```no_run
//! use docqa_core::AppConfig;
//! use docqa_rag::{generate_answer, SynthesisRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let request = SynthesisRequest {
//!     question: "What is the capital of France?".to_string(),
//!     relevant_docs: vec!["Paris is the capital of France.".to_string()],
//!     provider: "openai".to_string(),
//!     model: None,
//! };
//! let result = generate_answer(&request, &AppConfig::load()?).await?;
//! println!("{}", result.answer);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod parser;
pub mod retrieval;
pub mod synthesis;
pub mod types;

pub use catalog::{
    CatalogSource, HttpCatalogSource, ModelAvailabilityResolver, ModelCatalog, ModelListing,
};
pub use parser::{parse, ParsedResponse};
pub use retrieval::{ask, InMemoryRetriever, Retriever};
pub use synthesis::{generate_answer, AnswerSynthesizer};
pub use types::{
    SynthesisRequest, SynthesisResult, MALFORMED_OUTPUT_ANSWER, NO_CONTEXT_ANSWER,
};
