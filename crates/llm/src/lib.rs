//! LLM integration crate for DocQA.
//!
//! Provides a provider-agnostic prompt-in/text-out interface with two
//! implementations, selected once by [`resolve`].
//!
//! # Providers
//! - **OpenAI**: chat completions (default model `gpt-4.1-mini`)
//! - **Gemini**: generateContent (default model `gemini-2.0-flash-lite`)
//!
//! # Example
//! ```no_run
//! use docqa_core::config::ProviderConfig;
//! use docqa_llm::resolve;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = resolve("openai", None, &ProviderConfig::default())?;
//! let text = client.invoke("Hello, world!").await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::{create_client, resolve};
pub use providers::{GeminiClient, OpenAiClient};
pub use types::{ProviderType, DETERMINISTIC_TEMPERATURE};
