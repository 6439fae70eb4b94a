//! DocQA Core Library
//!
//! Foundational utilities shared by the DocQA crates:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - Retry with exponential backoff

pub mod config;
pub mod error;
pub mod logging;
pub mod retry;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use retry::{RetryExhausted, RetryPolicy};
