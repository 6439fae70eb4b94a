//! Command handlers for the DocQA CLI.

pub mod ask;
pub mod models;

pub use ask::AskCommand;
pub use models::ModelsCommand;
