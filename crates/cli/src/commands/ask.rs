//! Ask command handler.
//!
//! Answers a question from excerpts given on the command line or read from
//! files, using the configured provider.

use clap::Args;
use docqa_core::{config::AppConfig, AppError, AppResult};
use docqa_rag::{ask, AnswerSynthesizer, InMemoryRetriever, SynthesisResult};
use std::path::{Path, PathBuf};

/// Answer a question from document excerpts
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Excerpt text (repeatable, kept in order)
    #[arg(short, long = "doc")]
    pub docs: Vec<String>,

    /// File whose contents form one document, id = file stem (repeatable)
    #[arg(short = 'f', long = "doc-file")]
    pub doc_files: Vec<PathBuf>,

    /// Only use documents with these ids (repeatable)
    #[arg(short, long)]
    pub scope: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let retriever = self.build_retriever()?;
        let synthesizer =
            AnswerSynthesizer::from_config(&config.provider, config.model.as_deref(), config)?;

        tracing::debug!(
            "Using provider {} with model {}",
            synthesizer.client().provider_name(),
            synthesizer.client().model()
        );

        let scope = (!self.scope.is_empty()).then_some(self.scope.as_slice());
        let result = ask(&retriever, &synthesizer, &self.question, scope).await?;

        self.print(&result)
    }

    /// Inline excerpts get ids `doc-1`, `doc-2`, ...; files use their stem.
    fn build_retriever(&self) -> AppResult<InMemoryRetriever> {
        let mut retriever = InMemoryRetriever::new();

        for (i, doc) in self.docs.iter().enumerate() {
            retriever.add(format!("doc-{}", i + 1), doc.clone());
        }

        for path in &self.doc_files {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                AppError::Other(format!("Failed to read document {:?}: {}", path, e))
            })?;
            retriever.add(document_id(path), contents);
        }

        tracing::debug!("Loaded {} excerpts", retriever.len());
        Ok(retriever)
    }

    fn print(&self, result: &SynthesisResult) -> AppResult<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(result)?);
            return Ok(());
        }

        println!("{}", result.answer.trim());
        if result.has_references() {
            println!();
            println!("References:");
            println!("{}", result.references.trim());
        }

        Ok(())
    }
}

fn document_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
