//! Models command handler.
//!
//! Lists selectable models per provider, either from the backend catalog
//! (with retry and fallback) or from local configuration.

use clap::Args;
use docqa_core::{config::AppConfig, AppResult};
use docqa_llm::ProviderType;
use docqa_rag::{ModelAvailabilityResolver, ModelCatalog, ModelListing};

/// List available models per provider
#[derive(Args, Debug)]
pub struct ModelsCommand {
    /// Catalog endpoint (overrides config)
    #[arg(long, env = "DOCQA_CATALOG_URL")]
    pub url: Option<String>,

    /// Print the locally configured catalog without contacting the backend (wins over --url)
    #[arg(long)]
    pub local: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ModelsCommand {
    /// Execute the models command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing models command");

        let listing = self.listing(config).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&listing)?);
            return Ok(());
        }

        if let Some(ref error) = listing.error {
            eprintln!("warning: {}", error);
            if let Some(ref details) = listing.details {
                eprintln!("  {}", details);
            }
        }

        for provider in ProviderType::ALL {
            println!("{}:", provider);
            for model in listing.catalog.models_for(provider) {
                println!("  {}", model);
            }
        }

        Ok(())
    }

    async fn listing(&self, config: &AppConfig) -> AppResult<ModelListing> {
        let mut catalog_config = config.catalog.clone();
        if let Some(ref url) = self.url {
            catalog_config.url = Some(url.clone());
        }

        if self.local || catalog_config.url.is_none() {
            tracing::debug!("Using locally configured model catalog");
            return Ok(ModelListing::available(ModelCatalog::from_config(config)));
        }

        let resolver = ModelAvailabilityResolver::from_config(&catalog_config)?;
        tracing::debug!(
            "Fetching model catalog (max {} attempts)",
            resolver.policy().max_attempts()
        );
        Ok(resolver.list_models().await)
    }
}
