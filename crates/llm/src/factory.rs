//! Provider resolution.
//!
//! This is the single place where a provider identifier turns into a
//! concrete client. Everything downstream works with `Arc<dyn LlmClient>`.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, OpenAiClient};
use crate::types::ProviderType;
use docqa_core::config::ProviderConfig;
use docqa_core::{AppError, AppResult};
use std::sync::Arc;

/// Resolve a provider identifier to a configured client.
///
/// Reads the provider's API key from the environment variable named in
/// `settings` (or the provider default) at construction time.
///
/// # Errors
/// Returns `AppError::Config` if:
/// - `provider_id` is not `openai` or `gemini`
/// - the API key variable is unset or empty
pub fn resolve(
    provider_id: &str,
    model: Option<&str>,
    settings: &ProviderConfig,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider: ProviderType = provider_id.parse()?;

    let key_env = settings
        .api_key_env
        .as_deref()
        .unwrap_or_else(|| provider.default_api_key_env());
    let api_key = std::env::var(key_env).ok();

    create_client(
        provider,
        model,
        settings.endpoint.as_deref(),
        api_key.as_deref(),
    )
    .map_err(|e| match e {
        AppError::Config(msg) => AppError::Config(format!("{} (set {})", msg, key_env)),
        other => other,
    })
}

/// Create a client for a known provider.
///
/// # Arguments
/// * `provider` - Provider to construct
/// * `model` - Model override; the provider default is used when `None` or empty
/// * `endpoint` - Optional base URL override
/// * `api_key` - API key for the provider
pub fn create_client(
    provider: ProviderType,
    model: Option<&str>,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    let api_key = api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("{} provider requires an API key", provider)))?;

    let model = model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| provider.default_model());
    let endpoint = endpoint.unwrap_or_else(|| provider.default_endpoint());

    tracing::debug!("Resolved provider {} with model {}", provider, model);

    let client: Arc<dyn LlmClient> = match provider {
        ProviderType::OpenAI => Arc::new(OpenAiClient::with_base_url(api_key, model, endpoint)),
        ProviderType::Gemini => Arc::new(GeminiClient::with_base_url(api_key, model, endpoint)),
    };

    Ok(client)
}
