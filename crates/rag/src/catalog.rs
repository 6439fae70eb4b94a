//! Model catalog and the availability resolver.
//!
//! The catalog maps provider identifiers to selectable model names. The
//! resolver fetches it from the backend, which may still be starting, so
//! failures are retried with exponential backoff and finally replaced by a
//! fallback catalog instead of being returned as errors.

use docqa_core::config::{AppConfig, CatalogConfig};
use docqa_core::{AppError, AppResult, RetryPolicy};
use docqa_llm::ProviderType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

/// Provider identifier to ordered model names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCatalog(BTreeMap<String, Vec<String>>);

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// One default model per supported provider.
    pub fn fallback() -> Self {
        let mut catalog = Self::new();
        for provider in ProviderType::ALL {
            catalog.insert(provider.as_str(), vec![provider.default_model().to_string()]);
        }
        catalog
    }

    /// Catalog advertised by this installation: the configured models per
    /// provider, or the provider default when none are configured.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut catalog = Self::new();
        for provider in ProviderType::ALL {
            let configured = config.provider_config(provider.as_str()).models;
            let models = if configured.is_empty() {
                vec![provider.default_model().to_string()]
            } else {
                configured
            };
            catalog.insert(provider.as_str(), models);
        }
        catalog
    }

    pub fn insert(&mut self, provider: impl Into<String>, models: Vec<String>) {
        self.0.insert(provider.into(), models);
    }

    /// Models listed for `provider`, if any.
    pub fn get(&self, provider: &str) -> Option<&[String]> {
        self.0.get(provider).map(Vec::as_slice)
    }

    /// Models for `provider`, never empty: a missing or empty entry yields
    /// the provider's default model.
    pub fn models_for(&self, provider: ProviderType) -> Vec<String> {
        match self.get(provider.as_str()) {
            Some(models) if !models.is_empty() => models.to_vec(),
            _ => vec![provider.default_model().to_string()],
        }
    }

    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of [`ModelAvailabilityResolver::list_models`].
///
/// Serializes as the catalog object, plus `error` and `details` keys when
/// the fallback catalog was substituted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelListing {
    #[serde(flatten)]
    pub catalog: ModelCatalog,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ModelListing {
    pub fn available(catalog: ModelCatalog) -> Self {
        Self {
            catalog,
            error: None,
            details: None,
        }
    }

    /// Fallback catalog with the failure description attached.
    pub fn degraded(attempts: u32, last_error: &AppError) -> Self {
        Self {
            catalog: ModelCatalog::fallback(),
            error: Some(format!(
                "Could not load available models after {} attempts; using defaults",
                attempts
            )),
            details: Some(last_error.to_string()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Where the remote catalog comes from.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the catalog once.
    async fn fetch(&self) -> AppResult<ModelCatalog>;
}

/// Fetches the catalog with `GET <url>`.
///
/// Transport errors, timeouts, non-2xx statuses and undecodable bodies all
/// count as failures.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    url: String,
    client: reqwest::Client,
}

impl HttpCatalogSource {
    /// Create a source with a per-call `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> AppResult<ModelCatalog> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::Catalog(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Catalog(format!(
                "{} returned status {}",
                self.url, status
            )));
        }

        response
            .json::<ModelCatalog>()
            .await
            .map_err(|e| AppError::Catalog(format!("Invalid catalog from {}: {}", self.url, e)))
    }
}

/// Lists available models, tolerating a backend that is not ready yet.
pub struct ModelAvailabilityResolver<S> {
    source: S,
    policy: RetryPolicy,
}

impl ModelAvailabilityResolver<HttpCatalogSource> {
    /// HTTP resolver from catalog settings. Requires `catalog.url`.
    pub fn from_config(catalog: &CatalogConfig) -> AppResult<Self> {
        let url = catalog
            .url
            .as_deref()
            .ok_or_else(|| AppError::Config("No model catalog URL configured".to_string()))?;
        let source = HttpCatalogSource::new(url, catalog.timeout())?;
        Ok(Self::new(source, catalog.retry_policy()))
    }
}

impl<S: CatalogSource> ModelAvailabilityResolver<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetch the catalog, retrying with backoff. Never fails: once the
    /// attempt budget is spent the fallback catalog is returned with an
    /// error description.
    pub async fn list_models(&self) -> ModelListing {
        self.list_models_with_sleep(tokio::time::sleep).await
    }

    /// Same as [`Self::list_models`] with a caller-supplied sleep function.
    pub async fn list_models_with_sleep<F, Fut>(&self, sleep: F) -> ModelListing
    where
        F: FnMut(Duration) -> Fut,
        Fut: Future<Output = ()>,
    {
        match self
            .policy
            .run_with_sleep(|_| self.source.fetch(), sleep)
            .await
        {
            Ok(catalog) => {
                tracing::debug!("Loaded model catalog for {} providers", catalog.0.len());
                ModelListing::available(catalog)
            }
            Err(exhausted) => {
                tracing::error!(
                    "Model catalog unavailable after {} attempts, using fallback: {}",
                    exhausted.attempts,
                    exhausted.last_error
                );
                ModelListing::degraded(exhausted.attempts, &exhausted.last_error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::config::ProviderConfig;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Fails until `succeed_on` calls have been made (never if `None`).
    struct FlakySource {
        calls: AtomicU32,
        succeed_on: Option<u32>,
    }

    impl FlakySource {
        fn new(succeed_on: Option<u32>) -> Self {
            Self {
                calls: AtomicU32::new(0),
                succeed_on,
            }
        }
    }

    #[async_trait::async_trait]
    impl CatalogSource for FlakySource {
        async fn fetch(&self) -> AppResult<ModelCatalog> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            match self.succeed_on {
                Some(n) if call >= n => {
                    let mut catalog = ModelCatalog::new();
                    catalog.insert("openai", vec!["gpt-4o".to_string(), "gpt-4.1-mini".to_string()]);
                    Ok(catalog)
                }
                _ => Err(AppError::Catalog(format!("connection refused (call {})", call))),
            }
        }
    }

    fn recording_sleep() -> (
        Arc<Mutex<Vec<Duration>>>,
        impl FnMut(Duration) -> std::future::Ready<()>,
    ) {
        let delays = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&delays);
        (delays, move |d: Duration| {
            sink.lock().unwrap().push(d);
            std::future::ready(())
        })
    }

    #[test]
    fn test_fallback_catalog() {
        let catalog = ModelCatalog::fallback();
        assert_eq!(catalog.get("openai"), Some(&["gpt-4.1-mini".to_string()][..]));
        assert_eq!(
            catalog.get("gemini"),
            Some(&["gemini-2.0-flash-lite".to_string()][..])
        );
        assert_eq!(catalog.providers().count(), 2);
    }

    #[test]
    fn test_models_for_missing_provider_uses_default() {
        let mut catalog = ModelCatalog::new();
        catalog.insert("openai", vec!["gpt-4o".to_string()]);
        catalog.insert("gemini", Vec::new());

        assert_eq!(catalog.models_for(ProviderType::OpenAI), vec!["gpt-4o"]);
        assert_eq!(
            catalog.models_for(ProviderType::Gemini),
            vec!["gemini-2.0-flash-lite"]
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.providers.insert(
            "gemini".to_string(),
            ProviderConfig {
                models: vec!["gemini-2.5-flash".to_string(), "gemini-2.0-flash-lite".to_string()],
                ..ProviderConfig::default()
            },
        );

        let catalog = ModelCatalog::from_config(&config);
        assert_eq!(catalog.models_for(ProviderType::OpenAI), vec!["gpt-4.1-mini"]);
        assert_eq!(catalog.get("gemini").map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_catalog_deserializes_unknown_providers() {
        let catalog: ModelCatalog =
            serde_json::from_str(r#"{"openai": ["gpt-4o"], "mistral": ["large"]}"#).unwrap();
        assert_eq!(catalog.get("mistral"), Some(&["large".to_string()][..]));
    }

    #[test]
    fn test_degraded_listing_serialization() {
        let listing = ModelListing::degraded(8, &AppError::Catalog("timed out".to_string()));
        let json = serde_json::to_value(&listing).unwrap();

        assert!(json["error"].as_str().unwrap().contains("8 attempts"));
        assert_eq!(json["details"], "Catalog error: timed out");
        assert_eq!(json["openai"][0], "gpt-4.1-mini");
        assert_eq!(json["gemini"][0], "gemini-2.0-flash-lite");
    }

    #[test]
    fn test_available_listing_has_no_error_keys() {
        let json = serde_json::to_value(ModelListing::available(ModelCatalog::fallback())).unwrap();
        assert!(json.get("error").is_none());
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_permanent_failure_exhausts_budget_and_falls_back() {
        let resolver = ModelAvailabilityResolver::new(
            FlakySource::new(None),
            RetryPolicy::new(8, Duration::from_millis(500)),
        );
        let (delays, sleep) = recording_sleep();

        let listing = resolver.list_models_with_sleep(sleep).await;

        assert_eq!(resolver.source.calls.load(Ordering::SeqCst), 8);
        assert!(listing.is_degraded());
        assert!(listing.details.as_deref().unwrap().contains("call 8"));
        assert_eq!(listing.catalog, ModelCatalog::fallback());

        let delays = delays.lock().unwrap();
        assert_eq!(delays.len(), 7);
        assert_eq!(delays[0], Duration::from_millis(500));
        for pair in delays.windows(2) {
            assert_eq!(pair[1], pair[0] * 2);
        }
    }

    #[tokio::test]
    async fn test_recovers_when_backend_comes_up() {
        let resolver = ModelAvailabilityResolver::new(
            FlakySource::new(Some(3)),
            RetryPolicy::new(8, Duration::from_millis(1)),
        );
        let (delays, sleep) = recording_sleep();

        let listing = resolver.list_models_with_sleep(sleep).await;

        assert!(!listing.is_degraded());
        assert_eq!(
            listing.catalog.models_for(ProviderType::OpenAI),
            vec!["gpt-4o", "gpt-4.1-mini"]
        );
        assert_eq!(delays.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_http_source_degrades() {
        let source =
            HttpCatalogSource::new("http://127.0.0.1:9/models", Duration::from_millis(200)).unwrap();
        let resolver =
            ModelAvailabilityResolver::new(source, RetryPolicy::new(2, Duration::from_millis(1)));

        let listing = resolver.list_models().await;
        assert!(listing.is_degraded());
        assert_eq!(listing.catalog, ModelCatalog::fallback());
    }

    /// Local catalog endpoint answering every connection with `response`, or
    /// holding it open without answering when `None`. Returns the URL and
    /// a connection counter.
    async fn serve(response: Option<&'static str>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/models", listener.local_addr().unwrap());
        let connections = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&connections);

        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((mut stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let Some(response) = response else {
                    held.push(stream);
                    continue;
                };
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf).await;
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (url, connections)
    }

    async fn list_from(url: &str, timeout: Duration) -> ModelListing {
        let source = HttpCatalogSource::new(url, timeout).unwrap();
        let resolver =
            ModelAvailabilityResolver::new(source, RetryPolicy::new(3, Duration::from_millis(1)));
        resolver.list_models().await
    }

    #[tokio::test]
    async fn test_http_error_status_counts_as_failure() {
        let (url, connections) = serve(Some(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        ))
        .await;

        let listing = list_from(&url, Duration::from_secs(2)).await;

        assert!(listing.is_degraded());
        assert!(listing.details.as_deref().unwrap().contains("503"));
        assert_eq!(listing.catalog, ModelCatalog::fallback());
        assert_eq!(connections.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_http_timeout_counts_as_failure() {
        let (url, connections) = serve(None).await;

        let listing = list_from(&url, Duration::from_millis(100)).await;

        assert!(listing.is_degraded());
        assert_eq!(listing.catalog, ModelCatalog::fallback());
        assert_eq!(connections.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_http_undecodable_body_counts_as_failure() {
        let (url, connections) = serve(Some(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot json!",
        ))
        .await;

        let listing = list_from(&url, Duration::from_secs(2)).await;

        assert!(listing.is_degraded());
        assert!(listing.details.as_deref().unwrap().contains("Invalid catalog"));
        assert_eq!(connections.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_http_catalog_is_decoded() {
        let (url, connections) = serve(Some(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 22\r\nConnection: close\r\n\r\n{\"openai\": [\"gpt-4o\"]}",
        ))
        .await;

        let listing = list_from(&url, Duration::from_secs(2)).await;

        assert!(!listing.is_degraded());
        assert_eq!(listing.catalog.models_for(ProviderType::OpenAI), vec!["gpt-4o"]);
        assert_eq!(connections.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_from_config_requires_url() {
        let result = ModelAvailabilityResolver::from_config(&CatalogConfig::default());
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
