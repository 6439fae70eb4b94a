//! Provider identifiers and their defaults.

use docqa_core::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sampling temperature used for every completion.
pub const DETERMINISTIC_TEMPERATURE: f32 = 0.0;

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    Gemini,
}

impl ProviderType {
    /// All providers, in display order.
    pub const ALL: [ProviderType; 2] = [ProviderType::OpenAI, ProviderType::Gemini];

    /// Parse a provider identifier. Matching is exact.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "openai" => Some(Self::OpenAI),
            "gemini" => Some(Self::Gemini),
            _ => None,
        }
    }

    /// Canonical provider identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Gemini => "gemini",
        }
    }

    /// Model used when the caller does not override it.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-4.1-mini",
            Self::Gemini => "gemini-2.0-flash-lite",
        }
    }

    /// Environment variable holding the API key unless configured otherwise.
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Gemini => "GOOGLE_API_KEY",
        }
    }

    /// Base URL of the provider API.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            AppError::Config(format!(
                "Unsupported LLM provider: {}. Supported: {}",
                s,
                Self::ALL.map(|p| p.as_str()).join(", ")
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_parsing() {
        assert_eq!(ProviderType::parse("openai"), Some(ProviderType::OpenAI));
        assert_eq!(ProviderType::parse("gemini"), Some(ProviderType::Gemini));
        assert_eq!(ProviderType::parse("anthropic"), None);
        assert_eq!(ProviderType::parse("OpenAI"), None);
        assert_eq!(ProviderType::parse(""), None);
    }

    #[test]
    fn test_from_str_names_invalid_provider() {
        let err = "anthropic".parse::<ProviderType>().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("anthropic"));
        assert!(err.to_string().contains("openai, gemini"));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ProviderType::OpenAI.default_model(), "gpt-4.1-mini");
        assert_eq!(ProviderType::Gemini.default_model(), "gemini-2.0-flash-lite");
        assert_eq!(ProviderType::Gemini.default_api_key_env(), "GOOGLE_API_KEY");
    }

    #[test]
    fn test_round_trips_through_display() {
        for provider in ProviderType::ALL {
            assert_eq!(provider.to_string().parse::<ProviderType>().unwrap(), provider);
        }
    }
}
