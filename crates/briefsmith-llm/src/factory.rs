//! Provider selection
//!
//! One [`ProviderConfig`] is resolved at startup; [`Provider::from_config`]
//! turns it into the matching variant. Adding a backend means adding a
//! variant here, nowhere else.

use crate::azure::{AzureConfig, AzureProvider};
use crate::local::{LocalConfig, LocalProvider};
use crate::openai::{OpenAiConfig, OpenAiProvider};
use crate::retry::{RetryPolicy, Retrying};
use crate::LlmError;
use async_trait::async_trait;
use briefsmith_domain::traits::CompletionProvider;
use std::fmt;
use std::str::FromStr;

/// Which backend drafts the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// OpenAI chat completions
    OpenAi,
    /// Azure OpenAI deployment
    Azure,
    /// Locally hosted model
    Local,
}

impl ProviderKind {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Azure => "azure",
            ProviderKind::Local => "local",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "azure" => Ok(ProviderKind::Azure),
            "local" | "llama" => Ok(ProviderKind::Local),
            other => Err(LlmError::Config(format!(
                "Unsupported model type: {}. Choose from 'openai', 'azure', or 'local'.",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved settings for exactly one provider
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderConfig {
    /// OpenAI settings
    OpenAi(OpenAiConfig),
    /// Azure OpenAI settings
    Azure(AzureConfig),
    /// Local model settings
    Local(LocalConfig),
}

impl ProviderConfig {
    /// The selected backend
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderConfig::OpenAi(_) => ProviderKind::OpenAi,
            ProviderConfig::Azure(_) => ProviderKind::Azure,
            ProviderConfig::Local(_) => ProviderKind::Local,
        }
    }

    /// Validate credentials and paths without contacting the backend
    pub fn validate(&self) -> Result<(), LlmError> {
        match self {
            ProviderConfig::OpenAi(config) => config.validate(),
            ProviderConfig::Azure(config) => config.validate(),
            ProviderConfig::Local(config) => config.validate(),
        }
    }

    /// Context window the selected backend reports
    pub fn context_window(&self) -> usize {
        match self {
            ProviderConfig::OpenAi(config) => config.context_window,
            ProviderConfig::Azure(config) => config.context_window,
            ProviderConfig::Local(config) => config.n_ctx,
        }
    }
}

/// The selected completion provider
///
/// Remote variants retry per the [`RetryPolicy`]; the local variant fails
/// fast, since its failures are not rate limits.
pub enum Provider {
    /// OpenAI with backoff
    OpenAi(Retrying<OpenAiProvider>),
    /// Azure OpenAI with backoff
    Azure(Retrying<AzureProvider>),
    /// Local model
    Local(LocalProvider),
}

impl Provider {
    /// Build the provider described by `config`
    pub fn from_config(config: &ProviderConfig, retry: RetryPolicy) -> Result<Self, LlmError> {
        let provider = match config {
            ProviderConfig::OpenAi(c) => {
                Provider::OpenAi(Retrying::new(OpenAiProvider::new(c.clone())?, retry))
            }
            ProviderConfig::Azure(c) => {
                Provider::Azure(Retrying::new(AzureProvider::new(c.clone())?, retry))
            }
            ProviderConfig::Local(c) => Provider::Local(LocalProvider::load(c.clone())?),
        };
        Ok(provider)
    }

    /// The backend of this provider
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::OpenAi(_) => ProviderKind::OpenAi,
            Provider::Azure(_) => ProviderKind::Azure,
            Provider::Local(_) => ProviderKind::Local,
        }
    }
}

#[async_trait]
impl CompletionProvider for Provider {
    type Error = LlmError;

    fn context_window(&self) -> usize {
        match self {
            Provider::OpenAi(p) => p.context_window(),
            Provider::Azure(p) => p.context_window(),
            Provider::Local(p) => p.context_window(),
        }
    }

    fn units_per_token(&self) -> usize {
        match self {
            Provider::OpenAi(p) => p.units_per_token(),
            Provider::Azure(p) => p.units_per_token(),
            Provider::Local(p) => p.units_per_token(),
        }
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>, Self::Error> {
        match self {
            Provider::OpenAi(p) => p.encode(text),
            Provider::Azure(p) => p.encode(text),
            Provider::Local(p) => p.encode(text),
        }
    }

    fn decode(&self, units: &[u32]) -> Result<String, Self::Error> {
        match self {
            Provider::OpenAi(p) => p.decode(units),
            Provider::Azure(p) => p.decode(units),
            Provider::Local(p) => p.decode(units),
        }
    }

    async fn generate(&self, prompt: &str, max_output_tokens: usize) -> Result<String, Self::Error> {
        match self {
            Provider::OpenAi(p) => p.generate(prompt, max_output_tokens).await,
            Provider::Azure(p) => p.generate(prompt, max_output_tokens).await,
            Provider::Local(p) => p.generate(prompt, max_output_tokens).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(" Azure ".parse::<ProviderKind>().unwrap(), ProviderKind::Azure);
        assert_eq!("llama".parse::<ProviderKind>().unwrap(), ProviderKind::Local);
        assert_eq!("local".parse::<ProviderKind>().unwrap(), ProviderKind::Local);
        assert!(matches!(
            "claude".parse::<ProviderKind>(),
            Err(LlmError::Config(_))
        ));
    }

    #[test]
    fn test_builds_openai_with_retry() {
        let config = ProviderConfig::OpenAi(OpenAiConfig::new("sk-test"));
        let provider = Provider::from_config(&config, RetryPolicy::default()).unwrap();

        assert_eq!(provider.kind(), ProviderKind::OpenAi);
        assert_eq!(provider.context_window(), config.context_window());
        assert_eq!(provider.units_per_token(), 4);
        match provider {
            Provider::OpenAi(p) => assert_eq!(p.policy().max_retries(), 5),
            _ => panic!("Expected OpenAI provider"),
        }
    }

    #[test]
    fn test_builds_azure() {
        let config = ProviderConfig::Azure(AzureConfig::new("key", "https://x.openai.azure.com", "dep"));
        let provider = Provider::from_config(&config, RetryPolicy::none()).unwrap();
        assert_eq!(provider.kind(), ProviderKind::Azure);
    }

    #[test]
    fn test_invalid_config_fails_before_use() {
        let config = ProviderConfig::Local(LocalConfig::new("mistral", "/missing/tokenizer.json"));
        assert!(config.validate().is_err());
        assert!(matches!(
            Provider::from_config(&config, RetryPolicy::default()),
            Err(LlmError::Config(_))
        ));
    }

    #[test]
    fn test_config_kind() {
        let config = ProviderConfig::OpenAi(OpenAiConfig::new("sk"));
        assert_eq!(config.kind(), ProviderKind::OpenAi);
        assert_eq!(config.kind().to_string(), "openai");
    }
}
