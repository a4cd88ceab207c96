//! Azure OpenAI Provider Implementation
//!
//! Drafts text through an Azure OpenAI chat deployment.

use crate::chat::{send_chat, ChatRequest};
use crate::tokenizer::CharTokenizer;
use crate::LlmError;
use async_trait::async_trait;
use briefsmith_domain::traits::CompletionProvider;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

/// Default REST API version
pub const DEFAULT_API_VERSION: &str = "2024-02-01";

/// Settings for [`AzureProvider`]
#[derive(Debug, Clone, PartialEq)]
pub struct AzureConfig {
    /// Secret API key
    pub api_key: String,
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,
    /// Deployment name
    pub deployment: String,
    /// REST API version
    pub api_version: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Deployment context window in tokens
    pub context_window: usize,
    /// Timeout for one HTTP request
    pub request_timeout_secs: u64,
}

impl AzureConfig {
    /// Default settings for a deployment
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            deployment: deployment.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            temperature: 0.7,
            context_window: crate::openai::DEFAULT_CONTEXT_WINDOW,
            request_timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Check required fields
    pub fn validate(&self) -> Result<(), LlmError> {
        let missing: Vec<&str> = [
            ("AZURE_OPENAI_API_KEY", &self.api_key),
            ("AZURE_OPENAI_ENDPOINT", &self.endpoint),
            ("AZURE_OPENAI_DEPLOYMENT_NAME", &self.deployment),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(LlmError::Config(format!(
                "Missing Azure OpenAI settings: {}",
                missing.join(", ")
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(LlmError::Config("request_timeout_secs must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Azure OpenAI deployment provider
pub struct AzureProvider {
    config: AzureConfig,
    client: reqwest::Client,
    tokenizer: CharTokenizer,
}

impl AzureProvider {
    /// Create a provider from validated settings
    pub fn new(config: AzureConfig) -> Result<Self, LlmError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "api-key",
            HeaderValue::from_str(config.api_key.trim())
                .map_err(|_| LlmError::Config("Azure API key contains invalid characters".to_string()))?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            tokenizer: CharTokenizer::default(),
        })
    }

    /// Deployment this provider drafts with
    pub fn deployment(&self) -> &str {
        &self.config.deployment
    }

    fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        )
    }
}

#[async_trait]
impl CompletionProvider for AzureProvider {
    type Error = LlmError;

    fn context_window(&self) -> usize {
        self.config.context_window
    }

    fn units_per_token(&self) -> usize {
        self.tokenizer.chars_per_token()
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>, Self::Error> {
        Ok(self.tokenizer.encode(text))
    }

    fn decode(&self, units: &[u32]) -> Result<String, Self::Error> {
        Ok(self.tokenizer.decode(units))
    }

    async fn generate(&self, prompt: &str, max_output_tokens: usize) -> Result<String, Self::Error> {
        // The deployment selects the model
        let body = ChatRequest::user(None, prompt, self.config.temperature, max_output_tokens);
        send_chat(self.client.post(self.url()), &body).await
    }
}
