//! OpenAI Provider Implementation
//!
//! Drafts text through the OpenAI chat completions API. Prompts are measured
//! with the character heuristic since no vocabulary is available locally.

use crate::chat::{send_chat, ChatRequest};
use crate::tokenizer::CharTokenizer;
use crate::LlmError;
use async_trait::async_trait;
use briefsmith_domain::traits::CompletionProvider;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::time::Duration;

/// Default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Default context window of the default model, in tokens
pub const DEFAULT_CONTEXT_WINDOW: usize = 8192;

/// Default timeout for one request
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings for [`OpenAiProvider`]
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiConfig {
    /// Secret API key
    pub api_key: String,
    /// Chat model name
    pub model: String,
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Model context window in tokens
    pub context_window: usize,
    /// Timeout for one HTTP request
    pub request_timeout_secs: u64,
}

impl OpenAiConfig {
    /// Default settings with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.7,
            context_window: DEFAULT_CONTEXT_WINDOW,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Check required fields
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::Config("OPENAI_API_KEY is not set".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::Config("OpenAI model name is empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(LlmError::Config("request_timeout_secs must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// OpenAI chat completions provider
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: reqwest::Client,
    tokenizer: CharTokenizer,
}

impl OpenAiProvider {
    /// Create a provider from validated settings
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| LlmError::Config("OpenAI API key contains invalid characters".to_string()))?,
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

    /// Model this provider drafts with
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
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
        let body = ChatRequest::user(
            Some(&self.config.model),
            prompt,
            self.config.temperature,
            max_output_tokens,
        );
        send_chat(self.client.post(self.url()), &body).await
    }
}
