//! Local Provider Implementation
//!
//! Drafts text with a locally hosted model served by an Ollama runtime, while
//! measuring prompts with the model's own vocabulary loaded in process.
//!
//! # Resource lifetime
//!
//! The tokenizer lives exactly as long as the provider. The model weights are
//! held by the runtime; by default every request asks the runtime to unload
//! them once the response is produced (`keep_alive = 0`), and the
//! [`ModelLease`] owned by the provider unloads them on drop, so the model is
//! released on every exit path including errors and panics.
//!
//! # Examples
//!
//! ```no_run
//! use briefsmith_llm::{LocalConfig, LocalProvider};
//!
//! let config = LocalConfig::new("mistral:7b-instruct", "models/tokenizer.json");
//! let provider = LocalProvider::load(config).unwrap();
//! // The model is released when `provider` goes out of scope
//! ```

use crate::chat::classify_status;
use crate::LlmError;
use async_trait::async_trait;
use briefsmith_domain::traits::CompletionProvider;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tokenizers::Tokenizer;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default context window (`n_ctx`) in tokens
pub const DEFAULT_CONTEXT_WINDOW: usize = 2048;

/// Default timeout for one inference request (local inference is slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Timeout for the unload request sent on drop
const UNLOAD_TIMEOUT_SECS: u64 = 10;

/// Settings for [`LocalProvider`]
#[derive(Debug, Clone, PartialEq)]
pub struct LocalConfig {
    /// Runtime endpoint
    pub endpoint: String,
    /// Model name known to the runtime
    pub model: String,
    /// Path to the model's `tokenizer.json`
    pub tokenizer_path: PathBuf,
    /// Context window the model is loaded with
    pub n_ctx: usize,
    /// Sampling temperature
    pub temperature: f32,
    /// Timeout for one inference request
    pub request_timeout_secs: u64,
    /// Unload the model after every request instead of keeping it resident
    pub unload_after_each_call: bool,
}

impl LocalConfig {
    /// Default settings for a model and tokenizer file
    pub fn new(model: impl Into<String>, tokenizer_path: impl Into<PathBuf>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            tokenizer_path: tokenizer_path.into(),
            n_ctx: DEFAULT_CONTEXT_WINDOW,
            temperature: 0.7,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            unload_after_each_call: true,
        }
    }

    /// Check required fields and that the tokenizer file exists
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.model.trim().is_empty() {
            return Err(LlmError::Config("Local model name is empty".to_string()));
        }
        if !self.tokenizer_path.is_file() {
            return Err(LlmError::Config(format!(
                "Local model tokenizer not found at '{}'",
                self.tokenizer_path.display()
            )));
        }
        if self.n_ctx == 0 {
            return Err(LlmError::Config("n_ctx must be greater than 0".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(LlmError::Config("request_timeout_secs must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Request body for the runtime chat API
#[derive(Serialize)]
struct LocalChatRequest<'a> {
    model: &'a str,
    messages: Vec<LocalMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<i64>,
    options: LocalOptions,
}

#[derive(Serialize)]
struct LocalMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct LocalOptions {
    num_ctx: usize,
    num_predict: usize,
    temperature: f32,
}

/// Response from the runtime chat API
#[derive(Deserialize)]
struct LocalChatResponse {
    message: LocalReply,
    #[allow(dead_code)]
    done: bool,
}

#[derive(Deserialize)]
struct LocalReply {
    content: String,
}

/// Unload request: a generate call with no prompt and zero keep-alive
#[derive(Serialize)]
struct UnloadRequest {
    model: String,
    keep_alive: i64,
}

/// Holds a model loaded in the runtime and unloads it when dropped
pub struct ModelLease {
    endpoint: String,
    model: String,
}

impl ModelLease {
    /// Lease `model` on the runtime at `endpoint`
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Model held by this lease
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Drop for ModelLease {
    fn drop(&mut self) {
        let url = format!("{}/api/generate", self.endpoint.trim_end_matches('/'));
        let body = UnloadRequest {
            model: self.model.clone(),
            keep_alive: 0,
        };

        // A fresh thread keeps the blocking client off any async runtime
        let unload = std::thread::spawn(move || -> Result<(), String> {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(UNLOAD_TIMEOUT_SECS))
                .build()
                .map_err(|e| e.to_string())?;
            let response = client.post(&url).json(&body).send().map_err(|e| e.to_string())?;
            if response.status().is_success() {
                Ok(())
            } else {
                Err(format!("HTTP {}", response.status()))
            }
        });

        match unload.join() {
            Ok(Ok(())) => debug!("Released local model '{}'", self.model),
            Ok(Err(e)) => warn!("Failed to release local model '{}': {}", self.model, e),
            Err(_) => warn!("Release of local model '{}' panicked", self.model),
        }
    }
}

/// Locally hosted model provider
pub struct LocalProvider {
    config: LocalConfig,
    client: reqwest::Client,
    tokenizer: Tokenizer,
    lease: ModelLease,
}

impl LocalProvider {
    /// Load the model's vocabulary and lease the model
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] if settings are invalid or the tokenizer
    /// file is missing, and [`LlmError::Tokenizer`] if it cannot be parsed.
    pub fn load(config: LocalConfig) -> Result<Self, LlmError> {
        config.validate()?;

        let tokenizer = Tokenizer::from_file(&config.tokenizer_path)
            .map_err(|e| LlmError::Tokenizer(format!("Tokenizer load failed: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let lease = ModelLease::new(config.endpoint.clone(), config.model.clone());

        Ok(Self {
            config,
            client,
            tokenizer,
            lease,
        })
    }

    /// Model this provider drafts with
    pub fn model(&self) -> &str {
        self.lease.model()
    }

    fn keep_alive(&self) -> Option<i64> {
        self.config.unload_after_each_call.then_some(0)
    }
}

#[async_trait]
impl CompletionProvider for LocalProvider {
    type Error = LlmError;

    fn context_window(&self) -> usize {
        self.config.n_ctx
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>, Self::Error> {
        self.tokenizer
            .encode(text, false)
            .map(|encoding| encoding.get_ids().to_vec())
            .map_err(|e| LlmError::Tokenizer(format!("Encoding failed: {}", e)))
    }

    fn decode(&self, units: &[u32]) -> Result<String, Self::Error> {
        self.tokenizer
            .decode(units, true)
            .map_err(|e| LlmError::Tokenizer(format!("Decoding failed: {}", e)))
    }

    async fn generate(&self, prompt: &str, max_output_tokens: usize) -> Result<String, Self::Error> {
        let url = format!("{}/api/chat", self.config.endpoint.trim_end_matches('/'));

        let request_body = LocalChatRequest {
            model: &self.config.model,
            messages: vec![LocalMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            keep_alive: self.keep_alive(),
            options: LocalOptions {
                num_ctx: self.config.n_ctx,
                num_predict: max_output_tokens,
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.config.model.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_status(status, &error_text));
        }

        let local_response = response
            .json::<LocalChatResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(local_response.message.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Minimal word-level tokenizer definition
    const TOKENIZER_JSON: &str = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": { "[UNK]": 0, "write": 1, "the": 2, "pitch": 3, "section": 4 },
            "unk_token": "[UNK]"
        }
    }"#;

    fn tokenizer_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TOKENIZER_JSON.as_bytes()).unwrap();
        file
    }

    fn unreachable_config(path: &std::path::Path) -> LocalConfig {
        let mut config = LocalConfig::new("mistral", path);
        config.endpoint = "http://127.0.0.1:9".to_string();
        config.request_timeout_secs = 5;
        config
    }

    #[test]
    fn test_missing_tokenizer_is_config_error() {
        let result = LocalProvider::load(LocalConfig::new("mistral", "/nonexistent/tokenizer.json"));
        assert!(matches!(result, Err(LlmError::Config(_))));
    }

    #[test]
    fn test_empty_model_rejected() {
        let file = tokenizer_file();
        let config = LocalConfig::new(" ", file.path());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_encode_uses_model_vocabulary() {
        let file = tokenizer_file();
        let provider = LocalProvider::load(unreachable_config(file.path())).unwrap();

        let ids = provider.encode("write the pitch section").unwrap();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(provider.context_window(), DEFAULT_CONTEXT_WINDOW);
        assert_eq!(provider.units_per_token(), 1);

        let text = provider.decode(&ids[2..]).unwrap();
        assert!(text.contains("pitch"));
        assert!(text.contains("section"));
    }

    #[test]
    fn test_keep_alive_follows_unload_setting() {
        let file = tokenizer_file();
        let mut config = unreachable_config(file.path());
        let provider = LocalProvider::load(config.clone()).unwrap();
        assert_eq!(provider.keep_alive(), Some(0));

        config.unload_after_each_call = false;
        let provider = LocalProvider::load(config).unwrap();
        assert_eq!(provider.keep_alive(), None);
    }

    #[test]
    fn test_lease_drop_tolerates_unreachable_runtime() {
        let lease = ModelLease::new("http://127.0.0.1:9", "mistral");
        assert_eq!(lease.model(), "mistral");
        drop(lease);
    }

    #[tokio::test]
    async fn test_local_error_handling() {
        let file = tokenizer_file();
        let provider = LocalProvider::load(unreachable_config(file.path())).unwrap();

        let result = provider.generate("test", 10).await;
        match result {
            Err(LlmError::Communication(_)) => {} // Expected
            _ => panic!("Expected Communication error"),
        }
    }

    // Integration tests (requires running Ollama)
    #[tokio::test]
    #[ignore] // Only run when Ollama is available
    async fn test_local_generate_integration() {
        let file = tokenizer_file();
        let provider = LocalProvider::load(LocalConfig::new("mistral", file.path())).unwrap();
        let result = provider.generate("Say 'hello' and nothing else", 20).await;

        if let Ok(response) = result {
            assert!(!response.is_empty());
        }
    }
}
