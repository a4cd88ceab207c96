//! Briefsmith LLM Provider Layer
//!
//! Completion provider implementations behind the `CompletionProvider` trait
//! from `briefsmith-domain`.
//!
//! # Architecture
//!
//! Every provider exposes the same capability: measure a prompt against its
//! context window, and generate text for a prompt with an output token budget.
//! Remote providers are wrapped in [`Retrying`], which applies bounded
//! exponential backoff to rate-limit and transient failures.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic scripted provider for testing
//! - `OpenAiProvider`: OpenAI chat completions API
//! - `AzureProvider`: Azure OpenAI deployment
//! - `LocalProvider`: Locally hosted model (Ollama runtime, in-process tokenizer)
//!
//! # Examples
//!
//! ```
//! use briefsmith_llm::MockProvider;
//! use briefsmith_domain::traits::CompletionProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt", 100).await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

mod chat;
pub mod azure;
pub mod factory;
pub mod local;
pub mod openai;
pub mod retry;
pub mod tokenizer;

use async_trait::async_trait;
use briefsmith_domain::traits::{Classified, CompletionProvider};
use briefsmith_domain::FailureKind;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use azure::{AzureConfig, AzureProvider};
pub use factory::{Provider, ProviderConfig, ProviderKind};
pub use local::{LocalConfig, LocalProvider, ModelLease};
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use retry::{RetryPolicy, Retrying};
pub use tokenizer::CharTokenizer;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Credentials missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Request rejected as malformed or unacceptable
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Tokenizer failure
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Invalid provider configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Retry ceiling reached on a retryable failure
    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of calls made, including the first
        attempts: u32,
        /// The final failure
        last: Box<LlmError>,
    },

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl Classified for LlmError {
    fn kind(&self) -> FailureKind {
        match self {
            LlmError::RateLimitExceeded(_) => FailureKind::RateLimit,
            LlmError::Communication(_) | LlmError::InvalidResponse(_) | LlmError::Other(_) => {
                FailureKind::Transient
            }
            LlmError::Authentication(_)
            | LlmError::Rejected(_)
            | LlmError::ModelNotAvailable(_)
            | LlmError::Tokenizer(_)
            | LlmError::Config(_)
            | LlmError::RetriesExhausted { .. } => FailureKind::Fatal,
        }
    }
}

/// One scripted reply for [`MockProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Return this text
    Text(String),
    /// Fail with an error of this class
    Fail(FailureKind),
}

/// Mock LLM provider for deterministic testing
///
/// Returns scripted replies in call order, then falls back to a default
/// response (or an echo of the prompt length). No network calls are made.
/// Prompts are measured one unit per character.
///
/// # Examples
///
/// ```
/// use briefsmith_llm::{MockProvider, MockReply};
/// use briefsmith_domain::traits::CompletionProvider;
/// use briefsmith_domain::FailureKind;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let provider = MockProvider::new("fallback");
/// provider.push_text("first");
/// provider.push_reply(MockReply::Fail(FailureKind::Fatal));
///
/// assert_eq!(provider.generate("a", 10).await.unwrap(), "first");
/// assert!(provider.generate("b", 10).await.is_err());
/// assert_eq!(provider.generate("c", 10).await.unwrap(), "fallback");
/// assert_eq!(provider.call_count(), 3);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    echo: bool,
    context_window: usize,
    script: Arc<Mutex<VecDeque<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

/// Context window reported by mock providers unless overridden
pub const MOCK_CONTEXT_WINDOW: usize = 4096;

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            echo: false,
            context_window: MOCK_CONTEXT_WINDOW,
            script: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a provider whose reply is derived from the prompt
    ///
    /// The reply is deterministic: the prompt's character count followed by
    /// its last non-empty line.
    pub fn echo() -> Self {
        Self {
            echo: true,
            ..Self::new("")
        }
    }

    /// Set the context window reported to the chunking engine
    pub fn with_context_window(mut self, context_window: usize) -> Self {
        self.context_window = context_window;
        self
    }

    /// Queue a reply for the next unanswered call
    pub fn push_reply(&self, reply: MockReply) {
        self.script.lock().unwrap().push_back(reply);
    }

    /// Queue a text reply
    pub fn push_text(&self, text: impl Into<String>) {
        self.push_reply(MockReply::Text(text.into()));
    }

    /// Queue a failure
    pub fn push_failure(&self, kind: FailureKind) {
        self.push_reply(MockReply::Fail(kind));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.prompts.lock().unwrap().clear();
    }

    fn failure(kind: FailureKind) -> LlmError {
        match kind {
            FailureKind::RateLimit => LlmError::RateLimitExceeded("Mock rate limit".to_string()),
            FailureKind::Transient => LlmError::Communication("Mock transient error".to_string()),
            FailureKind::Fatal => LlmError::Authentication("Mock fatal error".to_string()),
        }
    }

    fn echo_reply(prompt: &str) -> String {
        let last_line = prompt
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("")
            .trim();
        format!("{} chars: {}", prompt.chars().count(), last_line)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    type Error = LlmError;

    fn context_window(&self) -> usize {
        self.context_window
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>, Self::Error> {
        Ok(CharTokenizer::new(1).encode(text))
    }

    fn decode(&self, units: &[u32]) -> Result<String, Self::Error> {
        Ok(CharTokenizer::new(1).decode(units))
    }

    async fn generate(&self, prompt: &str, _max_output_tokens: usize) -> Result<String, Self::Error> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let scripted = self.script.lock().unwrap().pop_front();
        match scripted {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(kind)) => Err(Self::failure(kind)),
            None if self.echo => Ok(Self::echo_reply(prompt)),
            None => Ok(self.default_response.clone()),
        }
    }
}
