//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider could not be configured or built
    #[error("Provider error: {0}")]
    Provider(#[from] briefsmith_llm::LlmError),

    /// Document or template could not be read
    #[error(transparent)]
    Ingest(#[from] briefsmith_ingest::IngestError),

    /// Summarizer settings rejected
    #[error("Summarizer error: {0}")]
    Summarizer(#[from] briefsmith_summarizer::SummarizerError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
