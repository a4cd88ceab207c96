//! Error types for summarization

use thiserror::Error;

/// Errors that can occur while summarizing a section
///
/// Chunk-level provider failures are not errors: they become empty (or
/// marked) contributions to the section text.
#[derive(Error, Debug)]
pub enum SummarizerError {
    /// Settings cannot work with the provider
    #[error("Configuration error: {0}")]
    Config(String),

    /// The rendered prompt could not be measured
    #[error("Tokenization error: {0}")]
    Tokenization(String),
}
