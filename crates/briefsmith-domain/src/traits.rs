//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::summary::FailureKind;
use crate::{SectionTable, SourceDocument};
use async_trait::async_trait;
use std::path::Path;

/// Errors that know whether the failed call may be retried
pub trait Classified {
    /// Classification of this failure
    fn kind(&self) -> FailureKind;
}

/// Trait for text generation backends
///
/// Implemented by the infrastructure layer (briefsmith-llm). A provider owns
/// both its model and the vocabulary used to measure prompts against the
/// model's context window.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Error type for provider operations
    type Error: std::error::Error + Classified + Send + Sync + 'static;

    /// Maximum number of tokens one request may span (prompt plus output)
    fn context_window(&self) -> usize;

    /// Units produced by `encode` per model token
    ///
    /// Exact tokenizers return 1. Character heuristics return the assumed
    /// number of characters per token.
    fn units_per_token(&self) -> usize {
        1
    }

    /// Measure text as a sequence of units
    fn encode(&self, text: &str) -> Result<Vec<u32>, Self::Error>;

    /// Turn a slice of units back into text
    fn decode(&self, units: &[u32]) -> Result<String, Self::Error>;

    /// Generate at most `max_output_tokens` tokens of text for `prompt`
    async fn generate(&self, prompt: &str, max_output_tokens: usize)
        -> Result<String, Self::Error>;
}

/// Trait for turning a document file into plain text
///
/// Implemented by the ingest layer (briefsmith-ingest)
pub trait TextExtractor {
    /// Error type for extraction
    type Error;

    /// Extract the full text of the file at `path`
    fn extract(&self, path: &Path) -> Result<SourceDocument, Self::Error>;
}

/// Trait for reading section instructions out of a template
///
/// Implemented by the ingest layer (briefsmith-ingest)
pub trait TemplateSource {
    /// Error type for template reading
    type Error;

    /// Produce the ordered section table for the given canonical names
    fn sections(&self, canonical: &[String]) -> Result<SectionTable, Self::Error>;
}
