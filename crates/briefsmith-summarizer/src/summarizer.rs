//! Chunked section drafting

use crate::chunking::chunk_prompt;
use crate::config::SummarizerConfig;
use crate::error::SummarizerError;
use crate::prompt::PromptBuilder;
use briefsmith_domain::traits::{Classified, CompletionProvider};
use briefsmith_domain::{CompletionResult, FailureKind, PromptChunk, SectionSummary};
use tracing::{debug, error, info, warn};

/// Drafts one section at a time against a single provider
///
/// The rendered prompt (instruction plus document) is split into chunks that
/// fit the provider's context window after reserving the output budget. Each
/// chunk is sent in order and the trimmed outputs are joined by newlines. A
/// failed chunk contributes the configured placeholder and never aborts the
/// section.
pub struct SectionSummarizer<'a, P: ?Sized> {
    provider: &'a P,
    config: SummarizerConfig,
    max_input_units: usize,
}

impl<'a, P> SectionSummarizer<'a, P>
where
    P: CompletionProvider + ?Sized,
{
    /// Create a summarizer, checking the output budget against the context window
    pub fn new(provider: &'a P, config: SummarizerConfig) -> Result<Self, SummarizerError> {
        let max_input_units =
            config.max_input_units(provider.context_window(), provider.units_per_token())?;
        Ok(Self {
            provider,
            config,
            max_input_units,
        })
    }

    /// Units of rendered prompt sent per completion call
    pub fn max_input_units(&self) -> usize {
        self.max_input_units
    }

    /// The active configuration
    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    /// Draft the section `title` from `document_text`
    ///
    /// Only failing to measure the rendered prompt is an error; provider
    /// failures are absorbed per chunk.
    pub async fn summarize_section(
        &self,
        document_text: &str,
        title: &str,
        instruction: &str,
    ) -> Result<SectionSummary, SummarizerError> {
        let prompt = PromptBuilder::new(title, instruction, document_text).build();
        let chunks = chunk_prompt(self.provider, &prompt, self.max_input_units)?;
        let total = chunks.len();

        let mut results = Vec::with_capacity(total);
        for chunk in &chunks {
            results.push(self.complete_chunk(title, chunk, total).await);
        }

        let summary = SectionSummary::merge(title, &results);
        if summary.failed_chunks > 0 {
            warn!(
                "Section '{}': {} of {} chunk(s) failed",
                title, summary.failed_chunks, summary.chunk_count
            );
        }
        info!(
            "Section '{}' drafted from {} chunk(s), {} chars",
            title,
            summary.chunk_count,
            summary.text.len()
        );
        Ok(summary)
    }

    async fn complete_chunk(&self, title: &str, chunk: &PromptChunk, total: usize) -> CompletionResult {
        debug!(
            "Section '{}': sending chunk {}/{} ({} units)",
            title,
            chunk.index + 1,
            total,
            chunk.len()
        );

        let text = match self.provider.decode(&chunk.tokens) {
            Ok(text) => text,
            Err(e) => return self.failed(title, chunk.index, e.kind(), e.to_string()),
        };

        match self.provider.generate(&text, self.config.max_output_tokens).await {
            Ok(output) => CompletionResult::success(&output),
            Err(e) => self.failed(title, chunk.index, e.kind(), e.to_string()),
        }
    }

    fn failed(&self, title: &str, index: usize, kind: FailureKind, message: String) -> CompletionResult {
        match kind {
            FailureKind::Fatal => error!(
                "Section '{}': chunk {} failed ({}): {}",
                title, index, kind, message
            ),
            _ => warn!(
                "Section '{}': chunk {} failed ({}): {}",
                title, index, kind, message
            ),
        }
        CompletionResult::failure(kind, message, self.config.failure_placeholder())
    }
}
