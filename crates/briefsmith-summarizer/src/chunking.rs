//! Measuring and slicing rendered prompts

use crate::error::SummarizerError;
use briefsmith_domain::traits::CompletionProvider;
use briefsmith_domain::{partition, PromptChunk};
use tracing::debug;

/// Slice a rendered prompt into chunks of at most `max_input_units` units
///
/// The prompt is measured with the provider's own vocabulary, so the budget
/// covers the instruction overhead as well as the document text.
pub fn chunk_prompt<P>(
    provider: &P,
    prompt: &str,
    max_input_units: usize,
) -> Result<Vec<PromptChunk>, SummarizerError>
where
    P: CompletionProvider + ?Sized,
{
    let units = provider
        .encode(prompt)
        .map_err(|e| SummarizerError::Tokenization(e.to_string()))?;

    let mut chunks = partition(&units, max_input_units);
    if chunks.is_empty() {
        // A prompt that measures to nothing is still sent once
        chunks.push(PromptChunk {
            index: 0,
            tokens: Vec::new(),
        });
    }

    debug!(
        "Prompt measured at {} units, split into {} chunk(s) of at most {}",
        units.len(),
        chunks.len(),
        max_input_units
    );
    Ok(chunks)
}
