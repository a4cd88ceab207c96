//! Section-by-section drafting of a whole document

use crate::config::SummarizerConfig;
use crate::error::SummarizerError;
use crate::summarizer::SectionSummarizer;
use briefsmith_domain::traits::CompletionProvider;
use briefsmith_domain::{DocumentSummary, SectionSummary, SectionTable};
use tracing::{info, warn};

/// Drives a [`SectionSummarizer`] over every section of a template
///
/// Sections run strictly in template order with a pause between consecutive
/// requests. Every section appears in the result, possibly with empty text.
pub struct DocumentSummarizer<'a, P: ?Sized> {
    sections: SectionSummarizer<'a, P>,
}

impl<'a, P> DocumentSummarizer<'a, P>
where
    P: CompletionProvider + ?Sized,
{
    /// Create an orchestrator for `provider`
    pub fn new(provider: &'a P, config: SummarizerConfig) -> Result<Self, SummarizerError> {
        Ok(Self {
            sections: SectionSummarizer::new(provider, config)?,
        })
    }

    /// The per-section engine
    pub fn section_summarizer(&self) -> &SectionSummarizer<'a, P> {
        &self.sections
    }

    /// Draft every section of `table` from `source_text`
    pub async fn summarize_document(&self, source_text: &str, table: &SectionTable) -> DocumentSummary {
        let delay = self.sections.config().section_delay();
        let mut summary = DocumentSummary::new();

        for (position, section) in table.iter().enumerate() {
            if position > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            info!(
                "Drafting section {}/{}: {}",
                position + 1,
                table.len(),
                section.name
            );
            let drafted = match self
                .sections
                .summarize_section(source_text, &section.name, &section.instruction)
                .await
            {
                Ok(drafted) => drafted,
                Err(e) => {
                    warn!("Section '{}' left empty: {}", section.name, e);
                    SectionSummary::empty(&section.name)
                }
            };
            summary.push(drafted);
        }

        summary
    }
}
