//! Briefsmith Summarizer
//!
//! Drafts a sectioned report from one source document.
//!
//! # Overview
//!
//! For each section of the template, the document text and the section's
//! instruction are rendered into one prompt. The prompt is measured with the
//! provider's vocabulary and split into chunks that fit the context window
//! once the output budget is reserved. Chunk outputs are joined in order.
//!
//! # Architecture
//!
//! ```text
//! SectionTable → DocumentSummarizer → SectionSummarizer → CompletionProvider
//!                        ↓                    ↓
//!                 DocumentSummary       SectionSummary
//! ```
//!
//! # Example Usage
//!
//! ```
//! use briefsmith_domain::SectionTable;
//! use briefsmith_llm::MockProvider;
//! use briefsmith_summarizer::{DocumentSummarizer, SummarizerConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new("Acme needs faster onboarding.");
//! let table = SectionTable::from_pairs([("Client Needs", "What does the client need?")])?;
//!
//! let summarizer = DocumentSummarizer::new(&provider, SummarizerConfig::unpaced())?;
//! let summary = summarizer.summarize_document("Meeting notes...", &table).await;
//!
//! assert_eq!(summary.get("Client Needs"), Some("Acme needs faster onboarding."));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod orchestrator;
mod prompt;
mod summarizer;


pub use chunking::chunk_prompt;
pub use config::SummarizerConfig;
pub use error::SummarizerError;
pub use orchestrator::DocumentSummarizer;
pub use prompt::PromptBuilder;
pub use summarizer::SectionSummarizer;
