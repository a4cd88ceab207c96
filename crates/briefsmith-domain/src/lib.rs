//! Briefsmith Domain Layer
//!
//! This crate contains the data model of the section drafting pipeline and the
//! trait boundaries that the infrastructure crates implement. It performs no
//! I/O of its own.
//!
//! ## Key Concepts
//!
//! - **SourceDocument**: Plain text extracted from one client document
//! - **SectionSpec**: A named report section with its drafting instruction
//! - **SectionTable**: The ordered set of sections produced from a template
//! - **PromptChunk**: A context-window-sized slice of a rendered prompt
//! - **SectionSummary**: The merged model output for one section
//!
//! ## Architecture
//!
//! - Pure data and partitioning logic only
//! - Providers, extractors and template readers live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod document;
pub mod section;
pub mod summary;
pub mod traits;

// Re-exports for convenience
pub use chunk::{partition, PromptChunk};
pub use document::SourceDocument;
pub use section::{SectionSpec, SectionTable};
pub use summary::{ChunkFailure, CompletionResult, DocumentSummary, FailureKind, SectionSummary};
