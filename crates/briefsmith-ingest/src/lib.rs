//! Briefsmith Ingest
//!
//! Turns client documents into plain text and templates into ordered section
//! instruction tables.
//!
//! # Overview
//!
//! ```text
//! input_doc/*.pdf|*.docx → FileExtractor → SourceDocument
//! template (docx|pdf|txt) → TemplateFile  → SectionTable
//! ```
//!
//! Text is concatenated sequentially (pages for PDF, paragraphs for DOCX);
//! no layout analysis is attempted.
//!
//! # Example Usage
//!
//! ```no_run
//! use briefsmith_ingest::{default_section_order, FileExtractor, TemplateFile};
//! use briefsmith_domain::traits::{TemplateSource, TextExtractor};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), briefsmith_ingest::IngestError> {
//! let document = FileExtractor.extract(Path::new("input_doc/acme.pdf"))?;
//! let sections = TemplateFile::new("template_doc/template.docx")
//!     .sections(&default_section_order())?;
//!
//! println!("{} chars, {} sections", document.text().len(), sections.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod docx;
mod error;
mod pdf;
mod source;
mod template;

pub use docx::{docx_paragraphs, docx_text};
pub use error::IngestError;
pub use pdf::pdf_text;
pub use source::{discover_inputs, read_text, DocumentFormat, FileExtractor};
pub use template::{default_section_order, extract_sections, TemplateFile, DEFAULT_SECTION_ORDER};
