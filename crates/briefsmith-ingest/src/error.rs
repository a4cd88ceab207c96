//! Error types for ingestion

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading documents and templates
#[derive(Error, Debug)]
pub enum IngestError {
    /// File could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File or directory being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Extension is not a supported document format
    #[error("Unsupported document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// PDF could not be parsed
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// DOCX archive or XML could not be parsed
    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    /// Extraction produced no text
    #[error("No text could be extracted from {}", .0.display())]
    Empty(PathBuf),

    /// Template could not be turned into a section table
    #[error("Template error: {0}")]
    Template(String),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IngestError::Io {
            path: path.into(),
            source,
        }
    }
}
