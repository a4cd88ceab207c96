//! Text source adapter - one plain-text blob per document, whatever the format

use crate::docx::docx_text;
use crate::error::IngestError;
use crate::pdf::pdf_text;
use briefsmith_domain::traits::TextExtractor;
use briefsmith_domain::SourceDocument;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Portable Document Format
    Pdf,
    /// Word processing document (Office Open XML)
    Docx,
    /// Plain text or Markdown
    Text,
}

impl DocumentFormat {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "txt" | "md" => Some(DocumentFormat::Text),
            _ => None,
        }
    }

    /// Whether files of this format are picked up from the input directory
    pub fn is_input(&self) -> bool {
        matches!(self, DocumentFormat::Pdf | DocumentFormat::Docx)
    }
}

/// Read the raw text of a file in any supported format
pub fn read_text(path: &Path) -> Result<String, IngestError> {
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| IngestError::UnsupportedFormat(path.to_path_buf()))?;

    let bytes = fs::read(path).map_err(|e| IngestError::io(path, e))?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    match format {
        DocumentFormat::Pdf => pdf_text(&bytes),
        DocumentFormat::Docx => docx_text(&bytes),
        DocumentFormat::Text => String::from_utf8(bytes).map_err(|e| {
            IngestError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        }),
    }
}

/// Extracts source documents from files on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtractor;

impl TextExtractor for FileExtractor {
    type Error = IngestError;

    fn extract(&self, path: &Path) -> Result<SourceDocument, Self::Error> {
        let text = read_text(path)?;
        let document = SourceDocument::new(path, text);
        if document.is_blank() {
            return Err(IngestError::Empty(path.to_path_buf()));
        }
        Ok(document)
    }
}

/// PDF and DOCX files directly inside `dir`, sorted by path
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let entries = fs::read_dir(dir).map_err(|e| IngestError::io(dir, e))?;

    let mut inputs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| IngestError::io(dir, e))?.path();
        let is_input = DocumentFormat::from_path(&path).is_some_and(|f| f.is_input());
        if path.is_file() && is_input {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.PDF")), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_path(Path::new("b.docx")), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_path(Path::new("c.md")), Some(DocumentFormat::Text));
        assert_eq!(DocumentFormat::from_path(Path::new("d.doc")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_only_pdf_and_docx_are_inputs() {
        assert!(DocumentFormat::Pdf.is_input());
        assert!(DocumentFormat::Docx.is_input());
        assert!(!DocumentFormat::Text.is_input());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = read_text(Path::new("notes.rtf"));
        assert!(matches!(result, Err(IngestError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = FileExtractor.extract(Path::new("/nonexistent/brief.pdf"));
        assert!(matches!(result, Err(IngestError::Io { .. })));
    }
}
