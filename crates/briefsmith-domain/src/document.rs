//! Source documents - the text a report is drafted from

use std::path::{Path, PathBuf};

/// Plain text extracted from one client document
///
/// Identity is the file path. The text is immutable once extracted; the
/// pipeline only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    path: PathBuf,
    text: String,
}

impl SourceDocument {
    /// Create a document from its path and extracted text
    ///
    /// # Examples
    ///
    /// ```
    /// use briefsmith_domain::SourceDocument;
    ///
    /// let doc = SourceDocument::new("input/acme.pdf", "Acme sells widgets.");
    /// assert_eq!(doc.text(), "Acme sells widgets.");
    /// assert_eq!(doc.stem(), "acme");
    /// ```
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Path the text was extracted from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extracted plain text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// File name without extension, used to name output artifacts
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string())
    }

    /// Whether extraction produced only whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
