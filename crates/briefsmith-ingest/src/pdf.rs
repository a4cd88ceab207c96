//! PDF text extraction

use crate::error::IngestError;
use pdf_extract::extract_text_from_mem;

/// Extract the text of every page, in page order
///
/// # Errors
///
/// Returns [`IngestError::Pdf`] when the file is malformed, encrypted, or
/// otherwise cannot be decoded.
pub fn pdf_text(bytes: &[u8]) -> Result<String, IngestError> {
    extract_text_from_mem(bytes).map_err(|e| {
        let message = e.to_string();
        let lower = message.to_lowercase();
        if lower.contains("encrypted") || lower.contains("password") {
            IngestError::Pdf(format!("PDF is password protected: {}", message))
        } else {
            IngestError::Pdf(message)
        }
    })
}
