//! DOCX text extraction
//!
//! A DOCX file is a zip archive; the body lives in `word/document.xml`.
//! Paragraph text is the concatenation of its `<w:t>` runs, with tabs and
//! line breaks kept.

use crate::error::IngestError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{Cursor, Read};

const DOCUMENT_PART: &str = "word/document.xml";

static PARAGRAPH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*)?/>|<w:p(?:\s[^>]*)?>.*?</w:p>").expect("valid paragraph regex")
});

static RUN_CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*[^/>])?\s*>(.*?)</w:t>|<w:tab\s*/>|<w:br\s*/>|<w:cr\s*/>")
        .expect("valid run regex")
});

/// Paragraph texts of a DOCX document, in document order
///
/// Empty paragraphs are kept as empty strings so callers can tell paragraph
/// boundaries apart.
pub fn docx_paragraphs(bytes: &[u8]) -> Result<Vec<String>, IngestError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| IngestError::Docx(format!("Not a DOCX archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| IngestError::Docx(format!("Missing {}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| IngestError::Docx(format!("Unreadable {}: {}", DOCUMENT_PART, e)))?;

    Ok(paragraphs_from_xml(&xml))
}

/// Full text of a DOCX document, one line per paragraph
pub fn docx_text(bytes: &[u8]) -> Result<String, IngestError> {
    Ok(docx_paragraphs(bytes)?.join("\n"))
}

fn paragraphs_from_xml(xml: &str) -> Vec<String> {
    PARAGRAPH
        .find_iter(xml)
        .map(|paragraph| {
            RUN_CONTENT
                .captures_iter(paragraph.as_str())
                .map(|caps| match caps.get(1) {
                    Some(text) => unescape(text.as_str()),
                    None if caps[0].starts_with("<w:tab") => "\t".to_string(),
                    None => "\n".to_string(),
                })
                .collect::<String>()
        })
        .collect()
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
