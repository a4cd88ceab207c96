//! Section instruction table - splitting a template into named instructions

use crate::error::IngestError;
use crate::source::read_text;
use briefsmith_domain::traits::TemplateSource;
use briefsmith_domain::SectionTable;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Canonical section names of the client strategy report, in report order
pub const DEFAULT_SECTION_ORDER: [&str; 12] = [
    "Prospect Curator",
    "Back of the Napkin",
    "The Pitch",
    "Rewards",
    "Client Needs",
    "The Elixir",
    "Insurance+",
    "Landmines",
    "Path to Close",
    "What Will Clients Ask?",
    "Sustain Success",
    "Look Ahead",
];

/// The canonical section names as owned strings
pub fn default_section_order() -> Vec<String> {
    DEFAULT_SECTION_ORDER.iter().map(|s| s.to_string()).collect()
}

/// Split template text into one instruction per canonical section name
///
/// A section's instruction is the text from the first occurrence of its name
/// up to the first later canonical name found after it (names missing from
/// the text are skipped), or to the end of the text. The name itself is part
/// of the instruction. A name that does not occur gets an empty instruction.
///
/// # Examples
///
/// ```
/// use briefsmith_ingest::extract_sections;
///
/// let canonical = vec!["A".to_string(), "B".to_string(), "C".to_string()];
/// let table = extract_sections("intro A: foo B: bar C: baz", &canonical).unwrap();
///
/// assert_eq!(table.get("A").unwrap().instruction, "A: foo");
/// assert_eq!(table.get("B").unwrap().instruction, "B: bar");
/// assert_eq!(table.get("C").unwrap().instruction, "C: baz");
/// ```
pub fn extract_sections(text: &str, canonical: &[String]) -> Result<SectionTable, IngestError> {
    let mut table = SectionTable::new();

    for (i, name) in canonical.iter().enumerate() {
        let instruction = match text.find(name.as_str()) {
            Some(start) => {
                let body_start = start + name.len();
                let end = canonical[i + 1..]
                    .iter()
                    .find_map(|next| text[body_start..].find(next.as_str()))
                    .map(|offset| body_start + offset)
                    .unwrap_or(text.len());
                text[start..end].trim()
            }
            None => {
                warn!("Section '{}' not found in template", name);
                ""
            }
        };

        debug!("Section '{}': {} chars of instruction", name, instruction.len());
        table.push(name.clone(), instruction).map_err(IngestError::Template)?;
    }

    Ok(table)
}

/// A template file (DOCX, PDF or plain text) read as a section source
#[derive(Debug, Clone)]
pub struct TemplateFile {
    path: PathBuf,
}

impl TemplateFile {
    /// Template at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the template
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateSource for TemplateFile {
    type Error = IngestError;

    fn sections(&self, canonical: &[String]) -> Result<SectionTable, Self::Error> {
        let text = read_text(&self.path)?;
        extract_sections(&text, canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_last_section_runs_to_end() {
        let table = extract_sections("A one\nB two\nC three\nand more", &names(&["A", "B", "C"])).unwrap();
        assert_eq!(table.get("C").unwrap().instruction, "C three\nand more");
    }

    #[test]
    fn test_missing_section_is_empty_and_skipped() {
        let table = extract_sections("A one C three", &names(&["A", "B", "C"])).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("A").unwrap().instruction, "A one");
        assert_eq!(table.get("B").unwrap().instruction, "");
        assert_eq!(table.get("C").unwrap().instruction, "C three");
    }

    #[test]
    fn test_order_follows_canonical_not_text() {
        let table = extract_sections("B two A one", &names(&["A", "B"])).unwrap();
        assert_eq!(table.names(), vec!["A", "B"]);
        // B occurs before A in the text, so A runs to the end
        assert_eq!(table.get("A").unwrap().instruction, "A one");
        assert_eq!(table.get("B").unwrap().instruction, "B two A one");
    }

    #[test]
    fn test_default_order_on_report_text() {
        let text = "The Pitch\nDescribe the offer.\nRewards\nList benefits.\nClient Needs\nWhat they need.";
        let table = extract_sections(text, &default_section_order()).unwrap();

        assert_eq!(table.len(), 12);
        assert_eq!(table.get("The Pitch").unwrap().instruction, "The Pitch\nDescribe the offer.");
        assert_eq!(table.get("Rewards").unwrap().instruction, "Rewards\nList benefits.");
        assert_eq!(table.get("Client Needs").unwrap().instruction, "Client Needs\nWhat they need.");
        assert_eq!(table.get("Look Ahead").unwrap().instruction, "");
    }

    #[test]
    fn test_duplicate_canonical_name_is_error() {
        let result = extract_sections("A", &names(&["A", "A"]));
        assert!(matches!(result, Err(IngestError::Template(_))));
    }

    #[test]
    fn test_empty_text() {
        let table = extract_sections("", &names(&["A"])).unwrap();
        assert_eq!(table.get("A").unwrap().instruction, "");
    }
}
