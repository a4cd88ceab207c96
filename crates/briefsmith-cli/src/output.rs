//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use briefsmith_domain::{DocumentSummary, SectionTable};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest instruction preview shown in the sections table.
const PREVIEW_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The active format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a drafted report for the file `<stem>_summary.<ext>`.
    pub fn render_report(&self, title: &str, summary: &DocumentSummary) -> Result<String> {
        match self.format {
            OutputFormat::Markdown => Ok(render_markdown(title, summary)),
            OutputFormat::Json => render_json(title, summary),
        }
    }

    /// Format a section table.
    pub fn format_sections(&self, table: &SectionTable) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let sections: Vec<serde_json::Value> = table
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "order": s.order,
                            "name": s.name,
                            "instruction": s.instruction,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&sections)?)
            }
            OutputFormat::Markdown => Ok(self.format_sections_table(table)),
        }
    }

    fn format_sections_table(&self, table: &SectionTable) -> String {
        if table.is_empty() {
            return self.colorize("No sections found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Section", "Instruction"]);

        for section in table {
            let preview = if section.instruction.is_empty() {
                "(missing)".to_string()
            } else {
                preview(&section.instruction)
            };
            builder.push_record([
                (section.order + 1).to_string(),
                section.name.clone(),
                preview,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Markdown report: one `##` header per section, blank lines between paragraphs.
///
/// Section text is split into paragraphs on blank lines; empty sections keep
/// their header.
pub fn render_markdown(title: &str, summary: &DocumentSummary) -> String {
    let mut out = format!("# {}\n", title);

    for section in summary.sections() {
        out.push_str(&format!("\n## {}\n", section.name));
        for paragraph in section.text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            out.push('\n');
            out.push_str(paragraph);
            out.push('\n');
        }
    }

    out
}

/// JSON report with sections as an ordered array.
pub fn render_json(title: &str, summary: &DocumentSummary) -> Result<String> {
    let sections: Vec<serde_json::Value> = summary
        .sections()
        .iter()
        .map(|s| {
            serde_json::json!({
                "name": s.name,
                "text": s.text,
                "chunks": s.chunk_count,
                "failed_chunks": s.failed_chunks,
            })
        })
        .collect();

    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "title": title,
        "sections": sections,
    }))?)
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefsmith_domain::{CompletionResult, SectionSummary};

    fn summary() -> DocumentSummary {
        let mut doc = DocumentSummary::new();
        doc.push(SectionSummary::merge(
            "The Pitch",
            &[CompletionResult::success("First paragraph.\n\nSecond paragraph.")],
        ));
        doc.push(SectionSummary::empty("Rewards"));
        doc
    }

    #[test]
    fn test_markdown_layout() {
        let md = render_markdown("Acme", &summary());
        assert_eq!(
            md,
            "# Acme\n\n## The Pitch\n\nFirst paragraph.\n\nSecond paragraph.\n\n## Rewards\n"
        );
    }

    #[test]
    fn test_json_keeps_section_order() {
        let json = render_json("Acme", &summary()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Acme");
        assert_eq!(value["sections"][0]["name"], "The Pitch");
        assert_eq!(value["sections"][1]["name"], "Rewards");
        assert_eq!(value["sections"][1]["text"], "");
    }

    #[test]
    fn test_sections_table() {
        let formatter = Formatter::new(OutputFormat::Markdown, false);
        let table = SectionTable::from_pairs([("The Pitch", "Summarize."), ("Rewards", "")]).unwrap();
        let output = formatter.format_sections(&table).unwrap();
        assert!(output.contains("Section"));
        assert!(output.contains("The Pitch"));
        assert!(output.contains("(missing)"));
    }

    #[test]
    fn test_sections_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let table = SectionTable::from_pairs([("The Pitch", "Summarize.")]).unwrap();
        let output = formatter.format_sections(&table).unwrap();
        assert!(output.contains("\"instruction\": \"Summarize.\""));
    }

    #[test]
    fn test_empty_sections() {
        let formatter = Formatter::new(OutputFormat::Markdown, false);
        let output = formatter.format_sections(&SectionTable::new()).unwrap();
        assert!(output.contains("No sections found"));
    }

    #[test]
    fn test_preview_truncates() {
        let long = "word ".repeat(40);
        let shown = preview(&long);
        assert!(shown.ends_with('…'));
        assert!(shown.chars().count() <= PREVIEW_CHARS + 1);
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Markdown, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
