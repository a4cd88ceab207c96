//! Sections command implementation.

use crate::cli::SectionsArgs;
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::Formatter;
use briefsmith_domain::traits::TemplateSource;
use briefsmith_domain::SectionTable;
use briefsmith_ingest::TemplateFile;
use std::path::Path;
use tracing::info;

/// Read the section table from `template` using the configured section names.
pub fn load_sections(template: &Path, config: &AppConfig) -> Result<SectionTable> {
    let table = TemplateFile::new(template).sections(&config.template.canonical_sections)?;
    info!(
        "Loaded {} section(s) from template {}",
        table.len(),
        template.display()
    );
    Ok(table)
}

/// Execute the sections command.
pub fn execute_sections(args: SectionsArgs, config: &AppConfig, formatter: &Formatter) -> Result<()> {
    let template = args.template.unwrap_or_else(|| config.paths.template.clone());
    let table = load_sections(&template, config)?;

    println!("{}", formatter.format_sections(&table)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;

    #[test]
    fn test_load_sections_from_text_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.txt");
        fs::write(
            &path,
            "The Pitch\nSummarize the offer.\nRewards\nList the benefits.\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.template.canonical_sections = vec!["The Pitch".into(), "Rewards".into()];

        let table = load_sections(&path, &config).unwrap();
        assert_eq!(table.names(), vec!["The Pitch", "Rewards"]);
        assert!(table.get("The Pitch").unwrap().instruction.contains("Summarize the offer."));
    }

    #[test]
    fn test_missing_template_is_error() {
        let config = AppConfig::default();
        let result = load_sections(Path::new("/missing/template.docx"), &config);
        assert!(matches!(result, Err(CliError::Ingest(_))));
    }
}
