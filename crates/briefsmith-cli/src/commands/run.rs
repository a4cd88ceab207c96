//! Run command implementation.

use crate::cli::RunArgs;
use crate::commands::sections::load_sections;
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::Formatter;
use briefsmith_domain::traits::{CompletionProvider, TextExtractor};
use briefsmith_domain::SectionTable;
use briefsmith_ingest::{discover_inputs, FileExtractor};
use briefsmith_llm::{LlmError, Provider, ProviderConfig};
use briefsmith_summarizer::{DocumentSummarizer, SummarizerConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of processing a batch of input documents.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Reports written, in input order
    pub written: Vec<PathBuf>,
    /// Inputs that could not be read, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

/// Execute the run command.
pub async fn execute_run(
    args: RunArgs,
    config: &AppConfig,
    provider_config: &ProviderConfig,
    formatter: &Formatter,
) -> Result<()> {
    let template = args.template.unwrap_or_else(|| config.paths.template.clone());
    let table = load_sections(&template, config)?;

    let inputs = if args.files.is_empty() {
        let input_dir = args.input.unwrap_or_else(|| config.paths.input_dir.clone());
        discover_inputs(&input_dir)?
    } else {
        args.files
    };
    if inputs.is_empty() {
        println!("{}", formatter.warning("No .pdf or .docx documents to process"));
        return Ok(());
    }

    let output_dir = args.output.unwrap_or_else(|| config.paths.output_dir.clone());
    fs::create_dir_all(&output_dir)?;

    info!("Using model type: {}", provider_config.kind());
    let retry = config.retry_policy();
    let report = summarize_inputs(
        &inputs,
        &table,
        &output_dir,
        &config.summarizer,
        formatter,
        || Provider::from_config(provider_config, retry),
    )
    .await?;

    for path in &report.written {
        println!("{}", formatter.success(&format!("Created {}", path.display())));
    }
    for (path, reason) in &report.skipped {
        println!(
            "{}",
            formatter.warning(&format!("Skipped {}: {}", path.display(), reason))
        );
    }
    println!(
        "{}",
        formatter.info(&format!(
            "{} report(s) written, {} document(s) skipped",
            report.written.len(),
            report.skipped.len()
        ))
    );

    Ok(())
}

/// Draft and write one report per input document.
///
/// A provider is built for each document and dropped once its report is
/// drafted, so a local model never outlives the document it serves. A
/// document that cannot be read is skipped; provider construction failures
/// abort the batch.
pub async fn summarize_inputs<P, F>(
    inputs: &[PathBuf],
    table: &SectionTable,
    output_dir: &Path,
    summarizer: &SummarizerConfig,
    formatter: &Formatter,
    mut make_provider: F,
) -> Result<RunReport>
where
    P: CompletionProvider,
    F: FnMut() -> std::result::Result<P, LlmError>,
{
    let mut report = RunReport::default();

    for path in inputs {
        info!("Processing {}", path.display());
        let document = match FileExtractor.extract(path) {
            Ok(document) => document,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                report.skipped.push((path.clone(), e.to_string()));
                continue;
            }
        };

        let summary = {
            let provider = make_provider()?;
            let drafter = DocumentSummarizer::new(&provider, summarizer.clone())?;
            drafter.summarize_document(document.text(), table).await
        };

        let stem = document.stem();
        let rendered = formatter.render_report(&stem, &summary)?;
        let target = output_dir.join(format!("{}_summary.{}", stem, formatter.format().extension()));
        fs::write(&target, rendered)?;

        info!("Successfully created summary at {}", target.display());
        report.written.push(target);
    }

    Ok(report)
}
