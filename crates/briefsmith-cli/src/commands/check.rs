//! Check command implementation.

use crate::config::{AppConfig, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use briefsmith_llm::{CharTokenizer, ProviderConfig, ProviderKind};
use std::path::Path;

/// Execute the check command.
///
/// The provider settings were already resolved and validated; this reports
/// what a run would use without loading a model or calling an API.
pub fn execute_check(
    config: &AppConfig,
    source: Option<&Path>,
    provider_config: &ProviderConfig,
    formatter: &Formatter,
) -> Result<()> {
    let summary = CheckSummary::new(config, source, provider_config)?;

    match formatter.format() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary.to_json())?),
        OutputFormat::Markdown => {
            println!("{}", formatter.success(&format!("Provider: {}", summary.provider)));
            println!("{}", formatter.info(&format!("Config file: {}", summary.config_file)));
            println!(
                "{}",
                formatter.info(&format!(
                    "Context window: {} tokens, {} reserved for output, {} units per chunk",
                    summary.context_window, summary.max_output_tokens, summary.max_input_units
                ))
            );
            println!(
                "{}",
                formatter.info(&format!("Retry delays (s): {:?}", summary.retry_delays))
            );
            println!(
                "{}",
                formatter.info(&format!("Pause between sections: {}s", summary.section_delay_secs))
            );
            if !summary.template_found {
                println!(
                    "{}",
                    formatter.warning(&format!("Template not found: {}", summary.template))
                );
            }
        }
    }
    Ok(())
}

/// Effective settings of a run.
#[derive(Debug)]
struct CheckSummary {
    provider: ProviderKind,
    config_file: String,
    context_window: usize,
    max_output_tokens: usize,
    max_input_units: usize,
    retry_delays: Vec<u64>,
    section_delay_secs: u64,
    template: String,
    template_found: bool,
}

impl CheckSummary {
    fn new(config: &AppConfig, source: Option<&Path>, provider: &ProviderConfig) -> Result<Self> {
        let units_per_token = match provider.kind() {
            ProviderKind::Local => 1,
            ProviderKind::OpenAi | ProviderKind::Azure => CharTokenizer::default().chars_per_token(),
        };
        let max_input_units = config
            .summarizer
            .max_input_units(provider.context_window(), units_per_token)?;

        Ok(Self {
            provider: provider.kind(),
            config_file: source
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(defaults)".to_string()),
            context_window: provider.context_window(),
            max_output_tokens: config.summarizer.max_output_tokens,
            max_input_units,
            retry_delays: config
                .retry_policy()
                .delays()
                .iter()
                .map(|d| d.as_secs())
                .collect(),
            section_delay_secs: config.summarizer.section_delay_secs,
            template: config.paths.template.display().to_string(),
            template_found: config.paths.template.is_file(),
        })
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "provider": self.provider.as_str(),
            "config_file": self.config_file,
            "context_window": self.context_window,
            "max_output_tokens": self.max_output_tokens,
            "max_input_units": self.max_input_units,
            "retry_delays_secs": self.retry_delays,
            "section_delay_secs": self.section_delay_secs,
            "template": self.template,
            "template_found": self.template_found,
        })
    }
}
