//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Briefsmith - draft sectioned strategy reports from source documents.
#[derive(Debug, Parser)]
#[command(name = "briefsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Completion provider (openai, azure, local); overrides MODEL_TYPE
    #[arg(short, long, global = true)]
    pub provider: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Markdown reports, tables on the terminal
    Markdown,
    /// JSON everywhere
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Draft a report for every input document
    Run(RunArgs),

    /// Show the sections and instructions read from the template
    Sections(SectionsArgs),

    /// Validate configuration and provider settings without drafting
    Check,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Specific documents to process instead of the input directory
    pub files: Vec<PathBuf>,

    /// Directory scanned for .pdf and .docx files
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory reports are written to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Template file (.docx, .pdf or .txt)
    #[arg(short, long)]
    pub template: Option<PathBuf>,
}

/// Arguments for the sections command.
#[derive(Debug, Parser)]
pub struct SectionsArgs {
    /// Template file (.docx, .pdf or .txt)
    #[arg(short, long)]
    pub template: Option<PathBuf>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Markdown => crate::config::OutputFormat::Markdown,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
