//! Briefsmith CLI - draft sectioned strategy reports from source documents.

use briefsmith_cli::commands;
use briefsmith_cli::{AppConfig, Cli, Command, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Secrets may live in .env; a missing file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` applies unless `-v` is given
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> briefsmith_cli::Result<()> {
    let (config, source) = AppConfig::load(cli.config.as_deref())?;

    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let formatter = Formatter::new(format, !cli.no_color);

    match cli.command {
        Command::Sections(args) => commands::execute_sections(args, &config, &formatter),
        Command::Check => {
            let provider = config.resolve_provider(cli.provider.as_deref(), env_var)?;
            commands::execute_check(&config, source.as_deref(), &provider, &formatter)
        }
        Command::Run(args) => {
            let provider = config.resolve_provider(cli.provider.as_deref(), env_var)?;
            commands::execute_run(args, &config, &provider, &formatter).await
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
