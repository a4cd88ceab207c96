//! End-to-end tests of the run pipeline with a scripted provider.

use briefsmith_cli::commands::{load_sections, summarize_inputs};
use briefsmith_cli::config::{AppConfig, OutputFormat};
use briefsmith_cli::Formatter;
use briefsmith_llm::MockProvider;
use std::fs;

const TEMPLATE: &str = "\
Client Strategy Template
The Pitch
Describe the offer in two sentences.
Rewards
List what the client gains.
Landmines
Name the risks.
";

#[tokio::test]
async fn test_config_template_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("briefsmith.toml");
    fs::write(
        &config_path,
        r#"
[template]
canonical_sections = ["The Pitch", "Rewards", "Landmines"]

[summarizer]
section_delay_secs = 0
max_output_tokens = 100
"#,
    )
    .unwrap();
    let (config, source) = AppConfig::load(Some(&config_path)).unwrap();
    assert_eq!(source.as_deref(), Some(config_path.as_path()));

    let template = dir.path().join("template.txt");
    fs::write(&template, TEMPLATE).unwrap();
    let table = load_sections(&template, &config).unwrap();
    assert_eq!(table.names(), vec!["The Pitch", "Rewards", "Landmines"]);
    assert_eq!(
        table.get("Rewards").unwrap().instruction,
        "Rewards\nList what the client gains."
    );

    let input = dir.path().join("acme notes.txt");
    fs::write(&input, "Acme is moving its payroll in-house next year.").unwrap();

    let provider = MockProvider::new("Paragraph one.\n\nParagraph two.");
    let formatter = Formatter::new(OutputFormat::Markdown, false);
    let report = summarize_inputs(
        &[input],
        &table,
        dir.path(),
        &config.summarizer,
        &formatter,
        || Ok(provider.clone()),
    )
    .await
    .unwrap();

    let written = fs::read_to_string(&report.written[0]).unwrap();
    assert!(report.written[0].ends_with("acme notes_summary.md"));
    let pitch = written.find("## The Pitch").unwrap();
    let rewards = written.find("## Rewards").unwrap();
    let landmines = written.find("## Landmines").unwrap();
    assert!(pitch < rewards && rewards < landmines);
    assert!(written.contains("Paragraph one.\n\nParagraph two."));

    // Every prompt carried its section's instruction
    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[1].contains("List what the client gains."));
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("template.txt");
    fs::write(&template, TEMPLATE).unwrap();
    let mut config = AppConfig::default();
    config.template.canonical_sections = vec!["The Pitch".into(), "Landmines".into()];
    config.summarizer.section_delay_secs = 0;
    let table = load_sections(&template, &config).unwrap();

    let input = dir.path().join("deal.txt");
    fs::write(&input, "A long negotiation. ".repeat(500)).unwrap();
    let formatter = Formatter::new(OutputFormat::Json, false);

    let mut outputs = Vec::new();
    for run in ["first", "second"] {
        let out = dir.path().join(run);
        fs::create_dir_all(&out).unwrap();
        let report = summarize_inputs(
            &[input.clone()],
            &table,
            &out,
            &config.summarizer,
            &formatter,
            || Ok(MockProvider::echo().with_context_window(1000)),
        )
        .await
        .unwrap();
        outputs.push(fs::read(&report.written[0]).unwrap());
    }

    assert_eq!(outputs[0], outputs[1]);
}
