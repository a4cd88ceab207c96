//! Configuration management for the CLI.
//!
//! Settings come from a TOML file in which every field is optional. Secrets
//! never live in the file: API keys and local model paths are read from the
//! environment (after `.env` is loaded) when the provider is resolved.

use crate::error::{CliError, Result};
use briefsmith_ingest::default_section_order;
use briefsmith_llm::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use briefsmith_llm::{
    AzureConfig, LocalConfig, OpenAiConfig, ProviderConfig, ProviderKind, RetryPolicy,
};
use briefsmith_summarizer::SummarizerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "briefsmith.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Input, output and template locations
    pub paths: PathsConfig,

    /// Section names searched for in the template
    pub template: TemplateConfig,

    /// Provider selection and non-secret provider settings
    pub provider: ProviderSettings,

    /// Backoff for remote providers
    pub retry: RetrySettings,

    /// Chunking and pacing
    pub summarizer: SummarizerConfig,

    /// Report rendering
    pub output: OutputSettings,
}

/// Filesystem locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned for input documents
    pub input_dir: PathBuf,
    /// Directory reports are written to
    pub output_dir: PathBuf,
    /// Template with the section instructions
    pub template: PathBuf,
}

/// Template settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Section names in report order
    pub canonical_sections: Vec<String>,
}

/// Provider selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// `openai`, `azure` or `local`; `MODEL_TYPE` takes precedence
    pub kind: String,
    /// OpenAI settings
    pub openai: OpenAiSettings,
    /// Azure OpenAI settings
    pub azure: AzureSettings,
    /// Local model settings
    pub local: LocalSettings,
}

/// Non-secret OpenAI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    /// Chat model name
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Model context window in tokens
    pub context_window: usize,
    /// Timeout for one request
    pub request_timeout_secs: u64,
}

/// Non-secret Azure OpenAI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureSettings {
    /// REST API version
    pub api_version: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Deployment context window in tokens
    pub context_window: usize,
    /// Timeout for one request
    pub request_timeout_secs: u64,
}

/// Local model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSettings {
    /// Runtime endpoint
    pub endpoint: String,
    /// Model name; `LLAMA_MODEL` takes precedence
    pub model: Option<String>,
    /// Tokenizer file; `LLAMA_TOKENIZER_PATH` takes precedence
    pub tokenizer_path: Option<PathBuf>,
    /// Context window the model is loaded with
    pub n_ctx: usize,
    /// Sampling temperature
    pub temperature: f32,
    /// Timeout for one inference request
    pub request_timeout_secs: u64,
    /// Release the model after every request
    pub unload_after_each_call: bool,
}

/// Backoff schedule in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Wait before the first retry
    pub initial_delay_secs: u64,
    /// Longest wait before giving up
    pub max_delay_secs: u64,
}

/// Report rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Report file format
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown report, tables on the terminal
    #[default]
    Markdown,
    /// JSON report and JSON terminal output
    Json,
}

impl OutputFormat {
    /// File extension of reports in this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl AppConfig {
    /// Candidate configuration files, most specific first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("briefsmith").join("config.toml"));
        }
        paths
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise the first existing search path
    /// is used, and defaults apply when there is none.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(CliError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }

        for path in Self::search_paths() {
            if path.is_file() {
                return Ok((Self::from_file(&path)?, Some(path)));
            }
        }

        debug!("No config file found, using defaults");
        Ok((Self::default(), None))
    }

    /// Read configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize configuration to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Backoff policy for remote providers.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_secs(self.retry.initial_delay_secs),
            Duration::from_secs(self.retry.max_delay_secs),
        )
    }

    /// Resolve and validate the provider settings.
    ///
    /// The kind is taken from `kind_override` (command line), then
    /// `MODEL_TYPE`, then the file. Secrets are read through `env`.
    pub fn resolve_provider<F>(&self, kind_override: Option<&str>, env: F) -> Result<ProviderConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind_name = kind_override
            .map(str::to_string)
            .or_else(|| env("MODEL_TYPE"))
            .unwrap_or_else(|| self.provider.kind.clone());
        let kind: ProviderKind = kind_name.parse()?;
        let secret = |name: &str| env(name).unwrap_or_default();

        let resolved = match kind {
            ProviderKind::OpenAi => {
                let s = &self.provider.openai;
                ProviderConfig::OpenAi(OpenAiConfig {
                    model: s.model.clone(),
                    base_url: s.base_url.trim_end_matches('/').to_string(),
                    temperature: s.temperature,
                    context_window: s.context_window,
                    request_timeout_secs: s.request_timeout_secs,
                    ..OpenAiConfig::new(secret("OPENAI_API_KEY"))
                })
            }
            ProviderKind::Azure => {
                let s = &self.provider.azure;
                ProviderConfig::Azure(AzureConfig {
                    api_version: s.api_version.clone(),
                    temperature: s.temperature,
                    context_window: s.context_window,
                    request_timeout_secs: s.request_timeout_secs,
                    ..AzureConfig::new(
                        secret("AZURE_OPENAI_API_KEY"),
                        secret("AZURE_OPENAI_ENDPOINT"),
                        secret("AZURE_OPENAI_DEPLOYMENT_NAME"),
                    )
                })
            }
            ProviderKind::Local => {
                let s = &self.provider.local;
                let model = env("LLAMA_MODEL")
                    .or_else(|| s.model.clone())
                    .ok_or_else(|| {
                        CliError::Config("Please set the LLAMA_MODEL environment variable.".into())
                    })?;
                let tokenizer = env("LLAMA_TOKENIZER_PATH")
                    .map(PathBuf::from)
                    .or_else(|| s.tokenizer_path.clone())
                    .ok_or_else(|| {
                        CliError::Config(
                            "Please set the LLAMA_TOKENIZER_PATH environment variable.".into(),
                        )
                    })?;
                ProviderConfig::Local(LocalConfig {
                    endpoint: s.endpoint.clone(),
                    n_ctx: s.n_ctx,
                    temperature: s.temperature,
                    request_timeout_secs: s.request_timeout_secs,
                    unload_after_each_call: s.unload_after_each_call,
                    ..LocalConfig::new(model, tokenizer)
                })
            }
        };

        resolved.validate()?;
        self.summarizer.validate(resolved.context_window())?;
        Ok(resolved)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input_doc"),
            output_dir: PathBuf::from("output_doc"),
            template: PathBuf::from("template_doc").join("template.docx"),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            canonical_sections: default_section_order(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::OpenAi.to_string(),
            openai: OpenAiSettings::default(),
            azure: AzureSettings::default(),
            local: LocalSettings::default(),
        }
    }
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        let base = OpenAiConfig::new("");
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: base.temperature,
            context_window: base.context_window,
            request_timeout_secs: base.request_timeout_secs,
        }
    }
}

impl Default for AzureSettings {
    fn default() -> Self {
        let base = AzureConfig::new("", "", "");
        Self {
            api_version: base.api_version,
            temperature: base.temperature,
            context_window: base.context_window,
            request_timeout_secs: base.request_timeout_secs,
        }
    }
}

impl Default for LocalSettings {
    fn default() -> Self {
        let base = LocalConfig::new("", "");
        Self {
            endpoint: base.endpoint,
            model: None,
            tokenizer_path: None,
            n_ctx: base.n_ctx,
            temperature: base.temperature,
            request_timeout_secs: base.request_timeout_secs,
            unload_after_each_call: base.unload_after_each_call,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            initial_delay_secs: policy.initial_delay.as_secs(),
            max_delay_secs: policy.max_delay.as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.paths.input_dir, PathBuf::from("input_doc"));
        assert_eq!(config.template.canonical_sections.len(), 12);
        assert_eq!(config.provider.kind, "openai");
        assert_eq!(config.retry_policy().max_retries(), 5);
        assert_eq!(config.summarizer.max_output_tokens, 500);
        assert_eq!(config.output.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [summarizer]
            section_delay_secs = 0

            [output]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.summarizer.section_delay_secs, 0);
        assert_eq!(config.summarizer.max_output_tokens, 500);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::default();
        let parsed: AppConfig = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = AppConfig::load(Some(Path::new("/definitely/missing.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[provider]\nkind = \"azure\"\n").unwrap();

        let (config, source) = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.provider.kind, "azure");
        assert_eq!(source, Some(path));
    }

    #[test]
    fn test_resolve_openai_from_env() {
        let config = AppConfig::default();
        let resolved = config
            .resolve_provider(None, env_of(&[("OPENAI_API_KEY", "sk-test")]))
            .unwrap();
        match resolved {
            ProviderConfig::OpenAi(c) => {
                assert_eq!(c.api_key, "sk-test");
                assert_eq!(c.model, DEFAULT_MODEL);
            }
            other => panic!("Expected OpenAI config, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let config = AppConfig::default();
        let result = config.resolve_provider(None, env_of(&[]));
        assert!(matches!(result, Err(CliError::Provider(_))));
    }

    #[test]
    fn test_model_type_selects_azure() {
        let config = AppConfig::default();
        let env = env_of(&[
            ("MODEL_TYPE", "azure"),
            ("AZURE_OPENAI_API_KEY", "key"),
            ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
        ]);

        let err = config.resolve_provider(None, &env).unwrap_err();
        assert!(err.to_string().contains("AZURE_OPENAI_DEPLOYMENT_NAME"));
    }

    #[test]
    fn test_flag_overrides_model_type() {
        let config = AppConfig::default();
        let env = env_of(&[("MODEL_TYPE", "azure"), ("OPENAI_API_KEY", "sk")]);
        let resolved = config.resolve_provider(Some("openai"), env).unwrap();
        assert_eq!(resolved.kind(), ProviderKind::OpenAi);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let config = AppConfig::default();
        let result = config.resolve_provider(Some("claude"), env_of(&[]));
        assert!(matches!(result, Err(CliError::Provider(_))));
    }

    #[test]
    fn test_local_requires_model_and_tokenizer() {
        let config = AppConfig::default();
        let result = config.resolve_provider(Some("llama"), env_of(&[]));
        assert!(matches!(result, Err(CliError::Config(_))));

        let dir = tempfile::tempdir().unwrap();
        let tokenizer = dir.path().join("tokenizer.json");
        fs::write(&tokenizer, "{}").unwrap();
        let env = env_of(&[
            ("LLAMA_MODEL", "mistral"),
            ("LLAMA_TOKENIZER_PATH", tokenizer.to_str().unwrap()),
        ]);
        let resolved = config.resolve_provider(Some("local"), env).unwrap();
        assert_eq!(resolved.context_window(), 2048);
    }

    #[test]
    fn test_output_budget_checked_against_window() {
        let mut config = AppConfig::default();
        config.summarizer.max_output_tokens = 10_000;
        let result = config.resolve_provider(None, env_of(&[("OPENAI_API_KEY", "sk")]));
        assert!(matches!(result, Err(CliError::Summarizer(_))));
    }
}
