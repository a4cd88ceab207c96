//! Configuration for the summarizer

use crate::error::SummarizerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for section summarization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Output token budget per completion call, reserved out of the context window
    pub max_output_tokens: usize,

    /// Pause between consecutive sections (seconds); 0 disables pacing
    pub section_delay_secs: u64,

    /// Text standing in for a failed chunk; empty when unset
    pub failure_marker: Option<String>,
}

impl SummarizerConfig {
    /// Get the pause between sections as a Duration
    pub fn section_delay(&self) -> Duration {
        Duration::from_secs(self.section_delay_secs)
    }

    /// Contribution of a failed chunk to the section text
    pub fn failure_placeholder(&self) -> &str {
        self.failure_marker.as_deref().unwrap_or("")
    }

    /// Prompt units available per chunk for a provider
    ///
    /// `(context_window - max_output_tokens) * units_per_token`
    pub fn max_input_units(
        &self,
        context_window: usize,
        units_per_token: usize,
    ) -> Result<usize, SummarizerError> {
        self.validate(context_window)?;
        Ok((context_window - self.max_output_tokens).saturating_mul(units_per_token.max(1)))
    }

    /// Validate the configuration against a provider's context window
    pub fn validate(&self, context_window: usize) -> Result<(), SummarizerError> {
        if self.max_output_tokens == 0 {
            return Err(SummarizerError::Config(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }
        if context_window <= self.max_output_tokens {
            return Err(SummarizerError::Config(format!(
                "context window of {} tokens leaves no room for input after reserving {} output tokens",
                context_window, self.max_output_tokens
            )));
        }
        Ok(())
    }
}

impl Default for SummarizerConfig {
    /// Default configuration: 500 output tokens, 2 second pacing
    fn default() -> Self {
        Self {
            max_output_tokens: 500,
            section_delay_secs: 2,
            failure_marker: None,
        }
    }
}

impl SummarizerConfig {
    /// Unpaced preset for providers without rate limits
    pub fn unpaced() -> Self {
        Self {
            section_delay_secs: 0,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SummarizerConfig::default();
        assert!(config.validate(2048).is_ok());
        assert_eq!(config.section_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_window_must_exceed_output_budget() {
        let config = SummarizerConfig::default();
        assert!(config.validate(500).is_err());
        assert!(config.validate(100).is_err());
        assert!(config.validate(501).is_ok());
    }

    #[test]
    fn test_zero_output_budget_rejected() {
        let config = SummarizerConfig {
            max_output_tokens: 0,
            ..SummarizerConfig::default()
        };
        assert!(config.validate(2048).is_err());
    }

    #[test]
    fn test_max_input_units() {
        let config = SummarizerConfig::default();
        assert_eq!(config.max_input_units(2048, 1).unwrap(), 1548);
        assert_eq!(config.max_input_units(8192, 4).unwrap(), 30768);
        assert!(config.max_input_units(400, 1).is_err());
    }

    #[test]
    fn test_huge_window_saturates() {
        let config = SummarizerConfig::default();
        assert_eq!(config.max_input_units(usize::MAX, 4).unwrap(), usize::MAX);
    }

    #[test]
    fn test_failure_placeholder() {
        let mut config = SummarizerConfig::default();
        assert_eq!(config.failure_placeholder(), "");
        config.failure_marker = Some("[section unavailable]".to_string());
        assert_eq!(config.failure_placeholder(), "[section unavailable]");
    }

    #[test]
    fn test_unpaced_preset() {
        assert_eq!(SummarizerConfig::unpaced().section_delay(), Duration::ZERO);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SummarizerConfig::from_toml("max_output_tokens = 256").unwrap();
        assert_eq!(config.max_output_tokens, 256);
        assert_eq!(config.section_delay_secs, 2);
        assert_eq!(config.failure_marker, None);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SummarizerConfig {
            failure_marker: Some("[n/a]".to_string()),
            ..SummarizerConfig::default()
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = SummarizerConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
