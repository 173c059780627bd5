//! Extraction and model client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ConfigurationError;
use crate::fetch::duration_from_secs;

/// How chunk replies are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Each chunk after the first is merged into the running result by the
    /// model itself.
    #[default]
    Accumulating,
    /// Each chunk is extracted on its own and the replies are smart-merged.
    IndependentMerge,
}

/// Configuration for the extraction engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Combination strategy.
    #[serde(default)]
    pub strategy: ExtractionStrategy,
}

impl ExtractionConfig {
    /// Sets the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model_timeout() -> f64 {
    60.0
}

/// Settings for the hosted text-generation model.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API key sent with every request.
    #[serde(default)]
    pub api_key: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of the API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_model_timeout")]
    pub timeout_seconds: f64,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ModelConfig {
    /// Creates a config for the default model.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_seconds: default_model_timeout(),
        }
    }

    /// Sets the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Gets the timeout as a duration.
    pub fn timeout(&self) -> Duration {
        duration_from_secs(self.timeout_seconds)
    }

    /// Checks that every required value is present.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let fields = [
            ("api_key", &self.api_key),
            ("model", &self.model),
            ("endpoint", &self.endpoint),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigurationError::MissingModelValue { field });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_config_defaults_to_accumulating() {
        assert_eq!(ExtractionConfig::default().strategy, ExtractionStrategy::Accumulating);
        let config: ExtractionConfig = serde_json::from_str(r#"{"strategy":"independent_merge"}"#).unwrap();
        assert_eq!(config.strategy, ExtractionStrategy::IndependentMerge);
    }

    #[test]
    fn test_model_config_defaults() {
        let config: ModelConfig = serde_json::from_str(r#"{"api_key":"k"}"#).unwrap();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_model_config_oversized_timeout_saturates() {
        let config: ModelConfig =
            serde_json::from_str(r#"{"api_key":"k","timeout_seconds":1e30}"#).unwrap();
        assert_eq!(config.timeout(), Duration::MAX);
    }

    #[test]
    fn test_model_config_missing_key() {
        let err = ModelConfig::new("  ").validate().unwrap_err();
        assert_eq!(err, ConfigurationError::MissingModelValue { field: "api_key" });

        let err = ModelConfig::new("k").with_model("").validate().unwrap_err();
        assert_eq!(err, ConfigurationError::MissingModelValue { field: "model" });
    }

    #[test]
    fn test_model_config_debug_hides_key() {
        let text = format!("{:?}", ModelConfig::new("super-secret"));
        assert!(!text.contains("super-secret"));
    }
}
