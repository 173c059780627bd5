//! Aggregate pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::content::ChunkingConfig;
use crate::extraction::{ExtractionConfig, ExtractionStrategy};
use crate::fetch::FetchConfig;

/// Settings for every pipeline step except credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fetch and retry settings.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Chunk bound.
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Extraction strategy.
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

impl PipelineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fetch configuration.
    #[must_use]
    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Sets the maximum chunk length.
    #[must_use]
    pub fn with_max_chunk_length(mut self, max_length: usize) -> Self {
        self.chunking = self.chunking.with_max_length(max_length);
        self
    }

    /// Sets the extraction strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.extraction = self.extraction.with_strategy(strategy);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_from_partial_json() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{"chunking": {"max_length": 1000}, "extraction": {"strategy": "independent_merge"}}"#,
        )
        .unwrap();

        assert_eq!(config.chunking.max_length, 1000);
        assert_eq!(config.extraction.strategy, ExtractionStrategy::IndependentMerge);
        assert_eq!(config.fetch, FetchConfig::default());
    }

    #[test]
    fn test_pipeline_config_builders() {
        let config = PipelineConfig::new()
            .with_max_chunk_length(10)
            .with_strategy(ExtractionStrategy::IndependentMerge);
        assert_eq!(config.chunking.max_length, 10);
        assert_eq!(config.extraction.strategy, ExtractionStrategy::IndependentMerge);
    }
}
