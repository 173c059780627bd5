//! Diagnostics for one pipeline run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::extraction::ExtractionStrategy;

/// Summary of a completed run, alongside its output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Identifier of the run, also attached to its log span.
    pub run_id: String,
    /// Normalized request URL.
    pub url: String,
    /// Final URL after redirects, when known.
    pub final_url: Option<String>,
    /// Fetch attempts used.
    pub fetch_attempts: usize,
    /// Characters of normalized text.
    pub text_length: usize,
    /// Number of chunks sent to the model.
    pub chunk_count: usize,
    /// Chunks that contributed to the result.
    pub contributed_chunks: usize,
    /// Chunks where the model found nothing.
    pub empty_chunks: usize,
    /// Chunks skipped after a failure.
    pub failed_chunks: usize,
    /// Strategy used to combine chunk replies.
    pub strategy: ExtractionStrategy,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Wall time of the run.
    pub duration_ms: f64,
    /// The combined value.
    pub value: Value,
    /// The serialized output.
    pub output: String,
}

impl PipelineReport {
    /// Whether any chunk contributed.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.contributed_chunks > 0
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
