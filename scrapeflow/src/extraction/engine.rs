//! Per-chunk model extraction and result combination.

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::config::{ExtractionConfig, ExtractionStrategy};
use super::merge::smart_merge_all;
use super::model::TextGenerator;
use super::prompts::PromptBuilder;
use super::sanitize::{clean_json_response, SanitizedReply};
use crate::content::Chunk;
use crate::serializer::ResultSerializer;

/// What a single chunk contributed.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkOutcome {
    /// The chunk produced a non-empty reply.
    Extracted(SanitizedReply),
    /// The model found nothing.
    Empty,
    /// The model call failed or the reply was unusable.
    Failed {
        /// Why the chunk was skipped.
        reason: String,
    },
}

impl ChunkOutcome {
    /// Whether the chunk contributed to the result.
    #[must_use]
    pub fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted(_))
    }

    /// Whether the chunk failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Result of running the engine over a chunk sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    /// Strategy that produced the value.
    pub strategy: ExtractionStrategy,
    /// Final combined value; an empty object when nothing was extracted.
    pub value: Value,
    /// One outcome per chunk, in chunk order.
    pub outcomes: Vec<ChunkOutcome>,
}

impl ExtractionReport {
    /// Number of chunks that contributed.
    #[must_use]
    pub fn contributed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_extracted()).count()
    }

    /// Number of chunks skipped because of a failure.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Number of chunks for which the model found nothing.
    #[must_use]
    pub fn empty(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ChunkOutcome::Empty))
            .count()
    }
}

/// Runs the model over chunks and folds the replies into one value.
///
/// Chunks are processed strictly in order. A chunk whose call or reply fails
/// is logged and skipped; it never aborts the run.
#[derive(Debug)]
pub struct ExtractionEngine<G> {
    generator: G,
    config: ExtractionConfig,
    serializer: ResultSerializer,
}

impl<G: TextGenerator> ExtractionEngine<G> {
    /// Creates a new engine.
    pub fn new(generator: G, config: ExtractionConfig) -> Self {
        Self {
            generator,
            config,
            serializer: ResultSerializer::default(),
        }
    }

    /// Gets the underlying generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Gets the configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extracts from `chunks` and returns the serialized result.
    pub async fn extract(&self, chunks: &[Chunk], description: &str) -> String {
        let report = self.run(chunks, description).await;
        self.serializer.serialize(&report.value)
    }

    /// Extracts from `chunks` and returns the value with per-chunk outcomes.
    pub async fn run(&self, chunks: &[Chunk], description: &str) -> ExtractionReport {
        match self.config.strategy {
            ExtractionStrategy::Accumulating => self.run_accumulating(chunks, description).await,
            ExtractionStrategy::IndependentMerge => self.run_independent(chunks, description).await,
        }
    }

    async fn run_accumulating(&self, chunks: &[Chunk], description: &str) -> ExtractionReport {
        let total = chunks.len();
        let mut accumulated: Option<Value> = None;
        let mut outcomes = Vec::with_capacity(total);

        for (position, chunk) in chunks.iter().enumerate() {
            let prompt = match &accumulated {
                Some(current) => PromptBuilder::merge(current, &chunk.text, description),
                None => PromptBuilder::initial(&chunk.text, description),
            };

            let outcome = match self.invoke(&prompt, position + 1, total).await {
                ChunkOutcome::Extracted(SanitizedReply::Text(_)) => {
                    warn!(chunk = position + 1, total_chunks = total, "Model reply was not JSON, skipping chunk");
                    ChunkOutcome::Failed {
                        reason: "reply did not contain a JSON object".to_string(),
                    }
                }
                other => other,
            };
            if let ChunkOutcome::Extracted(SanitizedReply::Json(value)) = &outcome {
                accumulated = Some(value.clone());
            }
            outcomes.push(outcome);
        }

        ExtractionReport {
            strategy: ExtractionStrategy::Accumulating,
            value: accumulated.unwrap_or_else(|| Value::Object(Map::new())),
            outcomes,
        }
    }

    async fn run_independent(&self, chunks: &[Chunk], description: &str) -> ExtractionReport {
        let total = chunks.len();
        let mut replies = Vec::new();
        let mut outcomes = Vec::with_capacity(total);

        for (position, chunk) in chunks.iter().enumerate() {
            let prompt = PromptBuilder::initial(&chunk.text, description);
            let outcome = self.invoke(&prompt, position + 1, total).await;
            if let ChunkOutcome::Extracted(reply) = &outcome {
                replies.push(reply.clone());
            }
            outcomes.push(outcome);
        }

        ExtractionReport {
            strategy: ExtractionStrategy::IndependentMerge,
            value: combine_results(replies),
            outcomes,
        }
    }

    async fn invoke(&self, prompt: &str, chunk: usize, total: usize) -> ChunkOutcome {
        match self.generator.generate(prompt).await {
            Ok(reply) => {
                let reply = clean_json_response(reply.trim());
                info!(chunk, total_chunks = total, "Parsed chunk {chunk} of {total}");
                if reply.is_empty() {
                    ChunkOutcome::Empty
                } else {
                    ChunkOutcome::Extracted(reply)
                }
            }
            Err(err) => {
                warn!(chunk, total_chunks = total, error = %err, "Error processing chunk");
                ChunkOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// Combines the non-empty replies of the independent strategy.
///
/// - none: an empty object
/// - one: that reply as-is
/// - all objects: smart-merged in order
/// - otherwise decodable: the ordered list of values
/// - any undecodable reply: the first decodable one
#[must_use]
pub fn combine_results(replies: Vec<SanitizedReply>) -> Value {
    if replies.len() <= 1 {
        return replies
            .into_iter()
            .next()
            .map_or_else(|| Value::Object(Map::new()), SanitizedReply::into_value);
    }

    let decoded: Option<Vec<Value>> = replies.iter().map(SanitizedReply::decode).collect();
    let Some(values) = decoded else {
        return replies
            .iter()
            .find_map(SanitizedReply::decode)
            .unwrap_or_else(|| replies.into_iter().next().map_or(Value::Null, SanitizedReply::into_value));
    };

    if values.iter().all(Value::is_object) {
        let objects = values.into_iter().filter_map(|value| match value {
            Value::Object(map) => Some(map),
            _ => None,
        });
        Value::Object(smart_merge_all(objects))
    } else {
        Value::Array(values)
    }
}
