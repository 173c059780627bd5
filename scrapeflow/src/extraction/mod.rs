//! Structured extraction from page chunks with a text-generation model.
//!
//! This module provides:
//! - [`TextGenerator`], the model protocol, and the hosted Gemini client
//! - Reply sanitation ([`clean_json_response`])
//! - The completeness-preferring [`smart_merge`] algorithm
//! - [`ExtractionEngine`], which folds chunk replies into one value

mod config;
mod engine;
mod merge;
mod model;
mod prompts;
mod sanitize;

pub use config::{ExtractionConfig, ExtractionStrategy, ModelConfig};
pub use engine::{combine_results, ChunkOutcome, ExtractionEngine, ExtractionReport};
pub use merge::{is_empty, merge_objects, smart_merge, smart_merge_all};
#[cfg(feature = "gemini")]
pub use model::GeminiGenerator;
pub use model::TextGenerator;
pub use prompts::PromptBuilder;
pub use sanitize::{clean_json_response, SanitizedReply};
