//! Content normalization and chunking.
//!
//! Fetched markup is reduced to the visible text of its body, then cut into
//! bounded windows for the extraction engine.

mod chunker;
mod normalizer;

pub use chunker::{split, Chunk, ChunkingConfig, DEFAULT_MAX_LENGTH};
pub use normalizer::{clean_text, extract_body, normalize};
