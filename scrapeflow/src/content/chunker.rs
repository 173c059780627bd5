//! Fixed-size, order-preserving text chunking.

use serde::{Deserialize, Serialize};

/// Default chunk bound in characters.
pub const DEFAULT_MAX_LENGTH: usize = 6000;

/// Configuration for chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
        }
    }
}

impl ChunkingConfig {
    /// Sets the maximum chunk length.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }
}

/// A contiguous slice of normalized page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in the sequence, starting at 0.
    pub index: usize,
    /// Character offset of the first character in the source text.
    pub start: usize,
    /// The chunk text.
    pub text: String,
}

impl Chunk {
    /// Length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Splits `text` into windows of at most `max_length` characters.
///
/// Boundaries are purely length based. Concatenating the chunk texts in order
/// reproduces the input exactly. A bound of zero is treated as one.
#[must_use]
pub fn split(text: &str, max_length: usize) -> Vec<Chunk> {
    let max_length = max_length.max(1);
    let mut chunks = Vec::new();
    let mut start_byte = 0;
    let mut start_char = 0;
    let mut count = 0;

    for (byte_idx, _) in text.char_indices() {
        if count == max_length {
            chunks.push(Chunk {
                index: chunks.len(),
                start: start_char,
                text: text[start_byte..byte_idx].to_string(),
            });
            start_byte = byte_idx;
            start_char += count;
            count = 0;
        }
        count += 1;
    }

    if count > 0 {
        chunks.push(Chunk {
            index: chunks.len(),
            start: start_char,
            text: text[start_byte..].to_string(),
        });
    }
    chunks
}
