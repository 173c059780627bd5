//! # Scrapeflow
//!
//! Fetches a web page through a residential proxy and extracts structured
//! JSON from it with a text-generation model.
//!
//! A run moves through fixed steps:
//!
//! - **Fetch**: proxied GET with browser headers and a fixed retry budget
//! - **Normalize**: the body is reduced to trimmed, non-blank lines of text
//! - **Chunk**: the text is cut into bounded, ordered windows
//! - **Extract**: each chunk is sent to the model and replies are folded into
//!   one value, never letting an empty reply erase extracted data
//! - **Serialize**: the value is written as indented JSON text
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scrapeflow::prelude::*;
//!
//! let proxy = ProxyConfig::new("user", "password", "proxy.example.net:22225");
//! let model = ModelConfig::new(api_key);
//! let pipeline = ScrapePipeline::connect(proxy, model, PipelineConfig::default())?;
//!
//! let json = pipeline
//!     .run_pipeline("https://example.com/product", "product name and price")
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod content;
pub mod errors;
pub mod extraction;
pub mod fetch;
pub mod observability;
pub mod pipeline;
pub mod serializer;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::content::{normalize, split, Chunk, ChunkingConfig};
    pub use crate::errors::{
        ConfigurationError, FetchError, FetchFailureKind, ModelError, NetworkError, ScrapeError,
        ValidationError,
    };
    #[cfg(feature = "gemini")]
    pub use crate::extraction::GeminiGenerator;
    pub use crate::extraction::{
        clean_json_response, smart_merge, ExtractionConfig, ExtractionEngine, ExtractionStrategy,
        ModelConfig, TextGenerator,
    };
    #[cfg(feature = "http")]
    pub use crate::fetch::ReqwestTransport;
    pub use crate::fetch::{FetchConfig, HttpTransport, ProxyConfig, ProxyFetcher, RetryConfig};
    pub use crate::observability::{init_logging, LogFormat};
    pub use crate::pipeline::{PipelineConfig, PipelineReport, ScrapePipeline};
    pub use crate::serializer::ResultSerializer;
}
