//! The end-to-end scrape pipeline.
//!
//! A run validates the request, fetches the page through the proxy,
//! normalizes and chunks the text, extracts with the model and serializes
//! the combined result. Steps run strictly one after another.

mod config;
mod report;
mod runner;


pub use config::PipelineConfig;
pub use report::PipelineReport;
pub use runner::{validate_request, ScrapePipeline};
