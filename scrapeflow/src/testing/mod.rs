//! Testing utilities for scrapeflow pipelines.
//!
//! This module provides:
//! - A scripted HTTP transport and text generator that record their calls
//! - Fixtures for proxy settings and a sample page

mod fixtures;
mod mocks;

pub use fixtures::{fast_fetch_config, sample_page, sample_proxy_config};
pub use mocks::{RecordedRequest, ScriptedGenerator, ScriptedTransport};
