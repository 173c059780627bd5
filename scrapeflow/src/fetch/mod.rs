//! Page fetching through a residential proxy.
//!
//! This module provides:
//! - Proxy, retry and request configuration
//! - The [`HttpTransport`] protocol and, with the `http` feature, its `reqwest`
//!   implementation
//! - Charset resolution for fetched bodies
//! - [`ProxyFetcher`], the retrying fetch loop

mod config;
mod encoding;
mod fetcher;
mod protocols;
#[cfg(feature = "http")]
mod transport;

pub use config::{duration_from_secs, FetchConfig, ProxyConfig, RetryConfig};
pub use encoding::{decode_body, resolve_encoding, sniff_charset};
pub use fetcher::{validate_url, AttemptOutcome, FetchAttempt, FetchedPage, ProxyFetcher};
pub use protocols::{FetchRequest, HttpResponse, HttpTransport};
#[cfg(feature = "http")]
pub use transport::{charset_from_content_type, ReqwestTransport};
