//! Error types for the scrapeflow pipeline.
//!
//! Only [`ValidationError`], [`ConfigurationError`] and an exhausted
//! [`FetchError`] ever reach the caller, wrapped in [`ScrapeError`].
//! Collaborator failures ([`NetworkError`], [`ModelError`]) are consumed
//! inside the fetcher and the extraction engine.

use serde_json::{json, Map, Value};
use thiserror::Error;

/// The caller-facing error type of a pipeline run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The request itself was malformed.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Required configuration was missing or unusable.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// The page could not be fetched within the attempt budget.
    #[error("{0}")]
    Fetch(#[from] FetchError),
}

impl ScrapeError {
    /// Short type tag used in serialized error bodies.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Configuration(_) => "ConfigurationError",
            Self::Fetch(_) => "FetchError",
        }
    }

    /// Returns true when the caller is at fault.
    ///
    /// Request routers map this to a 4xx response and everything else to 5xx.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut map = match self {
            Self::Validation(e) => e.to_dict(),
            Self::Configuration(e) => e.to_dict(),
            Self::Fetch(e) => e.to_dict(),
        };
        map.insert("type".to_string(), json!(self.kind()));
        map.insert("message".to_string(), json!(self.to_string()));
        map
    }
}

/// Errors in the request arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No URL was supplied.
    #[error("URL is required")]
    MissingUrl,

    /// The URL could not be parsed or has no host.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The URL scheme is neither http nor https.
    #[error("URL must use http or https protocol (got '{scheme}')")]
    UnsupportedScheme {
        /// The rejected scheme.
        scheme: String,
    },

    /// No extraction description was supplied.
    #[error("parse_description is required")]
    MissingDescription,
}

impl ValidationError {
    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("type".to_string(), json!("ValidationError"));
        match self {
            Self::InvalidUrl { url, reason } => {
                map.insert("url".to_string(), json!(url));
                map.insert("reason".to_string(), json!(reason));
            }
            Self::UnsupportedScheme { scheme } => {
                map.insert("scheme".to_string(), json!(scheme));
            }
            Self::MissingUrl | Self::MissingDescription => {}
        }
        map.insert("message".to_string(), json!(self.to_string()));
        map
    }
}

/// Errors caused by missing or malformed operator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A proxy credential value is absent or blank.
    #[error("Proxy configuration is incomplete: '{field}' is missing")]
    MissingProxyValue {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A model client setting is absent or blank.
    #[error("Model configuration is incomplete: '{field}' is missing")]
    MissingModelValue {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The model client could not be constructed.
    #[error("Could not initialize model client: {reason}")]
    ModelClient {
        /// Why construction failed.
        reason: String,
    },

    /// The proxy server address cannot be turned into a proxy URL.
    #[error("Invalid proxy address '{address}': {reason}")]
    InvalidProxyAddress {
        /// The configured address.
        address: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigurationError {
    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("type".to_string(), json!("ConfigurationError"));
        match self {
            Self::MissingProxyValue { field } | Self::MissingModelValue { field } => {
                map.insert("field".to_string(), json!(field));
            }
            Self::InvalidProxyAddress { address, .. } => {
                map.insert("address".to_string(), json!(address));
            }
            Self::ModelClient { .. } => {}
        }
        map.insert("message".to_string(), json!(self.to_string()));
        map
    }
}

/// Class of a failed fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    /// The proxy refused or failed the tunnel.
    Proxy,
    /// The request did not complete within the timeout.
    Timeout,
    /// The server answered with a non-success status.
    Http,
    /// Any other transport failure, including an empty body.
    Network,
}

impl FetchFailureKind {
    /// Human-readable class name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Proxy => "proxy error",
            Self::Timeout => "timeout",
            Self::Http => "HTTP error",
            Self::Network => "network error",
        }
    }
}

impl std::fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal error raised once every fetch attempt has failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to fetch after {attempts} attempts ({kind}): {message}")]
pub struct FetchError {
    /// Class of the last failure.
    pub kind: FetchFailureKind,
    /// Number of attempts made.
    pub attempts: usize,
    /// Message of the last failure.
    pub message: String,
}

impl FetchError {
    /// Creates a new fetch error.
    #[must_use]
    pub fn new(kind: FetchFailureKind, attempts: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            attempts,
            message: message.into(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("type".to_string(), json!("FetchError"));
        map.insert("kind".to_string(), json!(self.kind.as_str()));
        map.insert("attempts".to_string(), json!(self.attempts));
        map.insert("message".to_string(), json!(self.to_string()));
        map
    }
}

/// Failure reported by the HTTP transport for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct NetworkError {
    /// Class of the failure.
    pub kind: FetchFailureKind,
    /// Transport-provided detail.
    pub message: String,
}

impl NetworkError {
    /// Creates a new network error.
    #[must_use]
    pub fn new(kind: FetchFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a proxy error.
    #[must_use]
    pub fn proxy(message: impl Into<String>) -> Self {
        Self::new(FetchFailureKind::Proxy, message)
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FetchFailureKind::Timeout, message)
    }

    /// Creates a generic network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FetchFailureKind::Network, message)
    }
}

/// Failure of a single text-generation call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The request never produced a response.
    #[error("Model request failed: {0}")]
    Request(String),

    /// The model endpoint answered with a non-success status.
    #[error("Model returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The response held no text.
    #[error("Model returned no text")]
    EmptyResponse,

    /// The response envelope could not be decoded.
    #[error("Could not decode model response: {0}")]
    Decode(String),
}
