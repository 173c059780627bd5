//! Protocol traits for the fetch layer.
//!
//! The transport is the only component that touches the network, so tests and
//! alternative clients plug in here.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::config::ProxyConfig;
use crate::errors::NetworkError;

/// A single GET request routed through a proxy.
#[derive(Debug, Clone)]
pub struct FetchRequest<'a> {
    /// Target URL.
    pub url: &'a str,
    /// Proxy to route through.
    pub proxy: &'a ProxyConfig,
    /// Headers to send.
    pub headers: &'a HashMap<String, String>,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
}

/// Raw response returned by a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
    /// Charset declared by the transport, if any.
    pub encoding: Option<String>,
    /// Final URL after redirects.
    pub final_url: Option<String>,
}

impl HttpResponse {
    /// Creates a response with a UTF-8 text body.
    #[must_use]
    pub fn text(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into().into_bytes(),
            encoding: None,
            final_url: None,
        }
    }

    /// Sets the declared encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Protocol for the proxied HTTP GET.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs the request and returns whatever the server answered.
    ///
    /// Non-success statuses are returned as responses, not errors; only
    /// failures to obtain a response are reported as [`NetworkError`].
    async fn get(&self, request: &FetchRequest<'_>) -> Result<HttpResponse, NetworkError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn get(&self, request: &FetchRequest<'_>) -> Result<HttpResponse, NetworkError> {
        (**self).get(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_is_success() {
        assert!(HttpResponse::text(200, "ok").is_success());
        assert!(HttpResponse::text(204, "").is_success());
        assert!(!HttpResponse::text(301, "").is_success());
        assert!(!HttpResponse::text(404, "").is_success());
        assert!(!HttpResponse::text(503, "").is_success());
    }

    #[test]
    fn test_http_response_with_encoding() {
        let response = HttpResponse::text(200, "hi").with_encoding("iso-8859-1");
        assert_eq!(response.encoding.as_deref(), Some("iso-8859-1"));
        assert_eq!(response.body, b"hi".to_vec());
    }
}
