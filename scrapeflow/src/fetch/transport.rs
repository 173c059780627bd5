//! `reqwest`-backed transport.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::redirect::Policy;
use tracing::warn;

use super::protocols::{FetchRequest, HttpResponse, HttpTransport};
use crate::errors::NetworkError;

/// Production transport that issues real HTTP requests.
///
/// A fresh client is built for every request so that proxy credentials are
/// never shared between fetches.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    /// Creates a new transport.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn build_client(request: &FetchRequest<'_>) -> Result<reqwest::Client, NetworkError> {
        let proxy_url = request
            .proxy
            .proxy_url()
            .map_err(|e| NetworkError::proxy(e.to_string()))?;
        let proxy = reqwest::Proxy::all(&proxy_url)
            .map_err(|e| NetworkError::proxy(error_chain(&e)))?
            .basic_auth(&request.proxy.username, &request.proxy.password);

        reqwest::Client::builder()
            .proxy(proxy)
            .timeout(request.timeout)
            .redirect(Policy::limited(request.max_redirects))
            .build()
            .map_err(|e| NetworkError::network(error_chain(&e)))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &FetchRequest<'_>) -> Result<HttpResponse, NetworkError> {
        let client = Self::build_client(request)?;

        let response = client
            .get(request.url)
            .headers(header_map(request))
            .send()
            .await
            .map_err(classify_error)?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let encoding = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type);
        let body = response.bytes().await.map_err(classify_error)?;

        Ok(HttpResponse {
            status_code,
            body: body.to_vec(),
            encoding,
            final_url: Some(final_url),
        })
    }
}

fn header_map(request: &FetchRequest<'_>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (key, value) in request.headers {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!(header = %key, "Skipping invalid request header"),
        }
    }
    headers
}

fn classify_error(err: reqwest::Error) -> NetworkError {
    let message = error_chain(&err);
    if err.is_timeout() {
        NetworkError::timeout(message)
    } else if message.to_lowercase().contains("proxy") {
        NetworkError::proxy(message)
    } else {
        NetworkError::network(message)
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}

/// Extracts the `charset` parameter from a Content-Type value.
#[must_use]
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        (!value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::ProxyConfig;
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(
            charset_from_content_type("text/html; charset=ISO-8859-1"),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(
            charset_from_content_type("text/html;Charset=\"utf-8\""),
            Some("utf-8".to_string())
        );
        assert_eq!(charset_from_content_type("text/html"), None);
        assert_eq!(charset_from_content_type("text/html; charset="), None);
    }

    #[test]
    fn test_header_map_skips_invalid() {
        let proxy = ProxyConfig::new("u", "p", "proxy.example.net:8000");
        let mut headers = HashMap::new();
        headers.insert("User-Agent".to_string(), "agent".to_string());
        headers.insert("Bad Header".to_string(), "x".to_string());
        let request = FetchRequest {
            url: "https://example.com",
            proxy: &proxy,
            headers: &headers,
            timeout: Duration::from_secs(1),
            max_redirects: 5,
        };

        let map = header_map(&request);
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("user-agent"));
    }

    #[test]
    fn test_build_client_with_valid_proxy() {
        let proxy = ProxyConfig::new("u", "p", "proxy.example.net:8000");
        let headers = HashMap::new();
        let request = FetchRequest {
            url: "https://example.com",
            proxy: &proxy,
            headers: &headers,
            timeout: Duration::from_secs(1),
            max_redirects: 5,
        };

        assert!(ReqwestTransport::build_client(&request).is_ok());
    }

    #[test]
    fn test_build_client_with_missing_proxy_is_proxy_error() {
        let proxy = ProxyConfig::new("u", "p", "");
        let headers = HashMap::new();
        let request = FetchRequest {
            url: "https://example.com",
            proxy: &proxy,
            headers: &headers,
            timeout: Duration::from_secs(1),
            max_redirects: 5,
        };

        let err = ReqwestTransport::build_client(&request).unwrap_err();
        assert_eq!(err.kind, crate::errors::FetchFailureKind::Proxy);
    }
}
