//! Retrying page fetcher that routes every request through the proxy.

use encoding_rs::Encoding;
use tracing::{debug, info, warn};
use url::Url;

use super::config::{FetchConfig, ProxyConfig};
use super::encoding::decode_body;
use super::protocols::{FetchRequest, HttpResponse, HttpTransport};
use crate::errors::{FetchError, FetchFailureKind, NetworkError, ScrapeError, ValidationError};

/// Validates that `url` is an absolute http(s) URL with a host.
pub fn validate_url(url: &str) -> Result<Url, ValidationError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingUrl);
    }

    let parsed = Url::parse(trimmed).map_err(|e| ValidationError::invalid_url(trimmed, e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ValidationError::UnsupportedScheme {
                scheme: other.to_string(),
            })
        }
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::invalid_url(trimmed, "missing host"));
    }
    Ok(parsed)
}

/// Outcome of one fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The attempt produced a non-empty body of this many bytes.
    Success {
        /// Body size in bytes.
        bytes: usize,
    },
    /// The attempt failed.
    Failure {
        /// Failure class.
        kind: FetchFailureKind,
        /// Failure detail.
        message: String,
    },
}

/// Record of one fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt {
    /// 1-based attempt number.
    pub attempt: usize,
    /// What happened.
    pub outcome: AttemptOutcome,
}

/// A successfully fetched and decoded page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Requested URL.
    pub url: String,
    /// Final URL after redirects, when the transport reports one.
    pub final_url: Option<String>,
    /// HTTP status of the successful attempt.
    pub status_code: u16,
    /// Name of the encoding used to decode the body.
    pub encoding: &'static str,
    /// Decoded page text.
    pub text: String,
    /// Every attempt made, in order.
    pub attempts: Vec<FetchAttempt>,
}

/// Fetches pages through a residential proxy with a fixed retry budget.
///
/// Each call owns its attempt counter; nothing is shared between calls.
pub struct ProxyFetcher<T> {
    transport: T,
    proxy: ProxyConfig,
    config: FetchConfig,
}

impl<T> std::fmt::Debug for ProxyFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyFetcher")
            .field("proxy", &self.proxy)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: HttpTransport> ProxyFetcher<T> {
    /// Creates a new fetcher.
    pub fn new(transport: T, proxy: ProxyConfig, config: FetchConfig) -> Self {
        Self {
            transport,
            proxy,
            config,
        }
    }

    /// Gets the fetch configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Gets the proxy configuration.
    pub fn proxy(&self) -> &ProxyConfig {
        &self.proxy
    }

    /// Gets the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches `url` and returns the decoded page text.
    pub async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        self.fetch_page(url).await.map(|page| page.text)
    }

    /// Fetches `url` and returns the page with its attempt log.
    ///
    /// The URL and the proxy configuration are checked before any network
    /// activity; neither failure is retried.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        let parsed = validate_url(url)?;
        self.proxy.validate()?;
        Ok(self.fetch_with_retry(parsed.as_str()).await?)
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let max_attempts = self.config.retry.attempts();
        let headers = self.config.request_headers();
        let request = FetchRequest {
            url,
            proxy: &self.proxy,
            headers: &headers,
            timeout: self.config.timeout(),
            max_redirects: self.config.max_redirects,
        };

        let mut attempts = Vec::with_capacity(max_attempts);
        let mut last_error = NetworkError::network("no attempt was made");

        for attempt in 1..=max_attempts {
            info!(attempt, max_attempts, url, "Fetching page via proxy");

            match self.attempt_once(&request).await {
                Ok((response, text, encoding)) => {
                    attempts.push(FetchAttempt {
                        attempt,
                        outcome: AttemptOutcome::Success {
                            bytes: response.body.len(),
                        },
                    });
                    info!(
                        attempt,
                        status = response.status_code,
                        bytes = response.body.len(),
                        encoding = encoding.name(),
                        "Page content retrieved"
                    );
                    return Ok(FetchedPage {
                        url: url.to_string(),
                        final_url: response.final_url,
                        status_code: response.status_code,
                        encoding: encoding.name(),
                        text,
                        attempts,
                    });
                }
                Err(err) => {
                    warn!(attempt, max_attempts, error = %err, "Fetch attempt failed");
                    attempts.push(FetchAttempt {
                        attempt,
                        outcome: AttemptOutcome::Failure {
                            kind: err.kind,
                            message: err.message.clone(),
                        },
                    });
                    last_error = err;

                    if attempt < max_attempts {
                        let delay = self.config.retry.delay_for_attempt(attempt);
                        debug!(
                            attempt,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "Retrying after delay"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(FetchError::new(last_error.kind, max_attempts, last_error.message))
    }

    async fn attempt_once(
        &self,
        request: &FetchRequest<'_>,
    ) -> Result<(HttpResponse, String, &'static Encoding), NetworkError> {
        let response = self.transport.get(request).await?;

        if !response.is_success() {
            let kind = if response.status_code == 407 {
                FetchFailureKind::Proxy
            } else {
                FetchFailureKind::Http
            };
            return Err(NetworkError::new(
                kind,
                format!("HTTP status {} for {}", response.status_code, request.url),
            ));
        }

        let (text, encoding) = decode_body(&response.body, response.encoding.as_deref());
        if text.is_empty() {
            return Err(NetworkError::network("Empty page content received"));
        }
        Ok((response, text, encoding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::RetryConfig;
    use crate::testing::{sample_proxy_config, ScriptedTransport};
    use std::time::Duration;
    use tokio::time::Instant;

    fn fast_config() -> FetchConfig {
        FetchConfig::new().with_retry(RetryConfig::new().with_retry_delay(0.0))
    }

    fn fetcher(transport: ScriptedTransport) -> ProxyFetcher<ScriptedTransport> {
        ProxyFetcher::new(transport, sample_proxy_config(), fast_config())
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/page").is_ok());
        assert!(validate_url("http://example.com").is_ok());
        assert_eq!(validate_url("  "), Err(ValidationError::MissingUrl));
        assert!(matches!(
            validate_url("ftp://example.com"),
            Err(ValidationError::UnsupportedScheme { .. })
        ));
        assert!(matches!(
            validate_url("example.com/page"),
            Err(ValidationError::InvalidUrl { .. })
        ));
        assert!(matches!(
            validate_url("mailto:someone@example.com"),
            Err(ValidationError::UnsupportedScheme { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_success_first_attempt() {
        let transport = ScriptedTransport::new();
        transport.push_response(HttpResponse::text(200, "<html><body>hi</body></html>"));
        let fetcher = fetcher(transport);

        let page = fetcher.fetch_page("https://example.com").await.unwrap();
        assert_eq!(page.text, "<html><body>hi</body></html>");
        assert_eq!(page.attempts.len(), 1);
        assert_eq!(fetcher.transport().request_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_success_on_second_attempt_stops() {
        let transport = ScriptedTransport::new();
        transport.push_error(NetworkError::timeout("read timed out"));
        transport.push_response(HttpResponse::text(200, "<html>ok</html>"));
        transport.push_response(HttpResponse::text(200, "<html>never</html>"));
        let fetcher = fetcher(transport);

        let text = fetcher.fetch("https://example.com").await.unwrap();
        assert_eq!(text, "<html>ok</html>");
        assert_eq!(fetcher.transport().request_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_exhausts_three_attempts() {
        let transport = ScriptedTransport::new();
        for _ in 0..5 {
            transport.push_response(HttpResponse::text(503, "busy"));
        }
        let fetcher = fetcher(transport);

        let err = fetcher.fetch("https://example.com").await.unwrap_err();
        match err {
            ScrapeError::Fetch(e) => {
                assert_eq!(e.kind, FetchFailureKind::Http);
                assert_eq!(e.attempts, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fetcher.transport().request_count(), 3);
    }

    #[tokio::test]
    async fn test_fetch_empty_body_is_a_failed_attempt() {
        let transport = ScriptedTransport::new();
        transport.push_response(HttpResponse::text(200, ""));
        transport.push_response(HttpResponse::text(200, "<p>content</p>"));
        let fetcher = fetcher(transport);

        let page = fetcher.fetch_page("https://example.com").await.unwrap();
        assert_eq!(page.attempts.len(), 2);
        assert!(matches!(
            page.attempts[0].outcome,
            AttemptOutcome::Failure { kind: FetchFailureKind::Network, .. }
        ));
    }

    #[tokio::test]
    async fn test_fetch_proxy_auth_status_is_proxy_error() {
        let transport = ScriptedTransport::new();
        for _ in 0..3 {
            transport.push_response(HttpResponse::text(407, ""));
        }
        let fetcher = fetcher(transport);

        let err = fetcher.fetch("https://example.com").await.unwrap_err();
        assert!(err.to_string().contains("proxy error"));
    }

    #[tokio::test]
    async fn test_fetch_invalid_url_makes_no_request() {
        let fetcher = fetcher(ScriptedTransport::new());

        let err = fetcher.fetch("ftp://example.com").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Validation(_)));
        assert_eq!(fetcher.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_missing_proxy_value_makes_no_request() {
        let proxy = ProxyConfig::new("user", "secret", "");
        let fetcher = ProxyFetcher::new(ScriptedTransport::new(), proxy, fast_config());

        let err = fetcher.fetch("https://example.com").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Configuration(_)));
        assert_eq!(fetcher.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers_and_timeout() {
        let transport = ScriptedTransport::new();
        transport.push_response(HttpResponse::text(200, "x"));
        let fetcher = fetcher(transport);

        fetcher.fetch("https://example.com/a").await.unwrap();
        let requests = fetcher.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://example.com/a");
        assert!(requests[0].headers.contains_key("User-Agent"));
        assert_eq!(requests[0].timeout_seconds, 30.0);
    }

    #[tokio::test]
    async fn test_fetch_decodes_declared_encoding() {
        let transport = ScriptedTransport::new();
        transport.push_response(HttpResponse {
            status_code: 200,
            body: b"caf\xe9".to_vec(),
            encoding: Some("iso-8859-1".to_string()),
            final_url: None,
        });
        let fetcher = fetcher(transport);

        let page = fetcher.fetch_page("https://example.com").await.unwrap();
        assert_eq!(page.text, "café");
        assert_eq!(page.encoding, "windows-1252");
    }

    #[tokio::test]
    async fn test_fetch_reports_bom_encoding_over_declared() {
        let mut body = vec![0xEF, 0xBB, 0xBF];
        body.extend_from_slice("héllo".as_bytes());
        let transport = ScriptedTransport::new();
        transport.push_response(HttpResponse {
            status_code: 200,
            body,
            encoding: Some("windows-1252".to_string()),
            final_url: None,
        });
        let fetcher = fetcher(transport);

        let page = fetcher.fetch_page("https://example.com").await.unwrap();
        assert_eq!(page.text, "héllo");
        assert_eq!(page.encoding, "UTF-8");
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_delay_between_failed_attempts() {
        let transport = ScriptedTransport::new();
        for _ in 0..3 {
            transport.push_response(HttpResponse::text(503, "busy"));
        }
        let fetcher = ProxyFetcher::new(transport, sample_proxy_config(), FetchConfig::new());

        let start = Instant::now();
        let err = fetcher.fetch("https://example.com").await.unwrap_err();

        assert!(matches!(err, ScrapeError::Fetch(_)));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(4), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(4100), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_after_successful_attempt() {
        let transport = ScriptedTransport::new();
        transport.push_response(HttpResponse::text(503, "busy"));
        transport.push_response(HttpResponse::text(200, "<html>ok</html>"));
        let fetcher = ProxyFetcher::new(transport, sample_proxy_config(), FetchConfig::new());

        let start = Instant::now();
        let text = fetcher.fetch("https://example.com").await.unwrap();

        assert_eq!(text, "<html>ok</html>");
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(2100), "elapsed {elapsed:?}");
    }
}
