//! Configuration types for proxied page fetching.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::ConfigurationError;

/// Credentials and address of the residential proxy.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy account user name.
    #[serde(default)]
    pub username: String,
    /// Proxy account password.
    #[serde(default)]
    pub password: String,
    /// Proxy host and port, optionally with a scheme.
    #[serde(default)]
    pub server_address: String,
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server_address", &self.server_address)
            .finish()
    }
}

impl ProxyConfig {
    /// Creates a proxy configuration.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        server_address: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            server_address: server_address.into(),
        }
    }

    /// Checks that all three values are present and non-blank.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let fields = [
            ("username", &self.username),
            ("password", &self.password),
            ("server_address", &self.server_address),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigurationError::MissingProxyValue { field });
            }
        }
        Ok(())
    }

    /// Proxy endpoint URL without credentials.
    ///
    /// A bare `host:port` address is treated as an http proxy.
    pub fn proxy_url(&self) -> Result<String, ConfigurationError> {
        self.validate()?;
        let address = self.server_address.trim();
        let candidate = if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{address}")
        };

        let parsed = url::Url::parse(&candidate).map_err(|e| {
            ConfigurationError::InvalidProxyAddress {
                address: address.to_string(),
                reason: e.to_string(),
            }
        })?;
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(ConfigurationError::InvalidProxyAddress {
                address: address.to_string(),
                reason: "missing host".to_string(),
            });
        }
        Ok(candidate)
    }
}

/// Converts configured seconds to a duration.
///
/// Negative and NaN values become zero; values too large to represent
/// saturate at [`Duration::MAX`].
#[must_use]
pub fn duration_from_secs(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX)
}

/// Retry policy for page fetches.
///
/// The delay between attempts is constant; there is no backoff or jitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Delay between attempts in seconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: f64,
}

fn default_max_attempts() -> usize {
    3
}

fn default_retry_delay() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_seconds: default_retry_delay(),
        }
    }
}

impl RetryConfig {
    /// Creates a new retry config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the delay between attempts.
    #[must_use]
    pub fn with_retry_delay(mut self, seconds: f64) -> Self {
        self.retry_delay_seconds = seconds;
        self
    }

    /// Delay to wait after the given (1-based) failed attempt.
    #[must_use]
    pub fn delay_for_attempt(&self, _attempt: usize) -> Duration {
        duration_from_secs(self.retry_delay_seconds)
    }

    /// Attempt budget, never below one.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.max_attempts.max(1)
    }
}

/// Configuration for HTTP fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Additional headers sent with every request.
    #[serde(default = "default_headers")]
    pub headers: HashMap<String, String>,
    /// Retry configuration.
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_timeout() -> f64 {
    30.0
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert(
        "Accept".to_string(),
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
    );
    headers.insert("Accept-Language".to_string(), "en-US,en;q=0.9".to_string());
    headers
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            headers: default_headers(),
            retry: RetryConfig::default(),
        }
    }
}

impl FetchConfig {
    /// Creates a new fetch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        duration_from_secs(self.timeout_seconds)
    }

    /// The full header set for a request, user agent included.
    #[must_use]
    pub fn request_headers(&self) -> HashMap<String, String> {
        let mut headers = self.headers.clone();
        headers.insert("User-Agent".to_string(), self.user_agent.clone());
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_config_validate() {
        let config = ProxyConfig::new("user", "secret", "proxy.example.net:9999");
        assert!(config.validate().is_ok());

        let missing = ProxyConfig::new("user", "", "proxy.example.net:9999");
        assert_eq!(
            missing.validate(),
            Err(ConfigurationError::MissingProxyValue { field: "password" })
        );

        let blank = ProxyConfig::new("   ", "secret", "proxy.example.net:9999");
        assert_eq!(
            blank.validate(),
            Err(ConfigurationError::MissingProxyValue { field: "username" })
        );

        let no_server = ProxyConfig::new("user", "secret", "");
        assert_eq!(
            no_server.validate(),
            Err(ConfigurationError::MissingProxyValue { field: "server_address" })
        );
    }

    #[test]
    fn test_proxy_url() {
        let config = ProxyConfig::new("user", "secret", "proxy.example.net:9999");
        assert_eq!(config.proxy_url().unwrap(), "http://proxy.example.net:9999");

        let with_scheme = ProxyConfig::new("user", "secret", "https://proxy.example.net:443");
        assert_eq!(with_scheme.proxy_url().unwrap(), "https://proxy.example.net:443");
    }

    #[test]
    fn test_proxy_debug_redacts_password() {
        let config = ProxyConfig::new("user", "hunter2", "proxy.example.net:9999");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_proxy_config_deserialize_missing_field() {
        let config: ProxyConfig =
            serde_json::from_str(r#"{"username": "u", "server_address": "p:1"}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_config_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(2));
    }

    #[test]
    fn test_duration_from_secs_never_panics() {
        assert_eq!(duration_from_secs(2.5), Duration::from_millis(2500));
        assert_eq!(duration_from_secs(-1.0), Duration::ZERO);
        assert_eq!(duration_from_secs(f64::NAN), Duration::ZERO);
        assert_eq!(duration_from_secs(f64::INFINITY), Duration::MAX);
        assert_eq!(duration_from_secs(1e30), Duration::MAX);
    }

    #[test]
    fn test_oversized_config_values_saturate() {
        let config: FetchConfig = serde_json::from_str(r#"{"timeout_seconds": 1e30}"#).unwrap();
        assert_eq!(config.timeout(), Duration::MAX);

        let retry = RetryConfig::new().with_retry_delay(f64::INFINITY);
        assert_eq!(retry.delay_for_attempt(1), Duration::MAX);
    }

    #[test]
    fn test_retry_config_attempts_floor() {
        let config = RetryConfig::new().with_max_attempts(0);
        assert_eq!(config.attempts(), 1);
    }

    #[test]
    fn test_fetch_config_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_seconds, 30.0);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.user_agent.contains("Chrome/120"));
        assert!(config.headers.contains_key("Accept"));
    }

    #[test]
    fn test_request_headers_include_user_agent() {
        let config = FetchConfig::new()
            .with_user_agent("custom-agent")
            .with_header("X-Trace", "1");
        let headers = config.request_headers();

        assert_eq!(headers.get("User-Agent"), Some(&"custom-agent".to_string()));
        assert_eq!(headers.get("X-Trace"), Some(&"1".to_string()));
    }
}
