//! Shared test data.

use crate::fetch::{FetchConfig, ProxyConfig, RetryConfig};

/// A fully populated proxy configuration.
#[must_use]
pub fn sample_proxy_config() -> ProxyConfig {
    ProxyConfig::new("customer-test", "s3cret", "proxy.example.net:22225")
}

/// Fetch settings with no delay between retries.
#[must_use]
pub fn fast_fetch_config() -> FetchConfig {
    FetchConfig::new().with_retry(RetryConfig::new().with_retry_delay(0.0))
}

/// A small product page with scripts, styles and boilerplate.
#[must_use]
pub fn sample_page() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <title>Acme Widget</title>
    <style>body { font-family: sans-serif; }</style>
    <script>window.analytics = [];</script>
  </head>
  <body>
    <nav><a href="/">Home</a></nav>
    <main>
      <h1>Acme Widget</h1>
      <p class="price">Price: $10</p>
      <script>track("view");</script>
      <ul>
        <li>Durable</li>
        <li>Lightweight</li>
      </ul>
    </main>
  </body>
</html>
"#
    .to_string()
}
