//! Scripted collaborators for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

use crate::errors::{ModelError, NetworkError};
use crate::extraction::TextGenerator;
use crate::fetch::{FetchRequest, HttpResponse, HttpTransport};

/// A request observed by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Requested URL.
    pub url: String,
    /// Headers sent.
    pub headers: HashMap<String, String>,
    /// Timeout in seconds.
    pub timeout_seconds: f64,
    /// Proxy server the request was routed through.
    pub proxy_server: String,
    /// Redirect limit.
    pub max_redirects: usize,
}

/// A transport that replays queued outcomes and records every request.
///
/// When the queue runs dry each further request fails with a network error.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<HttpResponse, NetworkError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    /// Creates a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn push_response(&self, response: HttpResponse) {
        self.outcomes.lock().push_back(Ok(response));
    }

    /// Queues a transport failure.
    pub fn push_error(&self, error: NetworkError) {
        self.outcomes.lock().push_back(Err(error));
    }

    /// Queues a response, builder style.
    #[must_use]
    pub fn with_response(self, response: HttpResponse) -> Self {
        self.push_response(response);
        self
    }

    /// Number of requests received.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Every request received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, request: &FetchRequest<'_>) -> Result<HttpResponse, NetworkError> {
        self.requests.lock().push(RecordedRequest {
            url: request.url.to_string(),
            headers: request.headers.clone(),
            timeout_seconds: request.timeout.as_secs_f64(),
            proxy_server: request.proxy.server_address.clone(),
            max_redirects: request.max_redirects,
        });
        self.outcomes
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(NetworkError::network("no scripted response left")))
    }
}

/// A generator that replays queued replies and records every prompt.
///
/// When the queue runs dry each further call fails with an empty response.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, ModelError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Creates a generator with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply.
    #[must_use]
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies.lock().push_back(Ok(reply.into()));
        self
    }

    /// Queues a failure.
    #[must_use]
    pub fn with_error(self, error: ModelError) -> Self {
        self.replies.lock().push_back(Err(error));
        self
    }

    /// Number of calls received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Every prompt received, in order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts.lock().push(prompt.to_string());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or(Err(ModelError::EmptyResponse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_proxy_config;
    use std::time::Duration;

    #[tokio::test]
    async fn test_scripted_transport_replays_and_records() {
        let transport = ScriptedTransport::new().with_response(HttpResponse::text(200, "a"));
        let proxy = sample_proxy_config();
        let headers = HashMap::new();
        let request = FetchRequest {
            url: "https://example.com",
            proxy: &proxy,
            headers: &headers,
            timeout: Duration::from_secs(5),
            max_redirects: 3,
        };

        assert_eq!(transport.get(&request).await.unwrap().body, b"a".to_vec());
        assert!(transport.get(&request).await.is_err());
        assert_eq!(transport.request_count(), 2);
        assert_eq!(transport.requests()[0].proxy_server, proxy.server_address);
        assert_eq!(transport.requests()[0].timeout_seconds, 5.0);
    }

    #[tokio::test]
    async fn test_scripted_generator_replays_and_records() {
        let generator = ScriptedGenerator::new().with_reply("{}");

        assert_eq!(generator.generate("p1").await.unwrap(), "{}");
        assert_eq!(generator.generate("p2").await, Err(ModelError::EmptyResponse));
        assert_eq!(generator.prompts(), vec!["p1".to_string(), "p2".to_string()]);
    }
}
