//! The text-generation protocol and its hosted implementation.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::ModelError;

/// Protocol for a text-generation model.
///
/// Replies are free text that may or may not contain JSON.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a reply for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

#[async_trait]
impl<G: TextGenerator + ?Sized> TextGenerator for Arc<G> {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        (**self).generate(prompt).await
    }
}

#[cfg(feature = "gemini")]
pub use gemini::GeminiGenerator;

#[cfg(feature = "gemini")]
mod gemini {
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;
    use tracing::debug;

    use super::TextGenerator;
    use crate::errors::{ConfigurationError, ModelError};
    use crate::extraction::config::ModelConfig;

    const MAX_ERROR_BODY: usize = 500;

    #[derive(Debug, Deserialize)]
    struct GenerateResponse {
        #[serde(default)]
        candidates: Vec<Candidate>,
    }

    #[derive(Debug, Deserialize)]
    struct Candidate {
        content: Option<Content>,
    }

    #[derive(Debug, Deserialize)]
    struct Content {
        #[serde(default)]
        parts: Vec<Part>,
    }

    #[derive(Debug, Deserialize)]
    struct Part {
        text: Option<String>,
    }

    /// Joins the text parts of the first candidate.
    fn candidate_text(response: GenerateResponse) -> Result<String, ModelError> {
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        Ok(text)
    }

    fn truncate(mut body: String) -> String {
        if let Some((idx, _)) = body.char_indices().nth(MAX_ERROR_BODY) {
            body.truncate(idx);
        }
        body
    }

    /// Calls the Generative Language `generateContent` endpoint.
    #[derive(Debug, Clone)]
    pub struct GeminiGenerator {
        client: reqwest::Client,
        config: ModelConfig,
    }

    impl GeminiGenerator {
        /// Validates `config` and builds the HTTP client.
        pub fn new(config: ModelConfig) -> Result<Self, ConfigurationError> {
            config.validate()?;
            let client = reqwest::Client::builder()
                .timeout(config.timeout())
                .build()
                .map_err(|e| ConfigurationError::ModelClient {
                    reason: e.to_string(),
                })?;
            Ok(Self { client, config })
        }

        /// Gets the model configuration.
        pub fn config(&self) -> &ModelConfig {
            &self.config
        }

        fn url(&self) -> String {
            format!(
                "{}/models/{}:generateContent",
                self.config.endpoint.trim_end_matches('/'),
                self.config.model
            )
        }
    }

    #[async_trait]
    impl TextGenerator for GeminiGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
            let body = json!({
                "contents": [{"role": "user", "parts": [{"text": prompt}]}]
            });
            debug!(model = %self.config.model, prompt_chars = prompt.len(), "Calling model");

            let response = self
                .client
                .post(self.url())
                .header("x-goog-api-key", &self.config.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| ModelError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ModelError::Status {
                    status: status.as_u16(),
                    body: truncate(body),
                });
            }

            let envelope: GenerateResponse = response
                .json()
                .await
                .map_err(|e| ModelError::Decode(e.to_string()))?;
            candidate_text(envelope)
        }
    }

}
