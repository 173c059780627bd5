//! Pipeline orchestration.

use tracing::{info, info_span, warn, Instrument};
use url::Url;
use uuid::Uuid;

use super::config::PipelineConfig;
use super::report::PipelineReport;
use crate::content::{normalize, split, ChunkingConfig};
use crate::errors::{ScrapeError, ValidationError};
use crate::extraction::{ExtractionEngine, TextGenerator};
use crate::fetch::{validate_url, HttpTransport, ProxyConfig, ProxyFetcher};
use crate::observability::RunTimer;
use crate::serializer::ResultSerializer;

#[cfg(feature = "gemini")]
use crate::errors::ConfigurationError;
#[cfg(feature = "gemini")]
use crate::extraction::{GeminiGenerator, ModelConfig};
#[cfg(feature = "gemini")]
use crate::fetch::ReqwestTransport;

/// Checks the request arguments.
///
/// A missing URL is reported first, then a missing description, then a
/// malformed URL.
pub fn validate_request(url: &str, description: &str) -> Result<Url, ValidationError> {
    if url.trim().is_empty() {
        return Err(ValidationError::MissingUrl);
    }
    if description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    validate_url(url)
}

/// Fetches a page and extracts structured data from it.
///
/// Each run owns its attempt counter and accumulator, so one pipeline can
/// serve concurrent runs.
#[derive(Debug)]
pub struct ScrapePipeline<T, G> {
    fetcher: ProxyFetcher<T>,
    engine: ExtractionEngine<G>,
    chunking: ChunkingConfig,
    serializer: ResultSerializer,
}

#[cfg(feature = "gemini")]
impl ScrapePipeline<ReqwestTransport, GeminiGenerator> {
    /// Creates a pipeline backed by `reqwest` and the hosted Gemini model.
    ///
    /// Both credential sets are validated here, before any request is made.
    pub fn connect(
        proxy: ProxyConfig,
        model: ModelConfig,
        config: PipelineConfig,
    ) -> Result<Self, ConfigurationError> {
        proxy.validate()?;
        proxy.proxy_url()?;
        let generator = GeminiGenerator::new(model)?;
        Ok(Self::new(ReqwestTransport::new(), generator, proxy, config))
    }
}

impl<T: HttpTransport, G: TextGenerator> ScrapePipeline<T, G> {
    /// Creates a pipeline from its collaborators.
    pub fn new(transport: T, generator: G, proxy: ProxyConfig, config: PipelineConfig) -> Self {
        Self {
            fetcher: ProxyFetcher::new(transport, proxy, config.fetch),
            engine: ExtractionEngine::new(generator, config.extraction),
            chunking: config.chunking,
            serializer: ResultSerializer::default(),
        }
    }

    /// Gets the fetcher.
    pub fn fetcher(&self) -> &ProxyFetcher<T> {
        &self.fetcher
    }

    /// Gets the extraction engine.
    pub fn engine(&self) -> &ExtractionEngine<G> {
        &self.engine
    }

    /// Runs the pipeline and returns the extracted data as JSON text.
    ///
    /// Only validation, configuration and exhausted fetch failures are
    /// returned; chunk-level extraction failures are absorbed.
    pub async fn run_pipeline(&self, url: &str, description: &str) -> Result<String, ScrapeError> {
        self.run_with_report(url, description)
            .await
            .map(|report| report.output)
    }

    /// Runs the pipeline and returns the output with run diagnostics.
    pub async fn run_with_report(
        &self,
        url: &str,
        description: &str,
    ) -> Result<PipelineReport, ScrapeError> {
        let target = validate_request(url, description)?;
        let run_id = Uuid::new_v4();
        let span = info_span!("scrape_pipeline", %run_id, url = %target);

        let result = self.execute(target, description, run_id).instrument(span.clone()).await;
        if let Err(err) = &result {
            span.in_scope(|| warn!(error = %err, kind = err.kind(), "Pipeline run failed"));
        }
        result
    }

    async fn execute(
        &self,
        target: Url,
        description: &str,
        run_id: Uuid,
    ) -> Result<PipelineReport, ScrapeError> {
        let timer = RunTimer::start();
        info!("Pipeline run started");

        let page = self.fetcher.fetch_page(target.as_str()).await?;
        let text = normalize(&page.text);
        let chunks = split(&text, self.chunking.max_length);
        let text_length = text.chars().count();
        info!(text_chars = text_length, chunks = chunks.len(), "Page normalized");

        let extraction = self.engine.run(&chunks, description).await;
        let output = self.serializer.serialize(&extraction.value);

        let report = PipelineReport {
            run_id: run_id.to_string(),
            url: target.to_string(),
            final_url: page.final_url,
            fetch_attempts: page.attempts.len(),
            text_length,
            chunk_count: chunks.len(),
            contributed_chunks: extraction.contributed(),
            empty_chunks: extraction.empty(),
            failed_chunks: extraction.failed(),
            strategy: extraction.strategy,
            started_at: timer.started_at(),
            duration_ms: timer.elapsed_ms(),
            value: extraction.value,
            output,
        };
        info!(
            contributed = report.contributed_chunks,
            failed = report.failed_chunks,
            duration_ms = report.duration_ms,
            "Pipeline run finished"
        );
        Ok(report)
    }
}
