//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::{parse_llm_response, ParsedResponse};
use crate::prompt::PromptBuilder;
use crate::types::{ExtractionMetadata, ExtractionOutput, ExtractionRequest};
use reqsift_domain::traits::{LlmProvider, ResultStore};
use reqsift_domain::RequirementKind;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Shape hint passed to providers that support structured output
pub const OUTPUT_SCHEMA: &str = r#"{"type":"object","properties":{"functional":{"type":"array"},"non_functional":{"type":"array"}}}"#;

/// The Extractor turns SRS text into persisted requirement lists
///
/// One call to [`Extractor::extract`] walks a single request through
/// prompt, model call, parse and persistence. Nothing is retried.
pub struct Extractor<L, S>
where
    L: LlmProvider,
    S: ResultStore,
{
    llm_provider: Arc<L>,
    store: Arc<S>,
    config: ExtractorConfig,
}

impl<L, S> Clone for Extractor<L, S>
where
    L: LlmProvider,
    S: ResultStore,
{
    fn clone(&self) -> Self {
        Self {
            llm_provider: Arc::clone(&self.llm_provider),
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<L, S> Extractor<L, S>
where
    L: LlmProvider + Send + Sync + 'static,
    S: ResultStore + Send + Sync + 'static,
    L::Error: std::fmt::Display,
    S::Error: std::fmt::Display,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, store: S, config: ExtractorConfig) -> Self {
        Self::from_shared(Arc::new(llm_provider), Arc::new(store), config)
    }

    /// Create an Extractor over already shared components
    pub fn from_shared(llm_provider: Arc<L>, store: Arc<S>, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            store,
            config,
        }
    }

    /// Name of the model answering requests
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// Extract requirements from document text
    ///
    /// On success the recovered object has been written to the store. On a
    /// parse failure the raw model output has been written instead.
    pub async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<ExtractionOutput, ExtractorError> {
        let start_time = Instant::now();
        let input_chars = request.text.chars().count();

        info!(
            "Text extracted from '{}': {} chars",
            request.source_name, input_chars
        );

        let builder = PromptBuilder::new(&request.text).with_max_chars(self.config.max_chars);
        let truncated = builder.is_truncated();
        if truncated {
            info!(
                "Text exceeds {} chars, dropping the remainder",
                self.config.max_chars
            );
        }
        let prompt = builder.build();

        debug!("Prompt length: {} chars", prompt.len());
        info!("Prompt sent to model '{}'", self.model_name());

        let llm_response = match self.call_llm(prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!("{}", e);
                return Err(e);
            }
        };

        info!("Model response received: {} chars", llm_response.len());

        let parsed = match self.parse_and_persist(&llm_response).await {
            Ok(parsed) => parsed,
            Err(reason) => {
                warn!("Parse failed for '{}': {}", request.source_name, reason);
                self.persist_raw_output(&llm_response).await;
                return Err(ExtractorError::ResponseParseFailed {
                    raw_output: llm_response,
                    reason,
                });
            }
        };

        let metadata = ExtractionMetadata {
            source_name: request.source_name,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            model_name: self.model_name().to_string(),
            input_chars,
            truncated,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        for kind in RequirementKind::ALL {
            info!(
                "Extracted {} {} requirements",
                parsed.result.of_kind(kind).len(),
                kind.key()
            );
        }
        info!(
            "{} non-functional descriptions use a modal verb",
            parsed.result.non_functional_with_modal()
        );

        Ok(ExtractionOutput {
            document: parsed.document,
            result: parsed.result,
            metadata,
        })
    }

    /// Parse the model output and persist it
    ///
    /// A storage failure counts as a parse failure so the caller still gets
    /// the raw output.
    async fn parse_and_persist(&self, llm_response: &str) -> Result<ParsedResponse, String> {
        let parsed = parse_llm_response(llm_response).map_err(|e| e.to_string())?;
        info!("Parsed requirement object with {} keys", parsed.document.len());

        let store = Arc::clone(&self.store);
        let document = parsed.document.clone();
        tokio::task::spawn_blocking(move || {
            store
                .save_result(&document)
                .map_err(|e| format!("Failed to persist result: {}", e))
        })
        .await
        .map_err(|e| format!("Task join error: {}", e))??;

        info!("Result persisted");
        Ok(parsed)
    }

    /// Write the raw output for diagnosis; failures are only logged
    async fn persist_raw_output(&self, llm_response: &str) {
        let store = Arc::clone(&self.store);
        let raw = llm_response.to_string();
        let outcome = tokio::task::spawn_blocking(move || {
            store.save_raw_output(&raw).map_err(|e| e.to_string())
        })
        .await;

        match outcome {
            Ok(Ok(())) => info!("Raw model output persisted"),
            Ok(Err(e)) => warn!("Failed to persist raw model output: {}", e),
            Err(e) => warn!("Failed to persist raw model output: task join error: {}", e),
        }
    }

    /// Call the LLM provider
    async fn call_llm(&self, prompt: String) -> Result<String, ExtractorError> {
        let llm = Arc::clone(&self.llm_provider);
        let structured = self.config.structured_output;

        // LlmProvider blocks, so keep it off the async workers
        tokio::task::spawn_blocking(move || {
            let response = if structured {
                llm.generate_structured(&prompt, OUTPUT_SCHEMA)
            } else {
                llm.generate(&prompt)
            };
            response.map_err(|e| ExtractorError::ModelRequestFailed(e.to_string()))
        })
        .await
        .map_err(|e| ExtractorError::ModelRequestFailed(format!("Task join error: {}", e)))?
    }
}
