//! Hugging Face Provider Implementation
//!
//! Talks to a hosted chat-completion API. The default endpoint is the
//! Hugging Face inference router, which speaks the OpenAI chat format, so any
//! OpenAI-compatible server works as well.
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - Configurable endpoint, model, token budget and temperature
//! - JSON mode (`response_format: {"type": "json_object"}`) for structured calls
//! - Client-side request timeout
//!
//! No retries are attempted: a failed call is reported to the caller as is.
//!
//! # Examples
//!
//! ```no_run
//! use reqsift_llm::HuggingFaceProvider;
//! use std::time::Duration;
//!
//! let provider = HuggingFaceProvider::new(
//!     "https://router.huggingface.co",
//!     "meta-llama/Llama-3.1-8B-Instruct",
//!     Duration::from_secs(120),
//! )
//! .unwrap()
//! .with_api_key("hf_...");
//! ```

use crate::LlmError;
use reqsift_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Default inference endpoint
pub const DEFAULT_ENDPOINT: &str = "https://router.huggingface.co";

/// Default timeout for LLM requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default completion token budget
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Chat-completion provider for hosted inference
#[derive(Debug, Clone)]
pub struct HuggingFaceProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    timeout: Duration,
    max_tokens: u32,
    temperature: f32,
    json_mode: bool,
}

/// A role-tagged chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant"
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// A user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the chat-completions API
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Response from the chat-completions API
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl HuggingFaceProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://router.huggingface.co")
    /// - `model`: Model identifier (e.g., "meta-llama/Llama-3.1-8B-Instruct")
    /// - `timeout`: Request timeout applied by the HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            client,
            timeout,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            json_mode: true,
        })
    }

    /// Create a provider against the default endpoint and timeout
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Set the bearer token sent with every request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the completion token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Enable or disable the JSON output hint on structured calls
    ///
    /// Some hosted models reject `response_format`; turn it off for those.
    pub fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    pub(crate) fn build_request(&self, prompt: &str, json: bool) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: (json && self.json_mode).then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }

    /// Send one chat completion and return the generated text
    ///
    /// # Parameters
    ///
    /// - `prompt`: Sent as a single user message
    /// - `json`: Ask the service to constrain output to a JSON object
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The service is unreachable or the request times out
    /// - The API key is rejected or the model is unknown
    /// - The service answers with a non-success status
    /// - The response body has no generated message
    pub async fn complete(&self, prompt: &str, json: bool) -> Result<String, LlmError> {
        let request_body = self.build_request(prompt, json);

        debug!(
            "Sending chat completion to {} (model {}, {} chars)",
            self.endpoint,
            self.model,
            prompt.len()
        );

        let mut request = self.client.post(self.completions_url()).json(&request_body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status {
                reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                    LlmError::Unauthorized(format!("HTTP {}: {}", status, error_text))
                }
                reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(self.model.clone()),
                reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
                _ => LlmError::Communication(format!("HTTP {}: {}", status, error_text)),
            });
        }

        let chat_response = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))
    }

    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout.as_secs())
        } else {
            LlmError::Communication(format!("Request failed: {}", e))
        }
    }
}

/// Drive a future to completion from synchronous code
///
/// Reuses the ambient runtime when called from one of its blocking-pool
/// threads; otherwise spins up a private single-threaded runtime. Must not be
/// called from an async task.
fn block_on<F: Future>(future: F) -> Result<F::Output, LlmError> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Ok(handle.block_on(future)),
        Err(_) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;
            Ok(runtime.block_on(future))
        }
    }
}

impl LlmProviderTrait for HuggingFaceProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        block_on(self.complete(prompt, false))?
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        block_on(self.complete(prompt, true))?
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
