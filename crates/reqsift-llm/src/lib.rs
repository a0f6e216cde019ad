//! Reqsift LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `reqsift-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `HuggingFaceProvider`: Hosted chat-completion API (Hugging Face router or
//!   any OpenAI-compatible endpoint)
//!
//! # Examples
//!
//! ```
//! use reqsift_llm::MockProvider;
//! use reqsift_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new(r#"{"functional": [], "non_functional": []}"#);
//! let result = provider.generate("test prompt").unwrap();
//! assert!(result.contains("non_functional"));
//! ```

#![warn(missing_docs)]

pub mod huggingface;

use reqsift_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use huggingface::HuggingFaceProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Request did not complete in time
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Credentials rejected by the service
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Every prompt it receives is recorded so tests can inspect what was sent.
///
/// # Examples
///
/// ```
/// use reqsift_llm::{LlmError, MockProvider};
/// use reqsift_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt").unwrap(), "Fixed response");
///
/// // Always failing
/// let provider = MockProvider::failing(LlmError::Timeout(120));
/// assert_eq!(provider.generate("any prompt"), Err(LlmError::Timeout(120)));
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Result<String, LlmError>,
    responses: Arc<Mutex<HashMap<String, Result<String, LlmError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    model_name: String,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(Ok(response.into()))
    }

    /// Create a MockProvider that fails every call with `error`
    pub fn failing(error: LlmError) -> Self {
        Self::with_default(Err(error))
    }

    fn with_default(default_response: Result<String, LlmError>) -> Self {
        Self {
            default_response,
            responses: Arc::new(Mutex::new(HashMap::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            model_name: "mock".to_string(),
        }
    }

    /// Set the model name reported to callers
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), Ok(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>, error: LlmError) {
        lock(&self.responses).insert(prompt.into(), Err(error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Forget recorded prompts
    pub fn reset_call_count(&self) {
        lock(&self.prompts).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

// Poisoning is ignored: every critical section leaves the data consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        lock(&self.prompts).push(prompt.to_string());

        if let Some(response) = lock(&self.responses).get(prompt) {
            return response.clone();
        }

        self.default_response.clone()
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        self.generate(prompt)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt");
        assert_eq!(result, Ok("Test response".to_string()));
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("hello").unwrap(), "world");
        assert_eq!(provider.generate("foo").unwrap(), "bar");
        assert_eq!(provider.generate("unknown").unwrap(), "Default mock response");
    }

    #[test]
    fn test_mock_provider_records_prompts() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").unwrap();
        provider.generate_structured("prompt2", "json_object").unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts(), vec!["prompt1", "prompt2"]);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt", LlmError::RateLimitExceeded);

        let result = provider.generate("bad prompt");
        assert_eq!(result, Err(LlmError::RateLimitExceeded));
        assert!(provider.generate("good prompt").is_ok());
    }

    #[test]
    fn test_mock_provider_failing() {
        let provider = MockProvider::failing(LlmError::Timeout(120));
        let err = provider.generate("anything").unwrap_err();
        assert_eq!(err.to_string(), "Request timed out after 120 seconds");
    }

    #[test]
    fn test_mock_provider_clone_shares_history() {
        let provider1 = MockProvider::new("test").with_model_name("stub-model");
        let provider2 = provider1.clone();

        provider1.generate("test").unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
        assert_eq!(provider2.model_name(), "stub-model");
    }
}
