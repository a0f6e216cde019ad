//! Request and response types for extraction

use reqsift_domain::{ExtractionResult, JsonObject};
use serde::{Deserialize, Serialize};

/// Request to extract requirements from document text
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Full text of the source document
    pub text: String,

    /// Name of the source document, for logging
    pub source_name: String,
}

impl ExtractionRequest {
    /// Create a request for `text` read from `source_name`
    pub fn new(text: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_name: source_name.into(),
        }
    }
}

/// Successful outcome of an extraction
#[derive(Debug, Clone)]
pub struct ExtractionOutput {
    /// The JSON object recovered from the model output, unchanged.
    /// This is what the caller receives.
    pub document: JsonObject,

    /// Typed view of the two requirement lists
    pub result: ExtractionResult,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

/// Metadata about an extraction operation
#[derive(Debug, Clone)]
pub struct ExtractionMetadata {
    /// Source document name
    pub source_name: String,

    /// Timestamp when extraction finished (seconds since Unix epoch)
    pub timestamp: u64,

    /// Name of the LLM model used
    pub model_name: String,

    /// Characters of document text before truncation
    pub input_chars: usize,

    /// Whether the text was cut to the character budget
    pub truncated: bool,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Structured error response
///
/// Serialized as `{"error": ..., "raw_output": ..., "exception": ...}`,
/// omitting the fields that do not apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error tag
    pub error: String,

    /// Raw model output, when one was received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,

    /// Underlying failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

impl ErrorBody {
    /// Body carrying only an error tag
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            raw_output: None,
            exception: None,
        }
    }

    /// Attach the underlying failure message
    pub fn with_exception(mut self, exception: impl ToString) -> Self {
        self.exception = Some(exception.to_string());
        self
    }
}
