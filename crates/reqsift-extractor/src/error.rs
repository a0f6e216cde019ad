//! Error types for the Extractor

use crate::types::ErrorBody;
use thiserror::Error;

/// `error` tag reported when the model call fails
pub const MODEL_REQUEST_FAILED: &str = "Model request failed";

/// `error` tag reported when no JSON object can be recovered
pub const RESPONSE_PARSE_FAILED: &str = "Failed to parse JSON from model output";

/// Errors that can occur during extraction
///
/// Both variants are recoverable: they are reported to the caller as a
/// structured [`ErrorBody`], never as a fault.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    /// The call to the inference service failed (network, auth, timeout,
    /// quota). No model output exists.
    #[error("Model request failed: {0}")]
    ModelRequestFailed(String),

    /// The service answered but no valid JSON object could be extracted,
    /// parsed or persisted. The raw output is kept for diagnosis.
    #[error("Failed to parse JSON from model output: {reason}")]
    ResponseParseFailed {
        /// Model output exactly as received
        raw_output: String,
        /// Why recovery failed
        reason: String,
    },
}

impl ExtractorError {
    /// Response body describing this failure
    pub fn to_body(&self) -> ErrorBody {
        match self {
            ExtractorError::ModelRequestFailed(exception) => ErrorBody {
                error: MODEL_REQUEST_FAILED.to_string(),
                raw_output: None,
                exception: Some(exception.clone()),
            },
            ExtractorError::ResponseParseFailed { raw_output, reason } => ErrorBody {
                error: RESPONSE_PARSE_FAILED.to_string(),
                raw_output: Some(raw_output.clone()),
                exception: Some(reason.clone()),
            },
        }
    }
}
