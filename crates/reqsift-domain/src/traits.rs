//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction pipeline and
//! infrastructure. Implementations live in other crates.

use crate::JsonObject;
use std::path::Path;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (reqsift-llm). Calls block; async
/// callers run them on the blocking pool.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with structured output (if supported)
    ///
    /// `schema` names the expected shape; providers that cannot constrain
    /// their output may ignore it.
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;

    /// Identifier of the model answering requests
    fn model_name(&self) -> &str {
        "llm"
    }
}

/// Trait for reading the text content of a document
///
/// Implemented by the infrastructure layer (reqsift-document)
pub trait TextExtractor {
    /// Error type for extraction operations
    type Error;

    /// Full text of the document, pages concatenated in page order
    fn extract_text(&self, path: &Path) -> Result<String, Self::Error>;
}

/// Trait for persisting extraction output
///
/// Implemented by the infrastructure layer (reqsift-store). Every write
/// replaces the previous content.
pub trait ResultStore {
    /// Error type for store operations
    type Error;

    /// Persist the parsed object and each requirement list separately
    fn save_result(&self, document: &JsonObject) -> Result<(), Self::Error>;

    /// Persist unparseable model output for offline diagnosis
    fn save_raw_output(&self, raw: &str) -> Result<(), Self::Error>;
}
