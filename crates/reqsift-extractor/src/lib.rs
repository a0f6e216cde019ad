//! Reqsift Extractor
//!
//! Turns the text of a Software Requirements Specification into two lists
//! of requirements using a hosted LLM.
//!
//! # Architecture
//!
//! ```text
//! Text → PromptBuilder → LLM → Parser → ResultStore
//!                                  ↘ raw output (on parse failure)
//! ```
//!
//! Every request is independent. The model is called exactly once and its
//! output is never repaired, only located.
//!
//! # Example Usage
//!
//! ```no_run
//! use reqsift_extractor::{Extractor, ExtractorConfig, ExtractionRequest};
//! use reqsift_llm::MockProvider;
//! use reqsift_store::FileStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"functional": [], "non_functional": []}"#);
//! let store = FileStore::new(".")?;
//! let extractor = Extractor::new(llm, store, ExtractorConfig::default());
//!
//! let output = extractor
//!     .extract(ExtractionRequest::new("FR-1 Users shall log in.", "srs.pdf"))
//!     .await?;
//!
//! println!("Functional: {}", output.result.functional.len());
//! println!("Non-functional: {}", output.result.non_functional.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod types;
mod prompt;
mod parser;
mod extractor;


pub use error::{ExtractorError, MODEL_REQUEST_FAILED, RESPONSE_PARSE_FAILED};
pub use config::{ExtractorConfig, DEFAULT_MAX_CHARS};
pub use types::{ErrorBody, ExtractionMetadata, ExtractionOutput, ExtractionRequest};
pub use prompt::{truncate_chars, PromptBuilder};
pub use parser::{extract_json_object, parse_llm_response, ParseError, ParsedResponse};
pub use extractor::{Extractor, OUTPUT_SCHEMA};
