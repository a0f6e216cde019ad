//! Reqsift Document Reader
//!
//! Implements the `TextExtractor` trait: given the path of an uploaded SRS
//! document, returns its full text with pages concatenated in page order.
//!
//! PDF is the primary format and is read with `pdf-extract`. Plain-text
//! uploads (`.txt`, `.md`) are read as UTF-8 directly.
//!
//! # Examples
//!
//! ```no_run
//! use reqsift_document::DocumentReader;
//! use reqsift_domain::traits::TextExtractor;
//! use std::path::Path;
//!
//! let text = DocumentReader::new().extract_text(Path::new("uploads/srs.pdf")).unwrap();
//! println!("{} characters", text.chars().count());
//! ```

#![warn(missing_docs)]

use reqsift_domain::traits::TextExtractor;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// File could not be read
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// PDF requires a password
    #[error("Document is encrypted or password-protected")]
    Encrypted,

    /// PDF structure could not be parsed
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// Text decoding failed
    #[error("Text extraction failed: {0}")]
    Extraction(String),
}

/// Extracts text from uploaded documents, choosing the reader by extension
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentReader;

impl DocumentReader {
    /// Create a new reader
    pub fn new() -> Self {
        Self
    }

    /// Extract text from PDF bytes, pages in order
    ///
    /// # Errors
    ///
    /// - `DocumentError::Encrypted` - the PDF requires a password
    /// - `DocumentError::InvalidPdf` - the bytes are not a readable PDF
    /// - `DocumentError::Extraction` - any other decoding failure
    pub fn pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            let message = e.to_string();
            let lowered = message.to_lowercase();

            if lowered.contains("encrypted") || lowered.contains("password") {
                DocumentError::Encrypted
            } else if lowered.contains("invalid")
                || lowered.contains("malformed")
                || lowered.contains("corrupt")
                || lowered.contains("parse")
                || lowered.contains("header")
            {
                DocumentError::InvalidPdf(message)
            } else {
                DocumentError::Extraction(message)
            }
        })
    }

    fn is_plain_text(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "txt" | "md" | "text"))
            .unwrap_or(false)
    }
}

impl TextExtractor for DocumentReader {
    type Error = DocumentError;

    fn extract_text(&self, path: &Path) -> Result<String, Self::Error> {
        let bytes = std::fs::read(path)?;

        let text = if Self::is_plain_text(path) {
            String::from_utf8(bytes).map_err(|e| DocumentError::Extraction(e.to_string()))?
        } else {
            Self::pdf_text(&bytes)?
        };

        debug!("Extracted {} chars from {}", text.len(), path.display());
        Ok(text)
    }
}
