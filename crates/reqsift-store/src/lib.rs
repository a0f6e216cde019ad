//! Reqsift Storage Layer
//!
//! Implements the `ResultStore` trait on plain files. The output directory is
//! the system's only database: every extraction overwrites the same fixed
//! file names.
//!
//! # Layout
//!
//! - `requirements_detailed.json` - the parsed model object, unchanged
//! - `functional_requirements.json` - its `functional` list
//! - `non_functional_requirements.json` - its `non_functional` list
//! - `requirements_raw.txt` - raw model output, written only when parsing fails
//!
//! JSON is pretty-printed with two-space indentation and non-ASCII text is
//! written as UTF-8, never escaped.
//!
//! # Concurrency
//!
//! There is no locking. Concurrent extractions race on the same files and the
//! last writer wins, file by file.
//!
//! # Examples
//!
//! ```no_run
//! use reqsift_store::FileStore;
//!
//! let store = FileStore::new("output").unwrap();
//! let result = store.load_result().unwrap();
//! println!("{} functional requirements", result.functional.len());
//! ```

#![warn(missing_docs)]

pub mod uploads;

use reqsift_domain::traits::ResultStore;
use reqsift_domain::{ExtractionResult, JsonObject, RequirementKind};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub use uploads::UploadStore;

/// File holding the combined parsed object
pub const DETAILED_FILE: &str = "requirements_detailed.json";

/// File holding raw model output after a parse failure
pub const RAW_OUTPUT_FILE: &str = "requirements_raw.txt";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// File-based implementation of `ResultStore`
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let store = Self {
            root: root.as_ref().to_path_buf(),
        };
        store.ensure_dirs()?;
        Ok(store)
    }

    /// Create the output directory if it does not exist
    pub fn ensure_dirs(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root).map_err(|e| StoreError::io(&self.root, e))
    }

    /// Output directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the combined result file
    pub fn detailed_path(&self) -> PathBuf {
        self.root.join(DETAILED_FILE)
    }

    /// Path of the file holding one requirement list
    pub fn list_path(&self, kind: RequirementKind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    /// Path of the raw-output diagnostic file
    pub fn raw_output_path(&self) -> PathBuf {
        self.root.join(RAW_OUTPUT_FILE)
    }

    /// Read the combined result file back as a typed result
    pub fn load_result(&self) -> Result<ExtractionResult, StoreError> {
        let path = self.detailed_path();
        let contents = std::fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Read the last raw model output written after a parse failure
    pub fn load_raw_output(&self) -> Result<String, StoreError> {
        let path = self.raw_output_path();
        std::fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))
    }

    fn write_json(&self, path: &Path, value: &Value) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(value)?;
        std::fs::write(path, contents).map_err(|e| StoreError::io(path, e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl ResultStore for FileStore {
    type Error = StoreError;

    fn save_result(&self, document: &JsonObject) -> Result<(), Self::Error> {
        self.write_json(&self.detailed_path(), &Value::Object(document.clone()))?;

        for kind in RequirementKind::ALL {
            let list = document
                .get(kind.key())
                .filter(|v| !v.is_null())
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new()));
            self.write_json(&self.list_path(kind), &list)?;
        }

        Ok(())
    }

    fn save_raw_output(&self, raw: &str) -> Result<(), Self::Error> {
        let path = self.raw_output_path();
        std::fs::write(&path, raw).map_err(|e| StoreError::io(&path, e))?;
        debug!("Wrote {} ({} bytes)", path.display(), raw.len());
        Ok(())
    }
}
