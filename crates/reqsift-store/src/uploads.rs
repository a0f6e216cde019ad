//! Storage for uploaded source documents

use crate::StoreError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name used when the client supplies no usable file name
pub const FALLBACK_FILE_NAME: &str = "upload.pdf";

/// Saves uploaded documents under a single directory
///
/// Files are named after the client-supplied name, reduced to its last path
/// component. A second upload with the same name replaces the first.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create a store saving into `dir`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
            path: dir.clone(),
            source: e,
        })?;
        Ok(Self { dir })
    }

    /// Upload directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under the sanitized `file_name`, returning the saved path
    pub fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        let path = self.dir.join(sanitize_file_name(file_name));
        std::fs::write(&path, bytes).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e,
        })?;
        debug!("Saved upload {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Reduce a client-supplied file name to a safe single path component
///
/// Both `/` and `\` count as separators, so browser-style
/// `C:\fakepath\srs.pdf` becomes `srs.pdf`. Control characters are dropped.
///
/// # Examples
///
/// ```
/// use reqsift_store::uploads::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
/// assert_eq!(sanitize_file_name(""), "upload.pdf");
/// ```
pub fn sanitize_file_name(file_name: &str) -> String {
    let last = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}
