//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Default character budget for the document text embedded in the prompt
pub const DEFAULT_MAX_CHARS: usize = 12_000;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum number of document characters sent to the model.
    /// Text beyond this budget is dropped, not summarized.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Ask the provider to constrain its output to a JSON object
    #[serde(default = "default_structured_output")]
    pub structured_output: bool,
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_structured_output() -> bool {
    true
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chars == 0 {
            return Err("max_chars must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            structured_output: true,
        }
    }
}
