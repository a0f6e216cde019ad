//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, storage
//! directories, the inference endpoint and the prompt budget. Every field has
//! a default, so an empty file is a valid configuration.

use reqsift_extractor::ExtractorConfig;
use reqsift_llm::huggingface::{
    DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default multipart body limit: 25 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Default model identifier
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.1-8B-Instruct";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "HF_API_KEY";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    pub bind_port: u16,

    /// Directory receiving uploaded documents
    pub upload_dir: PathBuf,

    /// Directory receiving the result files
    pub output_dir: PathBuf,

    /// Maximum accepted request body, in bytes
    pub max_upload_bytes: usize,

    /// Inference endpoint settings
    pub llm: LlmConfig,

    /// Prompt and parsing settings
    pub extractor: ExtractorConfig,
}

/// Inference endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the chat-completion API
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Name of the environment variable holding the API key.
    /// The key itself never lives in the file.
    pub api_key_env: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Completion token budget
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request a JSON object response format
    pub json_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8000,
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("."),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            llm: LlmConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            json_mode: true,
        }
    }
}

impl LlmConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.extractor.validate().map_err(ConfigError::Invalid)?;

        if self.llm.model.is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".to_string()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_upload_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
