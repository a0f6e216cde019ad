//! Reqsift Server
//!
//! HTTP front end for requirement extraction. Accepts an SRS upload, reads
//! its text, runs the extraction pipeline and returns the requirements as
//! JSON.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use reqsift_document::DocumentReader;
use reqsift_extractor::Extractor;
use reqsift_llm::{HuggingFaceProvider, LlmError};
use reqsift_store::{FileStore, StoreError, UploadStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "reqsift=info,tower_http=info";

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The API key variable is unset or empty
    #[error("Environment variable {0} is not set")]
    MissingApiKey(String),

    /// The inference client could not be built
    #[error("LLM client error: {0}")]
    Llm(#[from] LlmError),

    /// A storage directory could not be created
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global `tracing` subscriber
///
/// Honors `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`].
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Wire the production components from `config`
///
/// The API key is read from the environment variable named by
/// `llm.api_key_env`.
pub fn build_state(
    config: &ServerConfig,
) -> Result<AppState<HuggingFaceProvider, DocumentReader>, ServerError> {
    let api_key = std::env::var(&config.llm.api_key_env)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ServerError::MissingApiKey(config.llm.api_key_env.clone()))?;

    let llm = HuggingFaceProvider::new(&config.llm.endpoint, &config.llm.model, config.llm.timeout())?
        .with_api_key(api_key)
        .with_max_tokens(config.llm.max_tokens)
        .with_temperature(config.llm.temperature)
        .with_json_mode(config.llm.json_mode);

    let store = FileStore::new(&config.output_dir)?;
    let uploads = UploadStore::new(&config.upload_dir)?;

    Ok(AppState {
        extractor: Extractor::new(llm, store, config.extractor.clone()),
        uploads: Arc::new(uploads),
        documents: Arc::new(DocumentReader::new()),
        max_upload_bytes: config.max_upload_bytes,
    })
}

/// Start the HTTP server
///
/// Builds the pipeline from `config`, binds the listener and serves until
/// the process exits.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Reqsift server");
    info!("Bind address: {}", config.bind_addr());
    info!("Model: {} at {}", config.llm.model, config.llm.endpoint);
    info!("Upload directory: {}", config.upload_dir.display());
    info!("Output directory: {}", config.output_dir.display());

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on http://{}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
