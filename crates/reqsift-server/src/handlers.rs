//! HTTP request handlers for the upload service.
//!
//! Serves the upload page, accepts SRS documents and returns the extracted
//! requirements as JSON.

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use reqsift_domain::traits::{LlmProvider, TextExtractor};
use reqsift_extractor::{ErrorBody, ExtractionRequest, Extractor, ExtractorError};
use reqsift_store::uploads::FALLBACK_FILE_NAME;
use reqsift_store::{FileStore, StoreError, UploadStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// `error` tag reported when the document yields no text
pub const TEXT_EXTRACTION_FAILED: &str = "Failed to extract text from document";

/// `error` tag reported when the upload cannot be saved
pub const UPLOAD_SAVE_FAILED: &str = "Failed to save uploaded file";

const INDEX_HTML: &str = include_str!("index.html");

/// Shared application state
pub struct AppState<L, T>
where
    L: LlmProvider,
{
    /// Extraction pipeline writing into the output directory
    pub extractor: Extractor<L, FileStore>,
    /// Where uploaded documents are kept
    pub uploads: Arc<UploadStore>,
    /// Turns a saved upload into text
    pub documents: Arc<T>,
    /// Maximum accepted request body, in bytes
    pub max_upload_bytes: usize,
}

impl<L, T> Clone for AppState<L, T>
where
    L: LlmProvider,
{
    fn clone(&self) -> Self {
        Self {
            extractor: self.extractor.clone(),
            uploads: Arc::clone(&self.uploads),
            documents: Arc::clone(&self.documents),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Always "ok" while the process serves requests
    pub status: String,
    /// Model answering extraction requests
    pub model: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// The multipart body could not be read
    Multipart(MultipartError),
    /// The request is well formed but lacks what the handler needs
    BadRequest(String),
    /// The upload could not be written to disk
    Upload(StoreError),
    /// The document could not be turned into text
    Document(String),
    /// The extraction pipeline failed
    Extraction(ExtractorError),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Multipart(e) => (e.status(), ErrorBody::new(e.body_text())),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new(msg)),
            AppError::Upload(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new(UPLOAD_SAVE_FAILED).with_exception(e),
            ),
            AppError::Document(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody::new(TEXT_EXTRACTION_FAILED).with_exception(msg),
            ),
            AppError::Extraction(e) => {
                let status = match e {
                    ExtractorError::ModelRequestFailed(_) => StatusCode::BAD_GATEWAY,
                    ExtractorError::ResponseParseFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (status, e.to_body())
            }
            AppError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(msg)),
        };

        (status, Json(body)).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Multipart(e)
    }
}

impl From<ExtractorError> for AppError {
    fn from(e: ExtractorError) -> Self {
        AppError::Extraction(e)
    }
}

/// GET / - Upload page
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /upload_srs/ - Extract requirements from an uploaded document
///
/// Returns the object recovered from the model output, unchanged.
async fn upload_srs<L, T>(
    State(state): State<AppState<L, T>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
    T: TextExtractor + Send + Sync + 'static,
    T::Error: Display,
{
    let (file_name, bytes) = loop {
        let Some(field) = multipart.next_field().await? else {
            return Err(AppError::BadRequest("Missing 'file' field".to_string()));
        };
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or(FALLBACK_FILE_NAME).to_string();
            let bytes = field.bytes().await?;
            break (file_name, bytes);
        }
    };

    info!("Received upload '{}' ({} bytes)", file_name, bytes.len());

    let uploads = Arc::clone(&state.uploads);
    let name = file_name.clone();
    let path = tokio::task::spawn_blocking(move || uploads.save(&name, &bytes))
        .await
        .map_err(|e| AppError::InternalError(format!("Task join error: {}", e)))?
        .map_err(AppError::Upload)?;

    let documents = Arc::clone(&state.documents);
    let text = tokio::task::spawn_blocking(move || {
        documents.extract_text(&path).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Task join error: {}", e)))?
    .map_err(|e| {
        warn!("Text extraction failed for '{}': {}", file_name, e);
        AppError::Document(e)
    })?;

    let output = state
        .extractor
        .extract(ExtractionRequest::new(text, file_name))
        .await?;

    Ok(Json(Value::Object(output.document)))
}

/// GET /health - Liveness check
async fn health_check<L, T>(State(state): State<AppState<L, T>>) -> Json<HealthCheckResponse>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
    T: Send + Sync + 'static,
{
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        model: state.extractor.model_name().to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router<L, T>(state: AppState<L, T>) -> AxumRouter
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
    T: TextExtractor + Send + Sync + 'static,
    T::Error: Display,
{
    let body_limit = state.max_upload_bytes;

    AxumRouter::new()
        .route("/", get(index))
        .route("/upload_srs/", post(upload_srs::<L, T>))
        .route("/health", get(health_check::<L, T>))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use reqsift_extractor::ExtractorConfig;
    use reqsift_llm::MockProvider;
    use std::path::Path;
    use tempfile::TempDir;
    use tower::ServiceExt; // for oneshot

    struct FixedText;

    impl TextExtractor for FixedText {
        type Error = String;

        fn extract_text(&self, _path: &Path) -> Result<String, String> {
            Ok("FR-1 Users shall log in.".to_string())
        }
    }

    fn create_test_state(dir: &TempDir) -> AppState<MockProvider, FixedText> {
        let llm = MockProvider::new("{}").with_model_name("test-model");
        let store = FileStore::new(dir.path().join("out")).unwrap();
        AppState {
            extractor: Extractor::new(llm, store, ExtractorConfig::default()),
            uploads: Arc::new(UploadStore::new(dir.path().join("uploads")).unwrap()),
            documents: Arc::new(FixedText),
            max_upload_bytes: 1024,
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = TempDir::new().unwrap();
        let app = create_router(create_test_state(&dir));

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_page() {
        let dir = TempDir::new().unwrap();
        let app = create_router(create_test_state(&dir));

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("action=\"/upload_srs/\""));
        assert!(html.contains("name=\"file\""));
    }

    #[test]
    fn test_error_statuses() {
        let cases = [
            (
                AppError::Extraction(ExtractorError::ModelRequestFailed("down".to_string())),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Extraction(ExtractorError::ResponseParseFailed {
                    raw_output: "x".to_string(),
                    reason: "y".to_string(),
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::BadRequest("no".to_string()), StatusCode::BAD_REQUEST),
            (AppError::Document("bad".to_string()), StatusCode::UNPROCESSABLE_ENTITY),
            (
                AppError::InternalError("oops".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
