//! HuggingFaceProvider against an in-process fake chat-completions server

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use reqsift_domain::traits::LlmProvider;
use reqsift_llm::{HuggingFaceProvider, LlmError};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn fake_completion(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorded.bodies.lock().unwrap().push(body);
    recorded.auth.lock().unwrap().push(
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );
    Json(json!({
        "choices": [{
            "message": {"role": "assistant", "content": "{\"functional\": []}"}
        }]
    }))
}

#[tokio::test]
async fn test_complete_sends_chat_request() {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(fake_completion))
        .with_state(recorded.clone());
    let endpoint = serve(app).await;

    let provider = HuggingFaceProvider::new(endpoint, "test-model", Duration::from_secs(5))
        .unwrap()
        .with_api_key("secret-token");

    let text = provider.complete("Extract requirements", true).await.unwrap();
    assert_eq!(text, "{\"functional\": []}");

    let bodies = recorded.bodies.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["model"], "test-model");
    assert_eq!(bodies[0]["messages"][0]["role"], "user");
    assert_eq!(bodies[0]["messages"][0]["content"], "Extract requirements");
    assert_eq!(bodies[0]["max_tokens"], 1500);
    assert_eq!(bodies[0]["response_format"]["type"], "json_object");

    let auth = recorded.auth.lock().unwrap();
    assert_eq!(auth[0].as_deref(), Some("Bearer secret-token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_trait_from_blocking_pool() {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(fake_completion))
        .with_state(recorded.clone());
    let endpoint = serve(app).await;

    let provider =
        HuggingFaceProvider::new(endpoint, "test-model", Duration::from_secs(5)).unwrap();

    let text = tokio::task::spawn_blocking(move || {
        provider.generate_structured("prompt", "json_object")
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(text, "{\"functional\": []}");
    assert_eq!(recorded.bodies.lock().unwrap().len(), 1);
}

async fn error_from(app: Router) -> LlmError {
    let endpoint = serve(app).await;
    let provider =
        HuggingFaceProvider::new(endpoint, "test-model", Duration::from_secs(5)).unwrap();
    provider.complete("prompt", true).await.unwrap_err()
}

#[tokio::test]
async fn test_status_codes_map_to_errors() {
    async fn unauthorized() -> Response {
        (StatusCode::UNAUTHORIZED, "bad token").into_response()
    }
    async fn rate_limited() -> Response {
        StatusCode::TOO_MANY_REQUESTS.into_response()
    }
    async fn unavailable() -> Response {
        (StatusCode::SERVICE_UNAVAILABLE, "overloaded").into_response()
    }

    let err = error_from(Router::new().route("/v1/chat/completions", post(unauthorized))).await;
    assert!(matches!(err, LlmError::Unauthorized(_)), "{:?}", err);

    let err = error_from(Router::new().route("/v1/chat/completions", post(rate_limited))).await;
    assert_eq!(err, LlmError::RateLimitExceeded);

    let err = error_from(Router::new().route("/v1/chat/completions", post(unavailable))).await;
    assert!(
        matches!(&err, LlmError::Communication(msg) if msg.contains("503")),
        "{:?}",
        err
    );

    let err = error_from(Router::new()).await;
    assert_eq!(err, LlmError::ModelNotAvailable("test-model".to_string()));
}

#[tokio::test]
async fn test_empty_choices_is_invalid_response() {
    async fn empty() -> Json<Value> {
        Json(json!({"choices": []}))
    }

    let endpoint = serve(Router::new().route("/v1/chat/completions", post(empty))).await;
    let provider =
        HuggingFaceProvider::new(endpoint, "test-model", Duration::from_secs(5)).unwrap();

    let err = provider.complete("prompt", false).await.unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    async fn slow() -> Json<Value> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Json(json!({"choices": []}))
    }

    let endpoint = serve(Router::new().route("/v1/chat/completions", post(slow))).await;
    let provider =
        HuggingFaceProvider::new(endpoint, "test-model", Duration::from_millis(200)).unwrap();

    let err = provider.complete("prompt", false).await.unwrap_err();
    assert!(matches!(err, LlmError::Timeout(_)));
}

// Requires network access and a real key.
// Run with: HF_API_KEY=hf_... cargo test -p reqsift-llm --test chat_completion_tests -- --ignored
#[tokio::test]
#[ignore]
async fn test_live_endpoint_returns_json() {
    let api_key = std::env::var("HF_API_KEY").expect("HF_API_KEY must be set");
    let provider = HuggingFaceProvider::default_endpoint("meta-llama/Llama-3.1-8B-Instruct")
        .unwrap()
        .with_api_key(api_key);

    let text = provider
        .complete(r#"Return the JSON object {"functional": [], "non_functional": []} and nothing else."#, true)
        .await
        .unwrap();
    assert!(text.contains("functional"));
}
