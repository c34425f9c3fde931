use super::*;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    reply: Value,
    seen: Arc<Mutex<Vec<(Value, Option<String>)>>>,
}

async fn handle_generate(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.seen.lock().await.push((body, auth));
    (state.status, Json(state.reply.clone()))
}

async fn spawn_mock(status: StatusCode, reply: Value) -> (Url, MockState) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = MockState {
        status,
        reply,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/generate", post(handle_generate))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let url = Url::parse(&format!("http://{addr}/generate")).expect("url");
    (url, state)
}

fn provider(endpoint: Url, api_key: Option<&str>) -> HttpImageProvider {
    HttpImageProvider::new(
        endpoint,
        api_key.map(str::to_string),
        Duration::from_secs(5),
    )
    .expect("provider")
}

#[tokio::test]
async fn returns_url_and_sends_styled_prompt() {
    let (endpoint, state) = spawn_mock(
        StatusCode::OK,
        json!({ "url": "https://images.example.test/still-life.png" }),
    )
    .await;

    let image = provider(endpoint, Some("secret"))
        .request_image("still life with fruit")
        .await
        .expect("image");
    assert_eq!(image.as_str(), "https://images.example.test/still-life.png");

    let seen = state.seen.lock().await;
    let (body, auth) = &seen[0];
    let prompt = body["prompt"].as_str().expect("prompt");
    assert!(prompt.starts_with("Create a camera obscura style photograph."));
    assert!(prompt.ends_with("Theme: still life with fruit"));
    assert_eq!(body["aspect_ratio"], "3:4");
    assert_eq!(auth.as_deref(), Some("Bearer secret"));
}

#[tokio::test]
async fn inline_image_becomes_data_reference() {
    let (endpoint, _state) = spawn_mock(
        StatusCode::OK,
        json!({ "image_b64": "aGVsbG8=", "mime_type": "image/jpeg" }),
    )
    .await;

    let image = provider(endpoint, None)
        .request_image("harbour at dawn")
        .await
        .expect("image");
    assert_eq!(image.as_str(), "data:image/jpeg;base64,aGVsbG8=");
}

#[tokio::test]
async fn provider_errors_map_to_generation_errors() {
    let (endpoint, _state) = spawn_mock(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({ "error": "overloaded" }),
    )
    .await;
    assert_eq!(
        provider(endpoint, None).request_image("x").await,
        Err(GenerationError::Status(503))
    );

    let (endpoint, _state) = spawn_mock(StatusCode::OK, json!({ "candidates": [] })).await;
    assert!(matches!(
        provider(endpoint, None).request_image("x").await,
        Err(GenerationError::Malformed(_))
    ));

    let (endpoint, _state) = spawn_mock(StatusCode::OK, json!({ "image_b64": "***" })).await;
    assert!(matches!(
        provider(endpoint, None).request_image("x").await,
        Err(GenerationError::Malformed(_))
    ));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let endpoint = Url::parse(&format!("http://{addr}/generate")).expect("url");
    assert!(matches!(
        provider(endpoint, None).request_image("x").await,
        Err(GenerationError::Transport(_))
    ));
}

#[tokio::test]
async fn unavailable_provider_always_fails() {
    assert_eq!(
        UnavailableImageProvider.request_image("anything").await,
        Err(GenerationError::Unavailable)
    );
}
