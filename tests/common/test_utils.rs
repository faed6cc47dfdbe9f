use super::mocks::{MockLlmClient, RecordingStorage};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode},
};
use prompt_gateway::{
    config::{Config, LlmConfig, LogsConfig, ServerConfig},
    llm::{CompletionClient, LlmClient},
    server::{handlers::AppState, router},
    upload::{UploadStager, UploadStorage},
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for `oneshot`

pub const BOUNDARY: &str = "----prompt-gateway-test-boundary";

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
            upload_dir: "uploads".to_string(),
            max_upload_bytes: Some(16 * 1024 * 1024),
        },
        llm: LlmConfig {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: "test-api-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout_secs: 5,
        },
    }
}

pub fn create_test_state(llm: Arc<MockLlmClient>, storage: Arc<dyn UploadStorage>) -> AppState {
    let llm: Arc<dyn LlmClient> = llm;
    AppState {
        completion: CompletionClient::new(llm, Duration::from_secs(5)),
        stager: UploadStager::new(storage),
    }
}

/// Router wired to the given mocks with the default upload cap.
pub fn create_test_app(llm: Arc<MockLlmClient>, storage: Arc<RecordingStorage>) -> Router {
    let config = create_test_config();
    router(
        create_test_state(llm, storage),
        config.server.max_upload_bytes,
    )
}

/// Hand-rolled `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sends one request and returns the status with the parsed JSON body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    read_json(response).await
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
