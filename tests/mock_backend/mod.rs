//! Mock Synetra backend for integration testing
//!
//! Serves the subset of the REST API the dashboard uses, checks bearer
//! tokens, and records every schedule request it receives.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_EMAIL: &str = "ana@example.com";
pub const TEST_PASSWORD: &str = "secret";
pub const TEST_USER_ID: i64 = 7;

/// One multipart upload as the backend received it
#[derive(Clone, Debug)]
pub struct ReceivedUpload {
    pub path: &'static str,
    pub content_type: String,
    /// Raw multipart body, lossily decoded
    pub body: String,
}

impl ReceivedUpload {
    /// Value of a text field, read straight out of the multipart body
    pub fn field(&self, name: &str) -> Option<&str> {
        let marker = format!("name=\"{}\"\r\n\r\n", name);
        let start = self.body.find(&marker)? + marker.len();
        let len = self.body[start..].find("\r\n")?;
        Some(&self.body[start..start + len])
    }
}

/// Mock backend state
struct MockBackendState {
    devices: Vec<Value>,
    videos: Vec<Value>,
    next_videos: Vec<Value>,
    /// Bodies of every `create-multiple` call, in arrival order
    batch_requests: Vec<Value>,
    single_requests: Vec<Value>,
    uploads: Vec<ReceivedUpload>,
    /// Reply to `create-multiple` with this status and body instead of succeeding
    batch_failure: Option<(StatusCode, Value)>,
    next_group_id: i64,
}

type Shared = Arc<RwLock<MockBackendState>>;

/// Mock backend server
pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Start a mock backend on a random port
    pub async fn start() -> Self {
        let state = Arc::new(RwLock::new(MockBackendState {
            devices: vec![
                json!({"device_id": 1, "device_code": "DEV-1", "status": "active"}),
                json!({"device_id": 2, "device_code": "DEV-2", "status": "inactive"}),
            ],
            videos: vec![
                json!({"videoId": 10, "title": "Intro", "duration": 42.5, "videoUrl": "https://cdn.example/intro.mp4"}),
                json!({"videoId": 11, "title": "Promo"}),
            ],
            next_videos: vec![
                json!({"videoId": 10, "title": "Intro", "startTime": "2030-01-01T08:00:00", "deviceId": 1}),
            ],
            batch_requests: Vec::new(),
            single_requests: Vec::new(),
            uploads: Vec::new(),
            batch_failure: None,
            next_group_id: 100,
        }));

        let app = Router::new()
            .route("/auth/login", post(handle_login))
            .route("/auth/users/{id}", get(handle_user))
            .route("/api/devices/list", get(handle_devices))
            .route(
                "/api/devices/{id}/download-config",
                get(handle_download_config),
            )
            .route("/api/videos/my-videos", get(handle_videos))
            .route("/api/videos/my-next-videos", get(handle_next_videos))
            .route("/api/videos/delete/{id}", delete(handle_delete_video))
            .route("/api/videos/upload", post(handle_upload_video))
            .route("/auth/upload-photo", post(handle_upload_photo))
            .route("/api/schedules/create", post(handle_create_single))
            .route("/api/schedules/create-multiple", post(handle_create_multiple))
            .route("/api/echo", any(handle_echo))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Get the server address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL, e.g. `http://127.0.0.1:41234`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make `create-multiple` fail with the given status and JSON body
    pub async fn fail_batches(&self, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap();
        self.state.write().await.batch_failure = Some((status, body));
    }

    /// Let `create-multiple` succeed again
    pub async fn accept_batches(&self) {
        self.state.write().await.batch_failure = None;
    }

    pub async fn batch_requests(&self) -> Vec<Value> {
        self.state.read().await.batch_requests.clone()
    }

    pub async fn single_requests(&self) -> Vec<Value> {
        self.state.read().await.single_requests.clone()
    }

    pub async fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.read().await.uploads.clone()
    }

    pub async fn video_count(&self) -> usize {
        self.state.read().await.videos.len()
    }

    /// Stop the mock server
    pub async fn stop(self) {
        self.handle.abort();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TEST_TOKEN))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"msg": "token expired"})),
    )
        .into_response()
}

async fn handle_login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if email == TEST_EMAIL && password == TEST_PASSWORD {
        Json(json!({
            "token": TEST_TOKEN,
            "user": {"id": TEST_USER_ID, "email": TEST_EMAIL, "username": "ana"}
        }))
        .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid email or password"})),
        )
            .into_response()
    }
}

async fn handle_user(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "userId": id,
        "username": "ana",
        "email": TEST_EMAIL,
        "created_at": "2025-01-01T00:00:00Z"
    }))
    .into_response()
}

async fn handle_devices(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let devices = state.read().await.devices.clone();
    Json(json!({ "devices": devices })).into_response()
}

async fn handle_download_config(headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"device-{}.zip\"", id),
            ),
        ],
        b"PK\x03\x04mock".to_vec(),
    )
        .into_response()
}

async fn handle_videos(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(Value::Array(state.read().await.videos.clone())).into_response()
}

async fn handle_next_videos(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(Value::Array(state.read().await.next_videos.clone())).into_response()
}

async fn handle_delete_video(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut state = state.write().await;
    let before = state.videos.len();
    state.videos.retain(|v| v["videoId"].as_i64() != Some(id));
    if state.videos.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({"msg": "Video not found"}))).into_response();
    }
    Json(json!({"msg": "Video deleted"})).into_response()
}

async fn handle_create_single(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state.write().await.single_requests.push(body);
    (StatusCode::CREATED, Json(json!({"msg": "Schedule created"}))).into_response()
}

async fn handle_create_multiple(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut state = state.write().await;
    state.batch_requests.push(body);
    if let Some((status, body)) = state.batch_failure.clone() {
        return (status, Json(body)).into_response();
    }
    let group_id = state.next_group_id;
    state.next_group_id += 1;
    (
        StatusCode::CREATED,
        Json(json!({"schedule_group_id": group_id, "msg": "Schedules created"})),
    )
        .into_response()
}

async fn record_upload(state: &Shared, path: &'static str, headers: &HeaderMap, body: &Bytes) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.write().await.uploads.push(ReceivedUpload {
        path,
        content_type,
        body: String::from_utf8_lossy(body).into_owned(),
    });
}

async fn handle_upload_video(
    State(state): State<Shared>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    record_upload(&state, "/api/videos/upload", &headers, &body).await;
    (StatusCode::CREATED, Json(json!({"msg": "Video uploaded"}))).into_response()
}

async fn handle_upload_photo(
    State(state): State<Shared>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    record_upload(&state, "/auth/upload-photo", &headers, &body).await;
    Json(json!({"photo_url": "https://cdn.example/photos/7.png"})).into_response()
}

/// Reflects the request back, for checking what a proxy forwarded
async fn handle_echo(
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: String,
) -> Response {
    Json(json!({
        "method": method.as_str(),
        "query": query,
        "authorization": headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
        "body": body,
    }))
    .into_response()
}
