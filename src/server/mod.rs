//! HTTP routes served next to the Dioxus app.
//!
//! The dashboard talks to the backend through the same origin it was loaded
//! from. `/api/*` and `/auth/*` are forwarded to the configured backend
//! unchanged.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderName, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use futures::TryStreamExt;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::client::{ClientConfig, ServiceStatus};
use crate::config::Config;

/// Request headers passed through to the backend
const FORWARDED_REQUEST_HEADERS: [HeaderName; 4] = [
    header::AUTHORIZATION,
    header::CONTENT_TYPE,
    header::CONTENT_LENGTH,
    header::ACCEPT,
];

/// Response headers passed back to the browser
const FORWARDED_RESPONSE_HEADERS: [HeaderName; 4] = [
    header::CONTENT_TYPE,
    header::CONTENT_LENGTH,
    header::CONTENT_DISPOSITION,
    header::CACHE_CONTROL,
];

/// Shared state for the dashboard routes
#[derive(Clone)]
pub struct ServerState {
    http: reqwest::Client,
    backend_url: Arc<str>,
    request_timeout: Duration,
    client_config: Arc<ClientConfig>,
}

impl ServerState {
    pub fn new(
        backend_url: &str,
        request_timeout: Duration,
        client_config: ClientConfig,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            backend_url: Arc::from(backend_url.trim_end_matches('/')),
            request_timeout,
            client_config: Arc::new(client_config),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            &config.backend_url,
            config.request_timeout(),
            config.client_config(),
        )
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }
}

/// Dashboard routes, ready to merge with the Dioxus router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/client-config", get(client_config_handler))
        .route("/api/{*path}", any(forward_handler))
        .route("/auth/{*path}", any(forward_handler))
        .with_state(state)
}

/// GET /status - Service health with build stamp
pub async fn status_handler(State(state): State<ServerState>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        service: "synetra-dashboard".to_string(),
        version: env!("SYNETRA_VERSION").to_string(),
        git_sha: env!("SYNETRA_GIT_SHA").to_string(),
        backend_url: state.backend_url.to_string(),
    })
}

/// GET /client-config - Settings the browser needs before signing in
pub async fn client_config_handler(State(state): State<ServerState>) -> Json<ClientConfig> {
    Json((*state.client_config).clone())
}

/// ANY /api/*, /auth/* - Forward to the backend, streaming both bodies
pub async fn forward_handler(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let url = format!("{}{}", state.backend_url, path_and_query);

    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/"));

    let mut request = state
        .http
        .request(method.clone(), &url)
        .body(reqwest::Body::wrap_stream(body.into_data_stream()));
    for name in &FORWARDED_REQUEST_HEADERS {
        if let Some(value) = headers.get(name) {
            request = request.header(name, value);
        }
    }
    // Multipart uploads get no overall deadline
    if !is_multipart {
        request = request.timeout(state.request_timeout);
    }

    let upstream = match request.send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!("Forwarding {} {} failed: {}", method, uri.path(), e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "Backend unavailable" })),
            )
                .into_response();
        }
    };

    let status = upstream.status();
    tracing::debug!("{} {} -> {}", method, uri.path(), status);

    let mut response_headers = HeaderMap::new();
    for name in &FORWARDED_RESPONSE_HEADERS {
        if let Some(value) = upstream.headers().get(name) {
            response_headers.insert(name.clone(), value.clone());
        }
    }

    let stream = upstream
        .bytes_stream()
        .inspect_err(|e| tracing::warn!("Backend response interrupted: {}", e));
    (status, response_headers, Body::from_stream(stream)).into_response()
}
