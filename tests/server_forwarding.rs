//! Dashboard server route tests
//!
//! Serves [`server::router`] on a random port in front of the mock backend
//! and checks what the browser would see.

#![cfg(feature = "server")]

mod mock_backend;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceExt;

use mock_backend::{MockBackend, TEST_TOKEN};
use synetra_dashboard::client::{ApiClient, ClientConfig, ServiceStatus};
use synetra_dashboard::server::{self, ServerState};

async fn serve(backend_url: &str, client_config: ClientConfig) -> SocketAddr {
    let state = ServerState::new(backend_url, Duration::from_secs(5), client_config).unwrap();
    let app = server::router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn state(backend_url: &str) -> ServerState {
    ServerState::new(backend_url, Duration::from_secs(5), ClientConfig::default()).unwrap()
}

#[tokio::test]
async fn unknown_dashboard_route_is_not_found() {
    let app = server::router(state("http://127.0.0.1:5000"));

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn client_config_defaults_without_demo_account() {
    let app = server::router(state("http://127.0.0.1:5000"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/client-config")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let config: ClientConfig = serde_json::from_slice(&body).unwrap();
    assert!(config.demo_email.is_none());
    assert!(config.google_client_id.is_none());
    assert_eq!(config.default_dismiss_ms, 2000);
}

#[tokio::test]
async fn status_reports_backend() {
    let addr = serve("http://127.0.0.1:5000/", ClientConfig::default()).await;

    let status: ServiceStatus = reqwest::get(format!("http://{}/status", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(status.service, "synetra-dashboard");
    assert_eq!(status.backend_url, "http://127.0.0.1:5000");
    assert!(!status.version.is_empty());
}

#[tokio::test]
async fn client_config_is_published() {
    let published = ClientConfig {
        google_client_id: Some("client-123.apps.googleusercontent.com".to_string()),
        demo_email: Some("demo@example.com".to_string()),
        demo_password: Some("demo".to_string()),
        default_dismiss_ms: 1500,
        schedule_close_ms: 900,
    };
    let addr = serve("http://127.0.0.1:5000", published.clone()).await;

    let fetched = ApiClient::new(format!("http://{}", addr))
        .client_config()
        .await
        .unwrap();
    assert_eq!(fetched, published);
}

#[tokio::test]
async fn api_requests_are_forwarded_with_token_and_query() {
    let backend = MockBackend::start().await;
    let addr = serve(&backend.url(), ClientConfig::default()).await;

    let echoed: Value = reqwest::Client::new()
        .put(format!("http://{}/api/echo?page=2&q=intro", addr))
        .bearer_auth(TEST_TOKEN)
        .body("payload")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(echoed["method"], "PUT");
    assert_eq!(echoed["query"], "page=2&q=intro");
    assert_eq!(echoed["authorization"], format!("Bearer {}", TEST_TOKEN));
    assert_eq!(echoed["body"], "payload");
    backend.stop().await;
}

#[tokio::test]
async fn client_works_through_the_dashboard_origin() {
    let backend = MockBackend::start().await;
    let addr = serve(&backend.url(), ClientConfig::default()).await;
    let client =
        ApiClient::new(format!("http://{}", addr)).with_token(Some(TEST_TOKEN.to_string()));

    let devices = client.list_devices().await.unwrap();
    assert_eq!(devices.len(), 2);

    let bytes = client.download_device_config(2).await.unwrap();
    assert!(bytes.starts_with(b"PK"));
    backend.stop().await;
}

#[tokio::test]
async fn backend_errors_pass_through_unchanged() {
    let backend = MockBackend::start().await;
    let addr = serve(&backend.url(), ClientConfig::default()).await;

    let resp = reqwest::get(format!("http://{}/api/devices/list", addr))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["msg"], "token expired");
    backend.stop().await;
}

#[tokio::test]
async fn unreachable_backend_is_bad_gateway() {
    // Bind then drop to get a port nothing listens on
    let unused = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}", unused.local_addr().unwrap());
    drop(unused);

    let addr = serve(&dead, ClientConfig::default()).await;
    let resp = reqwest::get(format!("http://{}/auth/login", addr))
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Backend unavailable");
}
