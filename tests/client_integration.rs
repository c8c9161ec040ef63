//! Backend client integration tests
//!
//! Runs [`ApiClient`] against the mock backend and checks:
//! - Wire shapes (snake_case devices, camelCase videos)
//! - Error bodies surfacing as user-facing messages
//! - Expired sessions being reported as sign-in-required

#![cfg(feature = "server")]

mod mock_backend;

use mock_backend::{MockBackend, TEST_EMAIL, TEST_PASSWORD, TEST_TOKEN, TEST_USER_ID};
use synetra_dashboard::client::{ApiClient, ApiError, Connectivity, LoginRequest};
use synetra_dashboard::schedule::{parse_datetime_local, ScheduleApi, SingleScheduleDraft};

fn signed_in(backend: &MockBackend) -> ApiClient {
    ApiClient::new(backend.url()).with_token(Some(TEST_TOKEN.to_string()))
}

#[tokio::test]
async fn login_returns_token_and_user() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(backend.url());

    let resp = client
        .login(&LoginRequest {
            email: TEST_EMAIL.to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap();

    assert_eq!(resp.token, TEST_TOKEN);
    assert_eq!(resp.user.map(|u| u.id), Some(TEST_USER_ID));
    backend.stop().await;
}

#[tokio::test]
async fn bad_credentials_surface_backend_message() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(backend.url());

    let err = client
        .login(&LoginRequest {
            email: TEST_EMAIL.to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.user_message("Something went wrong"),
        "Invalid email or password"
    );
    assert!(!err.requires_sign_in());
    backend.stop().await;
}

#[tokio::test]
async fn devices_are_listed_with_connectivity() {
    let backend = MockBackend::start().await;
    let devices = signed_in(&backend).list_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].device_code, "DEV-1");
    assert_eq!(devices[0].connectivity(), Connectivity::Online);
    assert_eq!(devices[1].connectivity(), Connectivity::Offline);
    backend.stop().await;
}

#[tokio::test]
async fn rejected_token_requires_sign_in() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(backend.url()).with_token(Some("stale".to_string()));

    let err = client.my_videos().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert!(err.requires_sign_in());
    assert_eq!(err.user_message("Failed to fetch videos"), "token expired");
    backend.stop().await;
}

#[tokio::test]
async fn videos_and_upcoming_decode() {
    let backend = MockBackend::start().await;
    let client = signed_in(&backend);

    let videos = client.my_videos().await.unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].duration, Some(42.5));
    assert!(videos[1].video_url.is_none());

    let upcoming = client.my_next_videos().await.unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].device_id, Some(1));
    assert!(upcoming[0].starts_at().is_some());
    backend.stop().await;
}

#[tokio::test]
async fn deleting_a_video_removes_it() {
    let backend = MockBackend::start().await;
    let client = signed_in(&backend);

    client.delete_video(11).await.unwrap();
    assert_eq!(backend.video_count().await, 1);

    let err = client.delete_video(11).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message("Failed to delete video"), "Video not found");
    backend.stop().await;
}

#[tokio::test]
async fn device_config_is_downloaded_as_bytes() {
    let backend = MockBackend::start().await;
    let bytes = signed_in(&backend).download_device_config(1).await.unwrap();
    assert!(bytes.starts_with(b"PK"));
    backend.stop().await;
}

#[tokio::test]
async fn user_profile_is_fetched() {
    let backend = MockBackend::start().await;
    let profile = signed_in(&backend).user(TEST_USER_ID).await.unwrap();
    assert_eq!(profile.user_id, TEST_USER_ID);
    assert_eq!(profile.email, TEST_EMAIL);
    backend.stop().await;
}

#[tokio::test]
async fn single_schedule_is_posted_with_open_end() {
    let backend = MockBackend::start().await;
    let draft = SingleScheduleDraft {
        device_id: Some(2),
        start_time: parse_datetime_local("2030-01-01T08:00"),
        ..Default::default()
    };

    signed_in(&backend)
        .create_schedule(&draft.to_request(10).unwrap())
        .await
        .unwrap();

    let requests = backend.single_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["device_id"], 2);
    assert_eq!(requests[0]["video_id"], 10);
    assert!(requests[0]["end_time"].is_null());
    backend.stop().await;
}

#[tokio::test]
async fn signed_out_client_is_not_authorized() {
    let backend = MockBackend::start().await;
    let client = ApiClient::new(backend.url());

    assert!(!client.is_authorized());
    let err = client.list_devices().await.unwrap_err();
    assert!(matches!(err, ApiError::MissingToken));
    assert_eq!(err.user_message("x"), "Unauthorized");
    backend.stop().await;
}
