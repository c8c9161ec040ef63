//! HTTP client for the Synetra backend.
//!
//! Every view talks to the backend through [`ApiClient`]. Requests that need
//! a session go through [`ApiClient::authed`], which refuses to send anything
//! without a bearer token.

mod error;
pub mod types;
pub mod upload;

pub use error::ApiError;
pub use types::*;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::schedule::{
    CreateSchedulesRequest, ScheduleApi, ScheduleGroup, SingleScheduleRequest,
};

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Client for `base_url` (scheme + host, no trailing path)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.set_token(token);
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.trim().is_empty());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Request carrying the bearer token. Fails without sending when signed out.
    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
        Ok(self.anonymous(method, path).bearer_auth(token))
    }

    /// Send and decode a JSON body, mapping non-2xx responses to [`ApiError`]
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.dispatch(request).await?;
        response.json::<T>().await.map_err(ApiError::from)
    }

    /// Send and discard the body
    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.dispatch(request).await.map(|_| ())
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!("Backend request failed: {}", e);
            ApiError::from(e)
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Backend response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response(status.as_u16(), &body);
        warn!("Backend returned error: {}", err);
        Err(err)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.authed(Method::POST, path)?.json(body);
        self.send(request).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authed(Method::GET, path)?;
        self.send(request).await
    }

    /// Browser settings published by the dashboard server
    pub async fn client_config(&self) -> Result<ClientConfig, ApiError> {
        self.send(self.anonymous(Method::GET, "/client-config"))
            .await
    }

    // =========================================================================
    // Auth
    // =========================================================================

    pub async fn login(&self, body: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send(self.anonymous(Method::POST, "/auth/login").json(body))
            .await
    }

    pub async fn signup(&self, body: &SignupRequest) -> Result<SignupResponse, ApiError> {
        self.send(self.anonymous(Method::POST, "/auth/signup").json(body))
            .await
    }

    pub async fn verify_signup_otp(&self, body: &VerifySignupOtpRequest) -> Result<(), ApiError> {
        self.send_empty(
            self.anonymous(Method::POST, "/auth/verify-signup-otp")
                .json(body),
        )
        .await
    }

    pub async fn forgot_password(&self, body: &ForgotPasswordRequest) -> Result<(), ApiError> {
        self.send_empty(
            self.anonymous(Method::POST, "/auth/forgot-password")
                .json(body),
        )
        .await
    }

    pub async fn verify_otp(&self, body: &VerifyOtpRequest) -> Result<(), ApiError> {
        self.send_empty(self.anonymous(Method::POST, "/auth/verify-otp").json(body))
            .await
    }

    pub async fn reset_password(&self, body: &ResetPasswordRequest) -> Result<(), ApiError> {
        self.send_empty(
            self.anonymous(Method::POST, "/auth/reset-password")
                .json(body),
        )
        .await
    }

    pub async fn google_login(
        &self,
        body: &GoogleLoginRequest,
    ) -> Result<GoogleLoginResponse, ApiError> {
        self.send(self.anonymous(Method::POST, "/auth/google-login").json(body))
            .await
    }

    pub async fn user(&self, user_id: i64) -> Result<UserProfile, ApiError> {
        self.get_json(&format!("/auth/users/{}", user_id)).await
    }

    // =========================================================================
    // Devices
    // =========================================================================

    pub async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        let resp: DevicesResponse = self.get_json("/api/devices/list").await?;
        Ok(resp.devices)
    }

    pub async fn create_device(&self, name: &str) -> Result<CreatedDevice, ApiError> {
        let body = CreateDeviceRequest {
            name: name.trim().to_string(),
        };
        let resp: CreateDeviceResponse = self.post_json("/api/devices/create", &body).await?;
        Ok(resp.device)
    }

    /// Registration is done with the device's own credentials, not the session
    pub async fn register_device(
        &self,
        body: &RegisterDeviceRequest,
    ) -> Result<RegisterDeviceResponse, ApiError> {
        self.send(self.anonymous(Method::POST, "/api/devices/register").json(body))
            .await
    }

    /// Zip archive with the device's player configuration
    pub async fn download_device_config(&self, device_id: i64) -> Result<Vec<u8>, ApiError> {
        let request = self.authed(
            Method::GET,
            &format!("/api/devices/{}/download-config", device_id),
        )?;
        let response = self.dispatch(request).await?;
        let bytes = response.bytes().await.map_err(ApiError::from)?;
        Ok(bytes.to_vec())
    }

    // =========================================================================
    // Videos
    // =========================================================================

    pub async fn my_videos(&self) -> Result<Vec<Video>, ApiError> {
        self.get_json("/api/videos/my-videos").await
    }

    pub async fn my_next_videos(&self) -> Result<Vec<ScheduledVideo>, ApiError> {
        self.get_json("/api/videos/my-next-videos").await
    }

    pub async fn delete_video(&self, video_id: i64) -> Result<(), ApiError> {
        let request = self.authed(Method::DELETE, &format!("/api/videos/delete/{}", video_id))?;
        self.send_empty(request).await
    }

    // =========================================================================
    // Schedules
    // =========================================================================

    pub async fn create_schedule(&self, body: &SingleScheduleRequest) -> Result<(), ApiError> {
        let request = self.authed(Method::POST, "/api/schedules/create")?.json(body);
        self.send_empty(request).await
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ScheduleApi for ApiClient {
    fn is_authorized(&self) -> bool {
        self.token.is_some()
    }

    async fn create_multiple_schedules(
        &self,
        request: &CreateSchedulesRequest,
    ) -> Result<ScheduleGroup, ApiError> {
        self.post_json("/api/schedules/create-multiple", request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(client.url("/api/devices/list"), "http://localhost:5000/api/devices/list");
    }

    #[test]
    fn blank_token_counts_as_signed_out() {
        let client = ApiClient::new("http://localhost").with_token(Some("  ".into()));
        assert!(client.token().is_none());
        assert!(!client.is_authorized());
    }

    #[tokio::test]
    async fn authed_request_without_token_is_not_sent() {
        // Port 9 (discard) would fail with a network error if anything were sent
        let client = ApiClient::new("http://127.0.0.1:9");
        let err = client.list_devices().await.unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
    }
}
