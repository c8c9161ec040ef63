//! Request and response shapes of the backend REST API.
//!
//! The backend is inconsistent about casing: device and auth payloads are
//! snake_case, video payloads are camelCase. The serde attributes follow the wire.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

// =============================================================================
// Devices
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Device {
    pub device_id: i64,
    pub device_code: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub last_fetch_time: Option<String>,
    #[serde(default)]
    pub next_fetch_time: Option<String>,
    #[serde(default)]
    pub playback_state: Option<String>,
    #[serde(default)]
    pub current_video: Option<DeviceVideo>,
}

impl Device {
    pub fn connectivity(&self) -> Connectivity {
        Connectivity::from_status(&self.status)
    }
}

/// Video currently assigned to a device
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DeviceVideo {
    pub video_id: i64,
    pub title: String,
    #[serde(default)]
    pub video_link: Option<String>,
}

/// Status dot shown next to a device
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
    Unknown,
}

impl Connectivity {
    pub fn from_status(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "active" => Connectivity::Online,
            "inactive" => Connectivity::Offline,
            _ => Connectivity::Unknown,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Connectivity::Online => "online",
            Connectivity::Offline => "offline",
            Connectivity::Unknown => "unknown",
        }
    }
}

/// Wrapper for /api/devices/list
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DevicesResponse {
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CreateDeviceRequest {
    pub name: String,
}

/// Freshly created device, including the one-time registration token
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CreatedDevice {
    #[serde(default)]
    pub device_id: Option<i64>,
    pub device_code: String,
    pub device_token: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateDeviceResponse {
    pub device: CreatedDevice,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisterDeviceRequest {
    pub device_code: String,
    pub device_token: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RegisterDeviceResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Videos
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub video_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

/// Entry of /api/videos/my-next-videos
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledVideo {
    pub video_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub device_id: Option<i64>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub schedule_group_id: Option<i64>,
    #[serde(default)]
    pub video_url: Option<String>,
}

impl ScheduledVideo {
    /// Start time as naive local time; the backend sends ISO 8601 with or without offset
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        let raw = self.start_time.as_deref()?.trim();
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Some(with_offset.naive_utc());
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }
}

/// The first scheduled video that has not started yet, in list order
pub fn next_upcoming(videos: &[ScheduledVideo], now: NaiveDateTime) -> Option<&ScheduledVideo> {
    videos
        .iter()
        .find(|v| v.starts_at().is_some_and(|start| start > now))
}

/// Form fields sent alongside the video file
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoUploadMeta {
    pub title: String,
    pub description: String,
    pub is_default: bool,
    pub duration_secs: u32,
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub mobile_number: String,
}

/// Pending account echoed back by /auth/signup until the OTP is confirmed
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TempUser {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub mobile_number: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SignupResponse {
    pub temp_user: TempUser,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VerifySignupOtpRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub mobile_number: String,
    pub otp: String,
}

impl VerifySignupOtpRequest {
    pub fn new(temp_user: &TempUser, otp: &str) -> Self {
        Self {
            email: temp_user.email.clone(),
            username: temp_user.username.clone(),
            password: temp_user.password.clone(),
            mobile_number: temp_user.mobile_number.clone(),
            otp: otp.trim().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GoogleLoginRequest {
    /// ID token issued by Google Identity Services
    pub token: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GoogleLoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// Profile returned by /auth/users/{id}
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(alias = "userId", alias = "id")]
    pub user_id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
}

/// Photo URL returned by /auth/upload-photo
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PhotoUploadResponse {
    #[serde(default)]
    pub photo_url: Option<String>,
}

// =============================================================================
// Dashboard server
// =============================================================================

/// Settings the dashboard server hands to the browser at `/client-config`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub google_client_id: Option<String>,
    #[serde(default)]
    pub demo_email: Option<String>,
    #[serde(default)]
    pub demo_password: Option<String>,
    #[serde(default = "default_dismiss_ms")]
    pub default_dismiss_ms: u64,
    #[serde(default = "default_schedule_close_ms")]
    pub schedule_close_ms: u64,
}

fn default_dismiss_ms() -> u64 {
    2000
}

fn default_schedule_close_ms() -> u64 {
    1600
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            google_client_id: None,
            demo_email: None,
            demo_password: None,
            default_dismiss_ms: default_dismiss_ms(),
            schedule_close_ms: default_schedule_close_ms(),
        }
    }
}

/// Payload of `/status`
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceStatus {
    pub service: String,
    pub version: String,
    #[serde(default)]
    pub git_sha: String,
    pub backend_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_list_tolerates_missing_optional_fields() {
        let json = r#"{"devices":[{"device_id":3,"device_code":"DEV-3","status":"Active"}]}"#;
        let resp: DevicesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.devices.len(), 1);
        assert_eq!(resp.devices[0].connectivity(), Connectivity::Online);
        assert!(resp.devices[0].last_seen.is_none());
    }

    #[test]
    fn missing_devices_key_is_empty_list() {
        let resp: DevicesResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.devices.is_empty());
    }

    #[test]
    fn videos_are_camel_case() {
        let json = r#"[{"videoId":10,"title":"Intro","videoUrl":"https://cdn/x.mp4","uploadedAt":"2025-01-01"}]"#;
        let videos: Vec<Video> = serde_json::from_str(json).unwrap();
        assert_eq!(videos[0].video_id, 10);
        assert_eq!(videos[0].video_url.as_deref(), Some("https://cdn/x.mp4"));
    }

    #[test]
    fn connectivity_from_status() {
        assert_eq!(Connectivity::from_status("inactive"), Connectivity::Offline);
        assert_eq!(Connectivity::from_status(" ACTIVE "), Connectivity::Online);
        assert_eq!(Connectivity::from_status("pending"), Connectivity::Unknown);
    }

    #[test]
    fn client_config_defaults_timings() {
        let cfg: ClientConfig = serde_json::from_str(r#"{"google_client_id":"g"}"#).unwrap();
        assert_eq!(cfg.default_dismiss_ms, 2000);
        assert_eq!(cfg.schedule_close_ms, 1600);
    }

    #[test]
    fn user_profile_accepts_user_id_alias() {
        let json = r#"{"userId":7,"username":"ana","email":"ana@example.com"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.user_id, 7);
    }

    fn scheduled(id: i64, start: &str) -> ScheduledVideo {
        ScheduledVideo {
            video_id: id,
            title: format!("v{}", id),
            start_time: Some(start.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn next_upcoming_skips_started_and_unparseable() {
        let now = NaiveDateTime::parse_from_str("2025-06-01T12:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let videos = vec![
            scheduled(1, "2025-06-01T11:00:00"),
            scheduled(2, "not a date"),
            scheduled(3, "2025-06-01T13:00:00Z"),
            scheduled(4, "2025-06-01 14:00:00"),
        ];
        assert_eq!(next_upcoming(&videos, now).map(|v| v.video_id), Some(3));
        assert!(next_upcoming(&videos[..2], now).is_none());
    }
}
