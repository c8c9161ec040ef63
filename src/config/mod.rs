//! Configuration management

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::client::ClientConfig;

const APP_DIR_NAME: &str = "synetra-dashboard";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the REST backend that `/api` and `/auth` are forwarded to
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// OAuth client id for Google sign-in; the button is hidden without one
    #[serde(default)]
    pub google_client_id: Option<String>,

    #[serde(default)]
    pub status: StatusConfig,

    /// Shared demo account offered on the sign-in page
    #[serde(default)]
    pub demo: Option<DemoAccount>,
}

fn default_port() -> u16 {
    8080
}

fn default_backend_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Overlay timings handed to the browser
#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    #[serde(default = "default_dismiss_ms")]
    pub default_dismiss_ms: u64,
    #[serde(default = "default_schedule_close_ms")]
    pub schedule_close_ms: u64,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            default_dismiss_ms: default_dismiss_ms(),
            schedule_close_ms: default_schedule_close_ms(),
        }
    }
}

fn default_dismiss_ms() -> u64 {
    2000
}

fn default_schedule_close_ms() -> u64 {
    1600
}

#[derive(Debug, Clone, Deserialize)]
pub struct DemoAccount {
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The subset of the configuration the browser is allowed to see
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            google_client_id: self.google_client_id.clone().filter(|id| !id.is_empty()),
            demo_email: self.demo.as_ref().map(|d| d.email.clone()),
            demo_password: self.demo.as_ref().map(|d| d.password.clone()),
            default_dismiss_ms: self.status.default_dismiss_ms,
            schedule_close_ms: self.status.schedule_close_ms,
        }
    }
}

/// Get config directory (XDG_CONFIG_HOME or platform default)
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SYNETRA_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library/Application Support")
                .join(APP_DIR_NAME);
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join(APP_DIR_NAME);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".config").join(APP_DIR_NAME);
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join(APP_DIR_NAME);
        }
    }

    // Fallback to current directory
    PathBuf::from(".")
}

pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir();

    let mut builder = ::config::Config::builder()
        // Start with defaults
        .set_default("port", default_port() as i64)?
        // Load from config file if it exists
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy()).required(false),
        )
        // Override with environment variables (SYNETRA_BACKEND_URL, SYNETRA_STATUS__DEFAULT_DISMISS_MS, etc.)
        .add_source(
            ::config::Environment::with_prefix("SYNETRA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    // Port precedence: SYNETRA_PORT > PORT > config > default
    if let Ok(port) = std::env::var("SYNETRA_PORT") {
        if let Ok(port_num) = port.parse::<u16>() {
            builder = builder.set_override("port", port_num as i64)?;
        }
    } else if let Ok(port) = std::env::var("PORT") {
        // Hosting platforms (Docker, PaaS) hand the port over as PORT
        if let Ok(port_num) = port.parse::<u16>() {
            builder = builder.set_override("port", port_num as i64)?;
        }
    }

    let config: Config = builder.build()?.try_deserialize()?;
    check_backend_url(&config.backend_url)?;
    Ok(config)
}

/// The forwarding routes need an absolute http(s) URL
fn check_backend_url(raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw).with_context(|| format!("invalid backend_url {:?}", raw))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("backend_url must be http or https, got {:?}", parsed.scheme());
    }
    Ok(())
}
