//! Synetra Dashboard
//!
//! Browser dashboard for scheduling video playback on casting and automation
//! devices.
//!
//! This library provides:
//! - Operation-status notifier with auto-dismiss timers
//! - Multi-device/multi-video schedule form
//! - REST client for the Synetra backend (auth, devices, videos, schedules)
//! - Sign-up and password-reset step machines
//! - Dioxus UI (landing, sign in, home, profile)
//! - Server routes forwarding `/api` and `/auth` to the backend

pub mod app;
pub mod auth;
pub mod client;
#[cfg(feature = "server")]
pub mod config;
pub mod notifier;
pub mod schedule;
#[cfg(feature = "server")]
pub mod server;
pub mod session;
