//! Dioxus fullstack application entry point.
//!
//! This module provides the main App component that serves as the root
//! of the Dioxus application with client-side hydration.

use dioxus::prelude::*;

pub mod browser;
pub mod client_config;
pub mod components;
pub mod notifier;
pub mod pages;
pub mod session;

use client_config::use_client_config_provider;
use components::StatusOverlay;
use notifier::use_notifier_provider;
use pages::{Home, Landing, Login, NotFound, Profile};
use session::use_session_provider;

const MAIN_CSS: Asset = asset!("/public/main.css");

/// Root app component with routing
#[component]
pub fn App() -> Element {
    // Session first: pages read it on their first render
    use_session_provider();

    // One status slot for every view, rendered by the overlay below
    let notifier = use_notifier_provider();

    // Browser settings from the dashboard server (Google client id, timings)
    use_client_config_provider(notifier);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        Router::<Route> {}
        StatusOverlay {}
    }
}

/// Application routes
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/")]
    Landing {},
    #[route("/login")]
    Login {},
    #[route("/home")]
    Home {},
    #[route("/profile")]
    Profile {},
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}
