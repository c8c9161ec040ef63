//! Browser settings published by the dashboard server.
//!
//! Fetched once after hydration. Until then every value is the built-in
//! default, so nothing waits on this request.

use dioxus::prelude::*;
use std::time::Duration;

use crate::app::notifier::Notifier;
use crate::client::ClientConfig;
use crate::schedule::FormTiming;

#[derive(Clone, Copy)]
pub struct ClientConfigContext {
    config: Signal<ClientConfig>,
    loaded: Signal<bool>,
}

impl ClientConfigContext {
    pub fn is_loaded(&self) -> bool {
        (self.loaded)()
    }

    pub fn google_client_id(&self) -> Option<String> {
        self.config.read().google_client_id.clone()
    }

    /// Demo credentials, when the server offers a demo account
    pub fn demo_account(&self) -> Option<(String, String)> {
        let config = self.config.read();
        match (&config.demo_email, &config.demo_password) {
            (Some(email), Some(password)) => Some((email.clone(), password.clone())),
            _ => None,
        }
    }

    /// How long a successful form stays open before closing
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.config.read().schedule_close_ms)
    }

    pub fn form_timing(&self) -> FormTiming {
        let close = self.close_delay();
        FormTiming {
            close_delay: close,
            success_dismiss: close,
            ..FormTiming::default()
        }
    }
}

/// Initialize client config context provider - call once at app root
pub fn use_client_config_provider(notifier: Notifier) {
    let config = use_signal(ClientConfig::default);
    let loaded = use_signal(|| false);

    let ctx = ClientConfigContext { config, loaded };
    use_context_provider(|| ctx);

    #[cfg(target_arch = "wasm32")]
    {
        let mut config = config;
        let mut loaded = loaded;
        use_effect(move || {
            spawn(async move {
                let client = crate::client::ApiClient::new(crate::app::browser::page_origin());
                match client.client_config().await {
                    Ok(fetched) => {
                        notifier
                            .store()
                            .set_default_dismiss(Duration::from_millis(fetched.default_dismiss_ms));
                        config.set(fetched);
                        loaded.set(true);
                    }
                    Err(e) => tracing::warn!("Using built-in client settings: {}", e),
                }
            });
        });
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = notifier;
    }
}

/// Get client config context - use in any component
pub fn use_client_config() -> ClientConfigContext {
    use_context::<ClientConfigContext>()
}
