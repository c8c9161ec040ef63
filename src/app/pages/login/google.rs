//! "Sign in with Google" button backed by Google Identity Services.
//!
//! The GIS script renders its own button and hands back an ID token, which
//! is exchanged for a session at `/auth/google-login`.

use dioxus::prelude::*;

use crate::app::notifier::use_notifier;
use crate::app::session::use_session;
use crate::app::Route;
use crate::client::GoogleLoginRequest;

const BUTTON_ID: &str = "google-signin";
const FAILURE: &str = "Google login failed";

/// Loads the GIS client once, renders the button and forwards every credential
fn gis_script(client_id: &str) -> String {
    // JSON string literal doubles as a safely quoted JS string
    let client_id = serde_json::to_string(client_id).unwrap_or_else(|_| "\"\"".into());
    format!(
        r#"
        const render = () => {{
            google.accounts.id.initialize({{
                client_id: {client_id},
                callback: (response) => dioxus.send(response.credential || ""),
            }});
            google.accounts.id.renderButton(
                document.getElementById("{BUTTON_ID}"),
                {{ theme: "outline", size: "large" }}
            );
        }};
        if (window.google && window.google.accounts) {{
            render();
        }} else {{
            const script = document.createElement("script");
            script.src = "https://accounts.google.com/gsi/client";
            script.async = true;
            script.onload = render;
            script.onerror = () => dioxus.send("");
            document.head.appendChild(script);
        }}
        "#
    )
}

#[component]
pub fn GoogleSignIn(client_id: String, on_error: EventHandler<String>) -> Element {
    let session = use_session();
    let notifier = use_notifier();
    let navigator = use_navigator();

    use_future(move || {
        let script = gis_script(&client_id);
        async move {
            let mut eval = document::eval(&script);
            while let Ok(credential) = eval.recv::<String>().await {
                if credential.is_empty() {
                    on_error.call(FAILURE.to_string());
                    continue;
                }

                notifier.loading("Please wait...");
                let client = session.client();
                let result = client
                    .google_login(&GoogleLoginRequest { token: credential })
                    .await;
                notifier.hide();

                match result {
                    Ok(response) => match response.token {
                        Some(token) => {
                            session.sign_in(token, response.user.map(|u| u.id));
                            navigator.push(Route::Home {});
                            break;
                        }
                        None => {
                            tracing::warn!("Google login returned no token");
                            on_error.call(FAILURE.to_string());
                        }
                    },
                    Err(e) => {
                        tracing::warn!("Google login failed: {}", e);
                        on_error.call(FAILURE.to_string());
                    }
                }
            }
        }
    });

    rsx! {
        div { id: BUTTON_ID, class: "google-signin" }
    }
}
