//! Sign in / sign up page.
//!
//! Sign up is two requests: the details go to `/auth/signup`, which mails an
//! OTP and echoes back the pending account; the OTP then goes to
//! `/auth/verify-signup-otp` together with that pending account.

mod forgot_password;
mod google;

use dioxus::prelude::*;
use dioxus::router::Navigator;

use crate::app::browser::delay;
use crate::app::client_config::use_client_config;
use crate::app::components::ErrorAlert;
use crate::app::notifier::use_notifier;
use crate::app::session::{use_session, SessionContext};
use crate::app::Route;
use crate::auth::{SignupFlow, SignupStep, SIGNUP_SUCCESS_DELAY};
use crate::client::{ApiError, LoginRequest, SignupRequest};

use forgot_password::ForgotPasswordModal;
use google::GoogleSignIn;

const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    SignIn,
    SignUp,
}

/// Sign in with email and password, then open the dashboard
async fn sign_in_with(
    session: SessionContext,
    navigator: Navigator,
    email: String,
    password: String,
) -> Result<(), ApiError> {
    let client = session.client();
    let response = client.login(&LoginRequest { email, password }).await?;
    session.sign_in(response.token, response.user.map(|u| u.id));
    navigator.push(Route::Home {});
    Ok(())
}

#[component]
pub fn Login() -> Element {
    let session = use_session();
    let notifier = use_notifier();
    let client_config = use_client_config();
    let navigator = use_navigator();

    let mut mode = use_signal(|| Mode::SignIn);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut username = use_signal(String::new);
    let mut mobile = use_signal(String::new);
    let mut otp = use_signal(String::new);
    let mut show_password = use_signal(|| false);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut signup = use_signal(SignupFlow::new);
    let mut forgot_open = use_signal(|| false);

    // Already signed in: straight to the dashboard
    use_effect(move || {
        if session.is_loaded() && session.is_authenticated() {
            navigator.replace(Route::Home {});
        }
    });

    let mut switch_mode = move |next: Mode| {
        mode.set(next);
        error.set(None);
        signup.write().reset();
        otp.set(String::new());
    };

    let on_sign_in = move |e: FormEvent| {
        e.prevent_default();
        if busy() {
            return;
        }
        let (email, password) = (email(), password());
        spawn(async move {
            busy.set(true);
            error.set(None);
            notifier.loading("Please wait...");
            let result = sign_in_with(session, navigator, email, password).await;
            notifier.hide();
            if let Err(e) = result {
                error.set(Some(e.user_message(GENERIC_FAILURE)));
            }
            busy.set(false);
        });
    };

    let on_sign_up = move |e: FormEvent| {
        e.prevent_default();
        if busy() {
            return;
        }
        let client = session.client();
        let verify = signup.peek().verify_request(&otp());
        let details = SignupRequest {
            email: email().trim().to_string(),
            username: username().trim().to_string(),
            password: password(),
            mobile_number: mobile().trim().to_string(),
        };

        spawn(async move {
            busy.set(true);
            error.set(None);
            notifier.loading("Please wait...");

            let verifying = verify.is_some();
            let result = match verify {
                // Step 2: confirm the OTP for the pending account
                Some(request) => client.verify_signup_otp(&request).await.map(|_| None),
                // Step 1: send the details, receive the pending account
                None => client.signup(&details).await.map(Some),
            };
            notifier.hide();
            busy.set(false);

            match result {
                Ok(Some(response)) => {
                    tracing::info!("Signup OTP sent to {}", response.temp_user.email);
                    signup.write().details_accepted(response);
                }
                Ok(None) => {
                    signup.write().otp_accepted();
                    notifier.success("Signup successful! Please log in.", Some(SIGNUP_SUCCESS_DELAY));
                    delay(SIGNUP_SUCCESS_DELAY).await;
                    signup.write().reset();
                    otp.set(String::new());
                    mode.set(Mode::SignIn);
                }
                Err(e) => {
                    tracing::warn!(verifying, "Signup failed: {}", e);
                    error.set(Some(e.user_message(GENERIC_FAILURE)));
                }
            }
        });
    };

    let on_demo = move |_: MouseEvent| {
        let Some((demo_email, demo_password)) = client_config.demo_account() else {
            return;
        };
        spawn(async move {
            busy.set(true);
            error.set(None);
            notifier.loading("Please wait...");
            let result = sign_in_with(session, navigator, demo_email, demo_password).await;
            notifier.hide();
            if let Err(e) = result {
                error.set(Some(e.user_message(GENERIC_FAILURE)));
            }
            busy.set(false);
        });
    };

    let password_type = if show_password() { "text" } else { "password" };
    let toggle_label = if show_password() { "Hide" } else { "Show" };
    let awaiting_otp = matches!(signup.read().step(), SignupStep::Otp { .. });
    let has_demo = client_config.demo_account().is_some();
    let google_client_id = client_config.google_client_id();

    rsx! {
        document::Title { "Sign in - Synetra" }

        ForgotPasswordModal { open: forgot_open(), on_close: move |_| forgot_open.set(false) }

        main { class: "container auth",
            div { class: "auth-tabs", role: "tablist",
                button {
                    class: if mode() == Mode::SignIn { "tab active" } else { "tab" },
                    onclick: move |_| switch_mode(Mode::SignIn),
                    "Sign In"
                }
                button {
                    class: if mode() == Mode::SignUp { "tab active" } else { "tab" },
                    onclick: move |_| switch_mode(Mode::SignUp),
                    "Sign Up"
                }
            }

            if let Some(message) = error() {
                ErrorAlert { message, on_dismiss: move |_| error.set(None) }
            }

            if mode() == Mode::SignIn {
                form { class: "card auth-form", onsubmit: on_sign_in,
                    h1 { "Sign In" }
                    if let Some(client_id) = google_client_id {
                        GoogleSignIn { client_id, on_error: move |msg: String| error.set(Some(msg)) }
                        span { class: "text-muted divider", "or use your account" }
                    }
                    input {
                        r#type: "email",
                        placeholder: "Email",
                        required: true,
                        value: "{email}",
                        oninput: move |e| email.set(e.value()),
                    }
                    div { class: "password-field",
                        input {
                            r#type: password_type,
                            placeholder: "Password",
                            required: true,
                            value: "{password}",
                            oninput: move |e| password.set(e.value()),
                        }
                        button {
                            class: "btn-ghost",
                            r#type: "button",
                            onclick: move |_| show_password.toggle(),
                            "{toggle_label}"
                        }
                    }
                    button {
                        class: "btn-link",
                        r#type: "button",
                        onclick: move |_| forgot_open.set(true),
                        "Forgot your password?"
                    }
                    button { class: "btn btn-primary", r#type: "submit", disabled: busy(), "Sign In" }
                    if has_demo {
                        button {
                            class: "btn",
                            r#type: "button",
                            disabled: busy(),
                            onclick: on_demo,
                            "Try the demo"
                        }
                    }
                }
            } else {
                form { class: "card auth-form", onsubmit: on_sign_up,
                    h1 { "Create Account" }
                    if awaiting_otp {
                        p { class: "text-muted", "We sent a verification code to {email}." }
                        input {
                            r#type: "text",
                            placeholder: "Enter OTP",
                            required: true,
                            value: "{otp}",
                            oninput: move |e| otp.set(e.value()),
                        }
                        button { class: "btn btn-primary", r#type: "submit", disabled: busy(), "Verify OTP" }
                    } else {
                        input {
                            r#type: "text",
                            placeholder: "Username",
                            required: true,
                            value: "{username}",
                            oninput: move |e| username.set(e.value()),
                        }
                        input {
                            r#type: "email",
                            placeholder: "Email",
                            required: true,
                            value: "{email}",
                            oninput: move |e| email.set(e.value()),
                        }
                        input {
                            r#type: "tel",
                            placeholder: "Mobile Number",
                            pattern: "[0-9]{{10}}",
                            maxlength: 10,
                            required: true,
                            value: "{mobile}",
                            oninput: move |e| mobile.set(e.value()),
                        }
                        div { class: "password-field",
                            input {
                                r#type: password_type,
                                placeholder: "Password",
                                required: true,
                                value: "{password}",
                                oninput: move |e| password.set(e.value()),
                            }
                            button {
                                class: "btn-ghost",
                                r#type: "button",
                                onclick: move |_| show_password.toggle(),
                                "{toggle_label}"
                            }
                        }
                        button { class: "btn btn-primary", r#type: "submit", disabled: busy(), "Sign Up" }
                    }
                }
            }
        }
    }
}
