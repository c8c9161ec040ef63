//! Forgot-password wizard: email, then OTP, then the new password.

use dioxus::prelude::*;

use crate::app::browser::delay;
use crate::app::components::{ErrorAlert, Modal};
use crate::app::session::use_session;
use crate::auth::{ResetFlow, ResetStep, OTP_LEN, RESET_CLOSE_DELAY};
use crate::client::{ApiError, ForgotPasswordRequest, ResetPasswordRequest, VerifyOtpRequest};

/// Keep digits only, at most one code long
fn otp_digits(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(OTP_LEN)
        .collect()
}

#[component]
pub fn ForgotPasswordModal(open: bool, on_close: EventHandler<()>) -> Element {
    let session = use_session();

    let mut flow = use_signal(ResetFlow::new);
    let mut email = use_signal(String::new);
    let mut otp = use_signal(String::new);
    let mut new_password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let mut close = move || {
        flow.set(ResetFlow::new());
        email.set(String::new());
        otp.set(String::new());
        new_password.set(String::new());
        confirm_password.set(String::new());
        error.set(None);
        on_close.call(());
    };

    let on_submit = move |e: FormEvent| {
        e.prevent_default();
        if loading() {
            return;
        }
        error.set(None);
        let client = session.client();
        let step = flow.peek().step();

        // Validate locally first; nothing is sent for bad input
        let prepared = match step {
            ResetStep::Email => flow.write().submit_email(&email()).map(StepRequest::Email),
            ResetStep::Otp => flow.write().submit_otp(&otp()).map(StepRequest::Otp),
            ResetStep::NewPassword => flow
                .peek()
                .submit_password(&new_password(), &confirm_password())
                .map(StepRequest::Password),
            ResetStep::Success => return,
        };
        let request = match prepared {
            Ok(request) => request,
            Err(input) => {
                error.set(Some(input.to_string()));
                return;
            }
        };

        spawn(async move {
            loading.set(true);
            let result: Result<(), ApiError> = match &request {
                StepRequest::Email(body) => client.forgot_password(body).await,
                StepRequest::Otp(body) => client.verify_otp(body).await,
                StepRequest::Password(body) => client.reset_password(body).await,
            };
            loading.set(false);

            match result {
                Ok(()) => match request {
                    StepRequest::Email(_) => flow.write().email_accepted(),
                    StepRequest::Otp(_) => flow.write().otp_accepted(),
                    StepRequest::Password(_) => {
                        flow.write().password_accepted();
                        delay(RESET_CLOSE_DELAY).await;
                        close();
                    }
                },
                Err(e) => {
                    tracing::warn!("Password reset step {:?} failed: {}", step, e);
                    error.set(Some(e.user_message(step.failure_fallback())));
                }
            }
        });
    };

    if !open {
        return rsx! {};
    }

    let step = flow.read().step();
    let reset_email = flow.read().email().to_string();
    let busy = loading();

    rsx! {
        Modal { title: "Forgot Password".to_string(), on_close: move |_| close(),
            if let Some(message) = error() {
                ErrorAlert { message, on_dismiss: move |_| error.set(None) }
            }
            {match step {
                ResetStep::Email => rsx! {
                    form { class: "stack", onsubmit: on_submit,
                        p { "Enter your email to receive a verification code" }
                        input {
                            r#type: "email",
                            placeholder: "Email*",
                            "aria-label": "Email",
                            required: true,
                            value: "{email}",
                            oninput: move |e| email.set(e.value()),
                        }
                        button { class: "btn btn-primary", r#type: "submit", disabled: busy,
                            if busy { "Sending..." } else { "Send Code" }
                        }
                    }
                },
                ResetStep::Otp => rsx! {
                    form { class: "stack", onsubmit: on_submit,
                        h3 { "Enter Verification Code" }
                        p { "Enter the 6-digit code sent to {reset_email}" }
                        input {
                            r#type: "text",
                            placeholder: "Verification Code",
                            maxlength: 6,
                            required: true,
                            value: "{otp}",
                            oninput: move |e| otp.set(otp_digits(&e.value())),
                        }
                        button { class: "btn btn-primary", r#type: "submit", disabled: busy,
                            if busy { "Verifying..." } else { "Verify Code" }
                        }
                    }
                },
                ResetStep::NewPassword => rsx! {
                    form { class: "stack", onsubmit: on_submit,
                        h3 { "Reset Password" }
                        input {
                            r#type: "password",
                            placeholder: "New Password* (min 6 characters)",
                            "aria-label": "New Password",
                            required: true,
                            value: "{new_password}",
                            oninput: move |e| new_password.set(e.value()),
                        }
                        input {
                            r#type: "password",
                            placeholder: "Confirm Password*",
                            "aria-label": "Confirm Password",
                            required: true,
                            value: "{confirm_password}",
                            oninput: move |e| confirm_password.set(e.value()),
                        }
                        button { class: "btn btn-primary", r#type: "submit", disabled: busy,
                            if busy { "Resetting..." } else { "Reset Password" }
                        }
                    }
                },
                ResetStep::Success => rsx! {
                    div { class: "success-step",
                        div { class: "icon icon-success" }
                        h3 { "Password Reset Successful!" }
                    }
                },
            }}
        }
    }
}

/// Request for the step being submitted
enum StepRequest {
    Email(ForgotPasswordRequest),
    Otp(VerifyOtpRequest),
    Password(ResetPasswordRequest),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_input_keeps_six_digits() {
        assert_eq!(otp_digits("12a3 45678"), "123456");
        assert_eq!(otp_digits("abc"), "");
    }
}
