//! Sign-up and password-reset step machines.
//!
//! Both flows are multi-step forms where each step needs a successful
//! backend call before the next one opens. The machines only hold the
//! collected input; pages drive the HTTP calls through
//! [`crate::client::ApiClient`] and report back with the `*_accepted` methods.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

use crate::client::{
    ForgotPasswordRequest, ResetPasswordRequest, SignupResponse, TempUser, VerifyOtpRequest,
    VerifySignupOtpRequest,
};

pub const OTP_LEN: usize = 6;
pub const MIN_PASSWORD_LEN: usize = 6;

/// How long the "signup successful" notice stays before returning to sign in
pub const SIGNUP_SUCCESS_DELAY: Duration = Duration::from_secs(3);
/// How long the reset wizard shows its success step before closing
pub const RESET_CLOSE_DELAY: Duration = Duration::from_secs(2);

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

/// Input rejected before anything is sent
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Verification code is required")]
    OtpRequired,
    #[error("Please enter a valid 6-digit verification code")]
    InvalidOtp,
    #[error("New password is required")]
    PasswordRequired,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

fn check_email(email: &str) -> Result<String, InputError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(InputError::EmailRequired);
    }
    if !is_valid_email(email) {
        return Err(InputError::InvalidEmail);
    }
    Ok(email.to_string())
}

fn check_otp(otp: &str) -> Result<String, InputError> {
    let otp = otp.trim();
    if otp.is_empty() {
        return Err(InputError::OtpRequired);
    }
    if otp.chars().count() != OTP_LEN {
        return Err(InputError::InvalidOtp);
    }
    Ok(otp.to_string())
}

// =============================================================================
// Sign up
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SignupStep {
    /// Collecting email, username, password and mobile number
    #[default]
    Details,
    /// Backend sent an OTP; the pending account waits for it
    Otp { temp_user: TempUser },
    /// Account verified
    Done,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignupFlow {
    step: SignupStep,
}

impl SignupFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> &SignupStep {
        &self.step
    }

    pub fn awaiting_otp(&self) -> bool {
        matches!(self.step, SignupStep::Otp { .. })
    }

    /// `/auth/signup` succeeded
    pub fn details_accepted(&mut self, response: SignupResponse) {
        self.step = SignupStep::Otp {
            temp_user: response.temp_user,
        };
    }

    /// Body for `/auth/verify-signup-otp`, available only while waiting for the OTP
    pub fn verify_request(&self, otp: &str) -> Option<VerifySignupOtpRequest> {
        match &self.step {
            SignupStep::Otp { temp_user } => Some(VerifySignupOtpRequest::new(temp_user, otp)),
            _ => None,
        }
    }

    pub fn otp_accepted(&mut self) {
        if self.awaiting_otp() {
            self.step = SignupStep::Done;
        }
    }

    /// Back to an empty details step (mode switch or after success)
    pub fn reset(&mut self) {
        self.step = SignupStep::Details;
    }
}

// =============================================================================
// Password reset
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResetStep {
    #[default]
    Email,
    Otp,
    NewPassword,
    Success,
}

impl ResetStep {
    /// Shown when the backend rejects this step without its own message
    pub fn failure_fallback(&self) -> &'static str {
        match self {
            ResetStep::Email => "Failed to send verification code. Please try again.",
            ResetStep::Otp => "Invalid verification code. Please try again.",
            ResetStep::NewPassword | ResetStep::Success => {
                "Failed to reset password. Please try again."
            }
        }
    }
}

/// Forgot-password wizard: email -> otp -> new password -> success
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResetFlow {
    step: ResetStep,
    email: String,
    otp: String,
}

impl ResetFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn submit_email(&mut self, email: &str) -> Result<ForgotPasswordRequest, InputError> {
        let email = check_email(email)?;
        self.email = email.clone();
        Ok(ForgotPasswordRequest { email })
    }

    pub fn email_accepted(&mut self) {
        if self.step == ResetStep::Email {
            self.step = ResetStep::Otp;
        }
    }

    pub fn submit_otp(&mut self, otp: &str) -> Result<VerifyOtpRequest, InputError> {
        let email = check_email(&self.email)?;
        let otp = check_otp(otp)?;
        self.otp = otp.clone();
        Ok(VerifyOtpRequest { email, otp })
    }

    pub fn otp_accepted(&mut self) {
        if self.step == ResetStep::Otp {
            self.step = ResetStep::NewPassword;
        }
    }

    /// Re-checks the earlier steps, then the new password and its confirmation
    pub fn submit_password(
        &self,
        password: &str,
        confirm_password: &str,
    ) -> Result<ResetPasswordRequest, InputError> {
        let email = check_email(&self.email)?;
        let otp = check_otp(&self.otp)?;
        if password.is_empty() {
            return Err(InputError::PasswordRequired);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(InputError::PasswordTooShort);
        }
        if password != confirm_password {
            return Err(InputError::PasswordMismatch);
        }
        Ok(ResetPasswordRequest {
            email,
            otp,
            password: password.to_string(),
            confirm_password: confirm_password.to_string(),
        })
    }

    pub fn password_accepted(&mut self) {
        if self.step == ResetStep::NewPassword {
            self.step = ResetStep::Success;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
