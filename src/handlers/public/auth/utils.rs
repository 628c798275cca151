use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Deserialize;

use crate::auth::ProviderError;
use crate::error::ApiError;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default, Deserialize)]
pub struct SignUpRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SignInRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Sign-up input after validation
#[derive(Debug, PartialEq, Eq)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Sign-in input after validation
#[derive(Debug, PartialEq, Eq)]
pub struct SignIn {
    pub email: String,
    pub password: String,
}

impl SignUpRequest {
    pub fn validate(self) -> Result<SignUp, ApiError> {
        let (email, password) = required_credentials(self.email, self.password)?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::bad_request(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }

        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_display_name(&email));

        Ok(SignUp { email, password, name })
    }
}

impl SignInRequest {
    pub fn validate(self) -> Result<SignIn, ApiError> {
        let (email, password) = required_credentials(self.email, self.password)?;
        Ok(SignIn { email, password })
    }
}

/// Unwrap a JSON body, turning extractor rejections into `{"error": ...}` 400s.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Emails are unique case-insensitively, so they are stored lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Display name used when sign-up omits one: the local part of the email.
pub fn default_display_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

/// Map an identity provider failure to a response. Rejections carry the
/// provider's own message with the given status; anything else is a 500.
pub fn provider_failure(err: ProviderError, rejected: fn(String) -> ApiError) -> ApiError {
    match err {
        ProviderError::Rejected { status, message } => {
            tracing::warn!("Identity provider rejected request ({}): {}", status, message);
            rejected(message)
        }
        other => {
            tracing::error!("Identity provider failure: {}", other);
            ApiError::upstream(other.to_string())
        }
    }
}

fn required_credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String), ApiError> {
    let email = email.map(|e| normalize_email(&e)).filter(|e| !e.is_empty());
    let password = password.filter(|p| !p.is_empty());

    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::bad_request("Email and password are required"));
    };

    if !is_plausible_email(&email) {
        return Err(ApiError::bad_request("Invalid email address"));
    }

    Ok((email, password))
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
