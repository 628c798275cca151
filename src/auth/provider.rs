use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// The identity as confirmed by the provider after a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider refused the credentials; `message` is safe to show the client.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Identity provider unavailable: {0}")]
    Transport(String),

    #[error("Unexpected identity provider response: {0}")]
    InvalidResponse(String),
}

/// External service that owns passwords. Nothing in this crate stores or
/// compares a password; it is forwarded here and forgotten.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<ProviderUser, ProviderError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderUser, ProviderError>;
}

/// Supabase (GoTrue) auth client speaking the `/auth/v1` REST API.
pub struct GoTrueProvider {
    client: reqwest::Client,
    base_url: Url,
    anon_key: String,
}

impl GoTrueProvider {
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> Result<Self, ProviderError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ProviderError::InvalidResponse(format!("invalid provider URL: {}", e)))?;

        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            anon_key: anon_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::InvalidResponse(format!("invalid endpoint {}: {}", path, e)))
    }

    async fn post(&self, url: Url, body: Value) -> Result<Value, ProviderError> {
        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let payload: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message: error_message(status, &payload),
            });
        }

        Ok(payload)
    }
}

#[async_trait]
impl IdentityProvider for GoTrueProvider {
    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<ProviderUser, ProviderError> {
        let url = self.endpoint("auth/v1/signup")?;
        let payload = self
            .post(
                url,
                json!({
                    "email": email,
                    "password": password,
                    "data": { "name": name }
                }),
            )
            .await?;

        tracing::debug!("Identity provider accepted sign-up for {}", email);
        extract_user(payload)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderUser, ProviderError> {
        let url = self.endpoint("auth/v1/token?grant_type=password")?;
        let payload = self
            .post(url, json!({ "email": email, "password": password }))
            .await?;

        extract_user(payload)
    }
}

/// Sign-up answers with a bare user when email confirmation is on and with a
/// session wrapping the user when it is off; password grants always wrap.
fn extract_user(payload: Value) -> Result<ProviderUser, ProviderError> {
    let user = match payload.get("user") {
        Some(user) if user.is_object() => user.clone(),
        _ => payload,
    };

    serde_json::from_value(user).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

/// GoTrue reports errors under a handful of keys depending on the endpoint and version.
fn error_message(status: StatusCode, payload: &Value) -> String {
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .filter(|msg| !msg.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Identity provider returned status {}", status.as_u16()))
}
