use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{SecurityConfig, MAX_SESSION_TTL_HOURS};

/// Claims embedded in the `auth-token` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session token is malformed")]
    Malformed,

    #[error("Session token has expired")]
    Expired,

    #[error("Session token signature does not verify")]
    BadSignature,

    #[error("Session token rejected: {0}")]
    Rejected(String),

    #[error("JWT generation error: {0}")]
    Encoding(String),
}

/// A freshly minted token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// HS256 signing and verification keys plus the session lifetime.
///
/// Sessions are stateless: a token stays valid until `exp` no matter what
/// happens server side, so there is no way to revoke one early.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; a token is dead the second `exp` passes
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// The lifetime is capped at [`MAX_SESSION_TTL_HOURS`] even when the
    /// configuration was not validated.
    pub fn from_config(security: &SecurityConfig) -> Self {
        let hours = security.session_ttl_hours.min(MAX_SESSION_TTL_HOURS);
        let ttl = i64::try_from(hours)
            .ok()
            .and_then(Duration::try_hours)
            .unwrap_or_else(|| Duration::days(365));
        Self::new(security.jwt_secret.as_bytes(), ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for a user the identity provider has just authenticated.
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<IssuedSession, SessionError> {
        self.issue_at(user_id, email, Utc::now())
    }

    /// Same as [`issue`](Self::issue) with an explicit issued-at instant.
    pub fn issue_at(
        &self,
        user_id: Uuid,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedSession, SessionError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| SessionError::Encoding("session expiry is out of range".to_string()))?;
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::Encoding(e.to_string()))?;

        Ok(IssuedSession { token, expires_at })
    }

    /// Check signature and expiry and return the embedded claims.
    ///
    /// Never panics on hostile input; every failure is reported as a
    /// [`SessionError`].
    pub fn verify(&self, token: &str) -> Result<Claims, SessionError> {
        if token.trim().is_empty() {
            return Err(SessionError::Malformed);
        }

        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => SessionError::Expired,
                ErrorKind::InvalidSignature => SessionError::BadSignature,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => SessionError::Malformed,
                other => SessionError::Rejected(format!("{:?}", other)),
            })
    }

    /// Verify a token and return only the user id it carries.
    pub fn verify_user_id(&self, token: &str) -> Result<Uuid, SessionError> {
        self.verify(token).map(|claims| claims.sub)
    }
}
