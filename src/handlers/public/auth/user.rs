use axum::{extract::rejection::JsonRejection, extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::auth::session_cookie;
use crate::database::models::NewUser;
use crate::error::ApiError;
use crate::state::AppState;

use super::utils::{json_body, provider_failure, SignUpRequest};

/// POST /signup - Register a new account
///
/// Credentials are created by the identity provider; this service only
/// stores the profile row keyed by the provider's user id, then signs the
/// user in.
///
/// Expected Input:
/// ```json
/// {
///   "email": "string",      // Required
///   "password": "string",   // Required: at least 6 characters
///   "name": "string"        // Optional: defaults to the email local part
/// }
/// ```
///
/// Expected Output (Success), with `Set-Cookie: auth-token=...`:
/// ```json
/// {
///   "message": "Account created successfully",
///   "user": { "id": "uuid", "email": "ana@example.com", "name": "Ana", ... }
/// }
/// ```
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let signup = json_body(payload)?.validate()?;

    let identity = state
        .identity
        .sign_up(&signup.email, &signup.password, &signup.name)
        .await
        .map_err(|e| provider_failure(e, ApiError::BadRequest))?;

    let user = state
        .users
        .create(NewUser {
            id: identity.id,
            email: signup.email,
            name: signup.name,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to store profile for provider user {}: {}", identity.id, e);
            ApiError::upstream(e.to_string())
        })?;

    let session = state.sessions.issue(user.id, &user.email)?;
    let jar = jar.add(session_cookie(
        session.token,
        state.sessions.ttl(),
        state.secure_cookies(),
    ));

    tracing::info!("Created account {} for {}", user.id, user.email);

    Ok((
        jar,
        Json(json!({
            "message": "Account created successfully",
            "user": user
        })),
    ))
}
