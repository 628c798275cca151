use axum::{extract::rejection::JsonRejection, extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::auth::{removal_cookie, session_cookie};
use crate::database::models::NewUser;
use crate::error::ApiError;
use crate::state::AppState;

use super::utils::{default_display_name, json_body, normalize_email, provider_failure, SignInRequest};

/// POST /signin - Authenticate with the identity provider and receive the session cookie
///
/// A provider account without a profile row (sign-up stored the account but
/// not the profile) gets its profile recreated here.
///
/// Expected Input:
/// ```json
/// { "email": "string", "password": "string" }
/// ```
///
/// Expected Output (Success), with `Set-Cookie: auth-token=...`:
/// ```json
/// {
///   "message": "Signed in successfully",
///   "user": { "id": "uuid", "email": "ana@example.com", "name": "Ana", ... }
/// }
/// ```
pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let credentials = json_body(payload)?.validate()?;

    let identity = state
        .identity
        .sign_in(&credentials.email, &credentials.password)
        .await
        .map_err(|e| provider_failure(e, ApiError::Unauthorized))?;

    let user = match state.users.find_by_id(identity.id).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Provider user {} has no profile row, recreating it", identity.id);
            let name = default_display_name(&identity.email);
            state
                .users
                .create(NewUser {
                    id: identity.id,
                    email: normalize_email(&identity.email),
                    name,
                })
                .await?
        }
    };

    let session = state.sessions.issue(user.id, &user.email)?;
    let jar = jar.add(session_cookie(
        session.token,
        state.sessions.ttl(),
        state.secure_cookies(),
    ));

    tracing::info!("User {} signed in", user.id);

    Ok((
        jar,
        Json(json!({
            "message": "Signed in successfully",
            "user": user
        })),
    ))
}

/// POST /signout - Clear the session cookie
///
/// Tokens are stateless, so this only removes the cookie from the client; a
/// copied token stays valid until it expires.
pub async fn signout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar.add(removal_cookie(state.secure_cookies()));
    (jar, Json(json!({ "message": "Signed out successfully" })))
}
