use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::token_from_jar;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user resolved from the session cookie, injected by
/// [`require_session`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Session middleware for every protected route.
///
/// Stops at the first failure: no cookie (401), token that does not verify
/// (401), user that no longer exists (404). On success the freshly loaded
/// user is placed in the request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = token_from_jar(&jar).ok_or_else(ApiError::missing_token)?;

    let user_id = state.sessions.verify_user_id(&token).map_err(|e| {
        tracing::warn!("Rejected session token on {}: {}", request.uri().path(), e);
        ApiError::invalid_token()
    })?;

    let user = state.users.find_by_id(user_id).await?.ok_or_else(|| {
        tracing::warn!("Session token references missing user {}", user_id);
        ApiError::user_not_found()
    })?;

    tracing::debug!("Session valid for {} ({})", user.email, user.id);

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
