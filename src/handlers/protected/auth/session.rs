use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::middleware::CurrentUser;

/// GET /me - Current authenticated user
///
/// The user is loaded from the database by the session middleware on every
/// request, so a deleted account never comes back from a still-valid token.
///
/// Expected Output:
/// ```json
/// {
///   "user": {
///     "id": "uuid",
///     "email": "ana@example.com",
///     "name": "Ana",
///     "created_at": "2025-01-01T00:00:00Z",
///     "updated_at": "2025-01-01T00:00:00Z"
///   }
/// }
/// ```
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<Value> {
    Json(json!({ "user": user }))
}
