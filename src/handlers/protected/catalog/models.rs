use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// GET /models - Models owned by the caller, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Value>, ApiError> {
    let models = state.catalog.list_models(user.id).await?;
    Ok(Json(json!({ "models": models })))
}
