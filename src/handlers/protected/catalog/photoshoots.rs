use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// GET /photoshoots - Photoshoots owned by the caller, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Value>, ApiError> {
    let photoshoots = state.catalog.list_photoshoots(user.id).await?;
    Ok(Json(json!({ "photoshoots": photoshoots })))
}

/// GET /photoshoots/:id - One photoshoot with its product and model
///
/// Expected Output:
/// ```json
/// {
///   "photoshoot": {
///     "id": "uuid",
///     "name": "Spring campaign",
///     "status": "completed",
///     "result_images": ["https://..."],
///     "product": { ... } | null,
///     "model": { ... } | null,
///     ...
///   }
/// }
/// ```
/// A photoshoot owned by someone else is indistinguishable from a missing one.
pub async fn get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::bad_request("Invalid photoshoot id"))?;

    let photoshoot = state
        .catalog
        .find_photoshoot(user.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Photoshoot not found"))?;

    Ok(Json(json!({ "photoshoot": photoshoot })))
}
