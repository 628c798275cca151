use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::ListingConfig;
use crate::database::ProductQuery;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub category: Option<String>,
}

impl ListParams {
    /// Apply defaults and clamp the page size to the configured maximum.
    pub fn resolve(self, listing: &ListingConfig) -> Result<ProductQuery, ApiError> {
        let limit = match self.limit {
            Some(limit) if limit < 1 => {
                return Err(ApiError::bad_request("limit must be a positive integer"));
            }
            Some(limit) => limit.min(listing.max_limit),
            None => listing.default_limit,
        };

        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::bad_request("offset must not be negative"));
        }

        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(ProductQuery { limit, offset, category })
    }
}

/// GET /products - Products owned by the caller, newest first
///
/// Query: `limit`, `offset`, `category`
///
/// Expected Output:
/// ```json
/// { "products": [ ... ], "total": 42 }
/// ```
/// `total` counts every matching product, not just the returned page.
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let query = params.resolve(&state.config.listing)?;

    let page = state.catalog.list_products(user.id, &query).await?;

    Ok(Json(json!({
        "products": page.products,
        "total": page.total
    })))
}
