use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Model, Product};

/// A photoshoot pairing one product with one model. Either side may be
/// unset while the shoot is still being planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Photoshoot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub product_id: Option<Uuid>,
    pub model_id: Option<Uuid>,
    /// pending | processing | completed | failed
    pub status: String,
    pub result_images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Photoshoot with its product and model joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoshootDetail {
    #[serde(flatten)]
    pub photoshoot: Photoshoot,
    pub product: Option<Product>,
    pub model: Option<Model>,
}
