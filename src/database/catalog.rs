use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool, Row};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Model, Photoshoot, PhotoshootDetail, Product};

/// Paging and filtering for the product listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub limit: i64,
    pub offset: i64,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Matching rows ignoring limit/offset
    pub total: i64,
}

/// Read access to the models, products and photoshoots a user owns.
///
/// Every method takes the owner id first and must never return a row whose
/// `user_id` differs from it, including rows reached through joins.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_models(&self, owner: Uuid) -> Result<Vec<Model>, DatabaseError>;

    async fn list_products(&self, owner: Uuid, query: &ProductQuery) -> Result<ProductPage, DatabaseError>;

    async fn list_photoshoots(&self, owner: Uuid) -> Result<Vec<Photoshoot>, DatabaseError>;

    async fn find_photoshoot(&self, owner: Uuid, id: Uuid) -> Result<Option<PhotoshootDetail>, DatabaseError>;
}

pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_models(&self, owner: Uuid) -> Result<Vec<Model>, DatabaseError> {
        let models = sqlx::query_as::<_, Model>(
            "SELECT id, user_id, name, gender, age, description, image_url, created_at, updated_at
             FROM models
             WHERE user_id = $1
             ORDER BY created_at DESC, id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(models)
    }

    async fn list_products(&self, owner: Uuid, query: &ProductQuery) -> Result<ProductPage, DatabaseError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, user_id, name, category, description, image_url, created_at, updated_at
             FROM products
             WHERE user_id = $1
             AND ($2::text IS NULL OR category = $2)
             ORDER BY created_at DESC, id
             LIMIT $3 OFFSET $4",
        )
        .bind(owner)
        .bind(query.category.as_deref())
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)
             FROM products
             WHERE user_id = $1
             AND ($2::text IS NULL OR category = $2)",
        )
        .bind(owner)
        .bind(query.category.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(ProductPage { products, total })
    }

    async fn list_photoshoots(&self, owner: Uuid) -> Result<Vec<Photoshoot>, DatabaseError> {
        let photoshoots = sqlx::query_as::<_, Photoshoot>(
            "SELECT id, user_id, name, product_id, model_id, status, result_images, created_at, updated_at
             FROM photoshoots
             WHERE user_id = $1
             ORDER BY created_at DESC, id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(photoshoots)
    }

    async fn find_photoshoot(&self, owner: Uuid, id: Uuid) -> Result<Option<PhotoshootDetail>, DatabaseError> {
        // Joined rows must share the photoshoot's owner as well
        let row = sqlx::query(
            "SELECT s.id, s.user_id, s.name, s.product_id, s.model_id, s.status, s.result_images,
                    s.created_at, s.updated_at,
                    to_jsonb(p) AS product,
                    to_jsonb(m) AS model
             FROM photoshoots s
             LEFT JOIN products p ON p.id = s.product_id AND p.user_id = s.user_id
             LEFT JOIN models m ON m.id = s.model_id AND m.user_id = s.user_id
             WHERE s.id = $1
             AND s.user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let photoshoot = Photoshoot::from_row(&row)?;
        let product: Option<Json<Product>> = row.try_get("product")?;
        let model: Option<Json<Model>> = row.try_get("model")?;

        Ok(Some(PhotoshootDetail {
            photoshoot,
            product: product.map(|Json(p)| p),
            model: model.map(|Json(m)| m),
        }))
    }
}
