use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{NewUser, User};

const EMAIL_INDEX: &str = "users_email_lower_idx";

/// User profile storage. Every call is a fresh read; nothing is cached.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// Insert the profile for a provider user. Repeating the call for an id
    /// that already has a profile returns the stored row unchanged.
    async fn create(&self, user: NewUser) -> Result<User, DatabaseError>;

    /// Connectivity check for `/health`
    async fn ping(&self) -> Result<(), DatabaseError>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, created_at, updated_at
             FROM users
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, name)
             VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET updated_at = users.updated_at
             RETURNING id, email, name, created_at, updated_at",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let email_taken = matches!(
                &e,
                sqlx::Error::Database(db) if db.constraint() == Some(EMAIL_INDEX)
            );
            if email_taken {
                DatabaseError::QueryError(format!("A profile already exists for {}", user.email))
            } else {
                DatabaseError::from(e)
            }
        })?;

        Ok(created)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
