use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{IdentityProvider, SessionKeys};
use crate::config::AppConfig;
use crate::database::{CatalogStore, PgCatalogStore, PgUserStore, UserStore};

/// Everything a handler needs, injected once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionKeys>,
    pub users: Arc<dyn UserStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserStore>,
        catalog: Arc<dyn CatalogStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let sessions = SessionKeys::from_config(&config.security);
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            users,
            catalog,
            identity,
        }
    }

    /// State backed by Postgres stores sharing one pool
    pub fn postgres(config: AppConfig, pool: PgPool, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::new(
            config,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgCatalogStore::new(pool)),
            identity,
        )
    }

    /// Whether session cookies get the `Secure` flag
    pub fn secure_cookies(&self) -> bool {
        self.config.security.require_https
    }
}
