use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Minimum accepted length for the session signing secret outside development.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted session lifetime (one year).
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365;

/// Fallback secret so `cargo run` works against a local database with no setup.
const DEVELOPMENT_SECRET: &str = "studio-api-development-secret-change-me-please";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("JWT_SECRET must be at least 32 bytes")]
    WeakSecret,

    #[error("Invalid configuration value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub listing: ListingConfig,
    pub security: SecurityConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Seconds to wait when acquiring a pooled connection
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub session_ttl_hours: u64,
    pub require_https: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub supabase_url: String,
    #[serde(skip_serializing)]
    pub supabase_anon_key: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(port) = env::var("STUDIO_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Listing overrides
        if let Ok(v) = env::var("LISTING_DEFAULT_LIMIT") {
            self.listing.default_limit = v.parse().unwrap_or(self.listing.default_limit);
        }
        if let Ok(v) = env::var("LISTING_MAX_LIMIT") {
            self.listing.max_limit = v.parse().unwrap_or(self.listing.max_limit);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_SESSION_TTL_HOURS") {
            self.security.session_ttl_hours = v.parse().unwrap_or(self.security.session_ttl_hours);
        }
        if let Ok(v) = env::var("SECURITY_REQUIRE_HTTPS") {
            self.security.require_https = v.parse().unwrap_or(self.security.require_https);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Identity provider overrides
        if let Ok(v) = env::var("SUPABASE_URL") {
            self.identity.supabase_url = v;
        }
        if let Ok(v) = env::var("SUPABASE_ANON_KEY") {
            self.identity.supabase_anon_key = v;
        }

        self
    }

    /// Check the values the server cannot start without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.environment != Environment::Development
            && self.security.jwt_secret.len() < MIN_SECRET_LEN
        {
            return Err(ConfigError::WeakSecret);
        }
        let ttl = self.security.session_ttl_hours;
        if ttl == 0 || ttl > MAX_SESSION_TTL_HOURS {
            return Err(ConfigError::Invalid {
                name: "SECURITY_SESSION_TTL_HOURS",
                value: ttl.to_string(),
            });
        }
        if self.listing.default_limit < 1 || self.listing.max_limit < self.listing.default_limit {
            return Err(ConfigError::Invalid {
                name: "LISTING_DEFAULT_LIMIT",
                value: self.listing.default_limit.to_string(),
            });
        }
        Ok(())
    }

    /// Identity provider settings are only needed by the sign-up/sign-in routes.
    pub fn validate_identity(&self) -> Result<(), ConfigError> {
        if self.identity.supabase_url.is_empty() {
            return Err(ConfigError::Missing("SUPABASE_URL"));
        }
        if self.identity.supabase_anon_key.is_empty() {
            return Err(ConfigError::Missing("SUPABASE_ANON_KEY"));
        }
        url::Url::parse(&self.identity.supabase_url).map_err(|_| ConfigError::Invalid {
            name: "SUPABASE_URL",
            value: self.identity.supabase_url.clone(),
        })?;
        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            listing: ListingConfig {
                default_limit: 50,
                max_limit: 500,
            },
            security: SecurityConfig {
                jwt_secret: DEVELOPMENT_SECRET.to_string(),
                session_ttl_hours: 24 * 7, // 1 week
                require_https: false,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            identity: IdentityConfig {
                supabase_url: "http://localhost:54321".to_string(),
                supabase_anon_key: String::new(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            listing: ListingConfig {
                default_limit: 50,
                max_limit: 200,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                session_ttl_hours: 24 * 7,
                require_https: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            identity: IdentityConfig {
                supabase_url: String::new(),
                supabase_anon_key: String::new(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
            },
            listing: ListingConfig {
                default_limit: 25,
                max_limit: 100,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                session_ttl_hours: 24 * 7,
                require_https: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            identity: IdentityConfig {
                supabase_url: String::new(),
                supabase_anon_key: String::new(),
            },
        }
    }

    /// Development profile with a database URL filled in, for tests and local tooling.
    pub fn for_tests() -> Self {
        let mut config = Self::development();
        config.database.url = "postgres://localhost/studio_test".to_string();
        config
    }
}
