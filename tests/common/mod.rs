#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use studio_api::auth::{IdentityProvider, ProviderError, ProviderUser, SessionKeys};
use studio_api::config::AppConfig;
use studio_api::database::models::{Model, NewUser, Photoshoot, PhotoshootDetail, Product, User};
use studio_api::database::{CatalogStore, DatabaseError, ProductPage, ProductQuery, UserStore};
use studio_api::AppState;

/// Users keyed by id, with a switch to simulate a database outage.
#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
    pub fail: Mutex<bool>,
}

impl MemoryUsers {
    pub fn insert(&self, id: Uuid, email: &str, name: &str) -> User {
        let now = Utc::now();
        let user = User {
            id,
            email: email.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().insert(id, user.clone());
        user
    }

    pub fn remove(&self, id: Uuid) {
        self.users.lock().unwrap().remove(&id);
    }

    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if *self.fail.lock().unwrap() {
            return Err(DatabaseError::QueryError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        self.check()?;
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        self.check()?;
        if let Some(existing) = self.users.lock().unwrap().get(&user.id) {
            return Ok(existing.clone());
        }
        let taken = self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email));
        if taken {
            return Err(DatabaseError::QueryError(format!(
                "A profile already exists for {}",
                user.email
            )));
        }
        Ok(self.insert(user.id, &user.email, &user.name))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.check()
    }
}

/// Catalog rows with the same ownership rules as the SQL implementation.
#[derive(Default)]
pub struct MemoryCatalog {
    pub models: Mutex<Vec<Model>>,
    pub products: Mutex<Vec<Product>>,
    pub photoshoots: Mutex<Vec<Photoshoot>>,
    pub fail: Mutex<bool>,
}

impl MemoryCatalog {
    pub fn add_model(&self, owner: Uuid, name: &str) -> Model {
        let now = Utc::now();
        let model = Model {
            id: Uuid::new_v4(),
            user_id: owner,
            name: name.to_string(),
            gender: Some("female".to_string()),
            age: Some(27),
            description: None,
            image_url: Some(format!("https://cdn.example.com/models/{}.jpg", name)),
            created_at: now,
            updated_at: now,
        };
        self.models.lock().unwrap().push(model.clone());
        model
    }

    pub fn add_product(&self, owner: Uuid, name: &str, category: Option<&str>) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            user_id: owner,
            name: name.to_string(),
            category: category.map(str::to_string),
            description: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        self.products.lock().unwrap().push(product.clone());
        product
    }

    pub fn add_photoshoot(
        &self,
        owner: Uuid,
        name: &str,
        product_id: Option<Uuid>,
        model_id: Option<Uuid>,
    ) -> Photoshoot {
        let now = Utc::now();
        let photoshoot = Photoshoot {
            id: Uuid::new_v4(),
            user_id: owner,
            name: name.to_string(),
            product_id,
            model_id,
            status: "completed".to_string(),
            result_images: vec!["https://cdn.example.com/shoots/1.jpg".to_string()],
            created_at: now,
            updated_at: now,
        };
        self.photoshoots.lock().unwrap().push(photoshoot.clone());
        photoshoot
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if *self.fail.lock().unwrap() {
            return Err(DatabaseError::QueryError("relation \"products\" does not exist".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn list_models(&self, owner: Uuid) -> Result<Vec<Model>, DatabaseError> {
        self.check()?;
        let mut models: Vec<Model> = self
            .models
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == owner)
            .cloned()
            .collect();
        models.reverse();
        Ok(models)
    }

    async fn list_products(&self, owner: Uuid, query: &ProductQuery) -> Result<ProductPage, DatabaseError> {
        self.check()?;
        let mut matching: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == owner)
            .filter(|p| query.category.is_none() || p.category == query.category)
            .cloned()
            .collect();
        matching.reverse();

        let total = matching.len() as i64;
        let products = matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect();

        Ok(ProductPage { products, total })
    }

    async fn list_photoshoots(&self, owner: Uuid) -> Result<Vec<Photoshoot>, DatabaseError> {
        self.check()?;
        let mut photoshoots: Vec<Photoshoot> = self
            .photoshoots
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == owner)
            .cloned()
            .collect();
        photoshoots.reverse();
        Ok(photoshoots)
    }

    async fn find_photoshoot(&self, owner: Uuid, id: Uuid) -> Result<Option<PhotoshootDetail>, DatabaseError> {
        self.check()?;
        let photoshoot = self
            .photoshoots
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id && s.user_id == owner)
            .cloned();

        Ok(photoshoot.map(|photoshoot| {
            let product = self
                .products
                .lock()
                .unwrap()
                .iter()
                .find(|p| Some(p.id) == photoshoot.product_id && p.user_id == owner)
                .cloned();
            let model = self
                .models
                .lock()
                .unwrap()
                .iter()
                .find(|m| Some(m.id) == photoshoot.model_id && m.user_id == owner)
                .cloned();
            PhotoshootDetail { photoshoot, product, model }
        }))
    }
}

/// Identity provider holding accounts in memory and answering with GoTrue's messages.
#[derive(Default)]
pub struct FakeIdentity {
    accounts: Mutex<HashMap<String, (Uuid, String)>>,
    pub unreachable: Mutex<bool>,
}

impl FakeIdentity {
    pub fn register(&self, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_lowercase(), (id, password.to_string()));
        id
    }

    fn reachable(&self) -> Result<(), ProviderError> {
        if *self.unreachable.lock().unwrap() {
            return Err(ProviderError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_up(&self, email: &str, password: &str, _name: &str) -> Result<ProviderUser, ProviderError> {
        self.reachable()?;
        if self.accounts.lock().unwrap().contains_key(email) {
            return Err(ProviderError::Rejected {
                status: 422,
                message: "User already registered".to_string(),
            });
        }
        let id = self.register(email, password);
        Ok(ProviderUser { id, email: email.to_string() })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderUser, ProviderError> {
        self.reachable()?;
        match self.accounts.lock().unwrap().get(email) {
            Some((id, stored)) if stored == password => Ok(ProviderUser {
                id: *id,
                email: email.to_string(),
            }),
            _ => Err(ProviderError::Rejected {
                status: 400,
                message: "Invalid login credentials".to_string(),
            }),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub sessions: Arc<SessionKeys>,
    pub users: Arc<MemoryUsers>,
    pub catalog: Arc<MemoryCatalog>,
    pub identity: Arc<FakeIdentity>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Value of the `auth-token` cookie set by this response, if any
    pub fn auth_cookie(&self) -> Option<String> {
        self.set_cookie_header()
            .and_then(|raw| raw.split(';').next().map(str::to_string))
            .and_then(|pair| pair.strip_prefix("auth-token=").map(str::to_string))
    }

    /// Raw `Set-Cookie` header for `auth-token`, attributes included
    pub fn set_cookie_header(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("auth-token="))
            .map(str::to_string)
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::for_tests())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let users = Arc::new(MemoryUsers::default());
        let catalog = Arc::new(MemoryCatalog::default());
        let identity = Arc::new(FakeIdentity::default());

        let state = AppState::new(config, users.clone(), catalog.clone(), identity.clone());
        let sessions = state.sessions.clone();

        Self {
            router: studio_api::app(state),
            sessions,
            users,
            catalog,
            identity,
        }
    }

    /// Create a user both at the provider and in the profile store
    pub fn seed_user(&self, email: &str, password: &str) -> User {
        let id = self.identity.register(email, password);
        self.users.insert(id, email, email.split('@').next().unwrap_or(email))
    }

    pub fn token_for(&self, user: &User) -> String {
        self.sessions.issue(user.id, &user.email).unwrap().token
    }

    pub fn expired_token_for(&self, user: &User) -> String {
        let issued_at = Utc::now() - self.sessions.ttl() - Duration::minutes(1);
        self.sessions.issue_at(user.id, &user.email, issued_at).unwrap().token
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, None, Some(body)).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("auth-token={}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, headers, body }
    }
}
