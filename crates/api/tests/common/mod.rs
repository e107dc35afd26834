//! Shared harness for HTTP tests: the real router over an in-memory store.

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use pocket_shop_api::{
    AppState, app,
    config::{ApiConfig, JwtConfig},
    db::{MemoryStore, Repositories},
    services::{
        Argon2PasswordService, JwtAuthTokenProvider, PasswordError, PasswordService,
    },
};

pub const SIGNING_KEY: &str = "t7Rq!9vLw2Zx#5Mn8Bp$3Kd6Hs@1Fj4Gc";

/// Reversible stand-in for argon2 so tests don't pay for real hashing.
pub struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        Ok(format!("plain${password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: SecretString::from(SIGNING_KEY),
        ttl_hours: 168,
    }
}

#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_passwords(Arc::new(PlainPasswords))
    }

    /// Same app with the production argon2 hasher.
    pub fn with_argon2() -> Self {
        Self::with_passwords(Arc::new(Argon2PasswordService::new()))
    }

    fn with_passwords(passwords: Arc<dyn PasswordService>) -> Self {
        let store = MemoryStore::new();
        let config = ApiConfig::in_memory(jwt_config());
        let tokens = Arc::new(JwtAuthTokenProvider::new(&config.jwt));
        let state = AppState::with_services(
            config,
            Repositories::in_memory(&store),
            tokens,
            passwords,
        );

        Self {
            router: app(state),
            store,
        }
    }

    /// Send a request; the body is parsed as JSON, or kept as a string if it isn't JSON.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
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
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Register a user and return `(token, user)`.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> (String, Value) {
        let (status, body) = self
            .post(
                "/api/register",
                None,
                json!({ "name": name, "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        (
            body["token"].as_str().unwrap().to_owned(),
            body["user"].clone(),
        )
    }

    /// Create an item and return its JSON.
    pub async fn create_item(&self, token: &str, title: &str, price: f64) -> Value {
        let (status, body) = self
            .post(
                "/api/items",
                Some(token),
                json!({
                    "title": title,
                    "des": format!("{title} description"),
                    "price": price,
                    "image": format!("https://cdn.shop.test/{}.png", title.to_lowercase()),
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create item failed: {body}");
        body
    }
}
