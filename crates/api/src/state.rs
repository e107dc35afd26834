//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::db::{CartRepository, ItemRepository, Repositories, UserRepository};
use crate::services::{
    Argon2PasswordService, AuthService, AuthTokenProvider, JwtAuthTokenProvider, PasswordService,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// stores, the token provider and the password hasher.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    repositories: Repositories,
    tokens: Arc<dyn AuthTokenProvider>,
    passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Create application state with the production token provider and hasher.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `repositories` - Store handles (`PostgreSQL` or in-memory)
    #[must_use]
    pub fn new(config: ApiConfig, repositories: Repositories) -> Self {
        let tokens = Arc::new(JwtAuthTokenProvider::new(&config.jwt));
        Self::with_services(config, repositories, tokens, Arc::new(Argon2PasswordService::new()))
    }

    /// Create application state with explicit auth collaborators.
    #[must_use]
    pub fn with_services(
        config: ApiConfig,
        repositories: Repositories,
        tokens: Arc<dyn AuthTokenProvider>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                repositories,
                tokens,
                passwords,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// All store handles.
    #[must_use]
    pub fn repositories(&self) -> &Repositories {
        &self.inner.repositories
    }

    #[must_use]
    pub fn users(&self) -> &dyn UserRepository {
        self.inner.repositories.users.as_ref()
    }

    #[must_use]
    pub fn items(&self) -> &dyn ItemRepository {
        self.inner.repositories.items.as_ref()
    }

    #[must_use]
    pub fn carts(&self) -> &dyn CartRepository {
        self.inner.repositories.carts.as_ref()
    }

    /// Token issuer/verifier.
    #[must_use]
    pub fn tokens(&self) -> &dyn AuthTokenProvider {
        self.inner.tokens.as_ref()
    }

    /// Authentication service bound to this state's collaborators.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(
            self.users(),
            self.inner.passwords.as_ref(),
            self.tokens(),
        )
    }
}
