//! Persistence for users, catalog items and carts.
//!
//! Each store is a trait so handlers never depend on a concrete backend:
//!
//! - [`UserRepository`] - credentials and profiles
//! - [`ItemRepository`] - the catalog
//! - [`CartRepository`] - one cart document per user
//!
//! Two implementations exist: the `Pg*Repository` types backed by
//! `PostgreSQL`, and [`MemoryStore`], which keeps everything in process.
//!
//! # Database schema: `shop`
//!
//! - `shop.users` - accounts (unique `email`)
//! - `shop.items` - catalog entries
//! - `shop.carts` - one row per user, lines embedded as a JSONB array
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p pocket-shop-cli -- migrate
//! ```

pub mod carts;
pub mod items;
pub mod memory;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::{CartRepository, PgCartRepository};
pub use items::{ItemRepository, PgItemRepository};
pub use memory::MemoryStore;
pub use users::{PgUserRepository, UserRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// The set of stores handed to the application state.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub carts: Arc<dyn CartRepository>,
}

impl Repositories {
    /// Stores backed by a `PostgreSQL` pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            items: Arc::new(PgItemRepository::new(pool.clone())),
            carts: Arc::new(PgCartRepository::new(pool)),
        }
    }

    /// Stores sharing a single in-process [`MemoryStore`].
    #[must_use]
    pub fn in_memory(store: &MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            items: Arc::new(store.clone()),
            carts: Arc::new(store.clone()),
        }
    }

    /// Check that the backing store answers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store is unreachable.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.items.ping().await
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
