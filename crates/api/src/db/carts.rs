//! Cart repository.
//!
//! A cart is one row per user whose lines live in a JSONB array. Every
//! mutation is a single statement, so concurrent adds and removes for the same
//! user serialize on the row lock instead of overwriting each other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

use pocket_shop_core::{CartId, ItemId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartLine};

/// Storage for per-user carts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Get the user's cart, if one exists. Never creates a row.
    async fn get_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError>;

    /// Append `line` unless a line for the same product is present, creating
    /// the cart when the user has none. Returns the resulting cart.
    async fn add_line(&self, user_id: UserId, line: CartLine) -> Result<Cart, RepositoryError>;

    /// Drop the line for `product` if present. `updated_at` only moves when a
    /// line was actually removed.
    ///
    /// Returns `None` if the user has no cart.
    async fn remove_line(
        &self,
        user_id: UserId,
        product: ItemId,
    ) -> Result<Option<Cart>, RepositoryError>;

    /// Delete the user's cart row. Returns whether a row existed.
    async fn delete_by_user(&self, user_id: UserId) -> Result<bool, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct CartRow {
    id: CartId,
    user_id: UserId,
    items: Json<Vec<CartLine>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.id,
            user: row.user_id,
            items: row.items.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CART_COLUMNS: &str = "id, user_id, items, created_at, updated_at";

/// `PostgreSQL` implementation of [`CartRepository`].
#[derive(Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    #[instrument(skip(self))]
    async fn get_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM shop.carts WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Cart::from))
    }

    #[instrument(skip(self, line), fields(product = %line.product))]
    async fn add_line(&self, user_id: UserId, line: CartLine) -> Result<Cart, RepositoryError> {
        // `@>` matches any existing element whose `product` equals the new one.
        let row = sqlx::query_as::<_, CartRow>(&format!(
            r"
            INSERT INTO shop.carts AS c (id, user_id, items)
            VALUES ($1, $2, jsonb_build_array($3::jsonb))
            ON CONFLICT (user_id) DO UPDATE
            SET items = CASE
                    WHEN c.items @> jsonb_build_array(jsonb_build_object('product', $4::text))
                    THEN c.items
                    ELSE c.items || jsonb_build_array($3::jsonb)
                END,
                updated_at = CASE
                    WHEN c.items @> jsonb_build_array(jsonb_build_object('product', $4::text))
                    THEN c.updated_at
                    ELSE now()
                END
            RETURNING {CART_COLUMNS}
            "
        ))
        .bind(CartId::generate())
        .bind(user_id)
        .bind(Json(&line))
        .bind(line.product.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn remove_line(
        &self,
        user_id: UserId,
        product: ItemId,
    ) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            r"
            UPDATE shop.carts
            SET items = COALESCE(
                    (SELECT jsonb_agg(line ORDER BY position)
                     FROM jsonb_array_elements(items) WITH ORDINALITY AS l(line, position)
                     WHERE line->>'product' <> $2),
                    '[]'::jsonb),
                updated_at = CASE
                    WHEN items @> jsonb_build_array(jsonb_build_object('product', $2::text))
                    THEN now()
                    ELSE updated_at
                END
            WHERE user_id = $1
            RETURNING {CART_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(product.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Cart::from))
    }

    #[instrument(skip(self))]
    async fn delete_by_user(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.carts WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
