//! Catalog item repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use pocket_shop_core::{ItemId, Price};

use super::RepositoryError;
use crate::models::{Item, ItemDraft};

/// Storage for catalog items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new item with a fresh ID and timestamps.
    async fn create(&self, draft: ItemDraft) -> Result<Item, RepositoryError>;

    /// All items, newest first.
    async fn list(&self) -> Result<Vec<Item>, RepositoryError>;

    /// Get an item by ID.
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepositoryError>;

    /// Replace the business fields of an item and bump `updated_at`.
    ///
    /// Returns `None` if the item doesn't exist.
    async fn update(&self, id: ItemId, draft: ItemDraft) -> Result<Option<Item>, RepositoryError>;

    /// Delete an item, returning its last content.
    ///
    /// Returns `None` if the item doesn't exist.
    async fn delete(&self, id: ItemId) -> Result<Option<Item>, RepositoryError>;

    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: ItemId,
    title: String,
    des: String,
    price: Price,
    image: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            des: row.des,
            price: row.price,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ITEM_COLUMNS: &str = "id, title, des, price, image, created_at, updated_at";

/// `PostgreSQL` implementation of [`ItemRepository`].
#[derive(Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn create(&self, draft: ItemDraft) -> Result<Item, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r"
            INSERT INTO shop.items (id, title, des, price, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ITEM_COLUMNS}
            "
        ))
        .bind(ItemId::generate())
        .bind(&draft.title)
        .bind(&draft.des)
        .bind(draft.price)
        .bind(&draft.image)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM shop.items ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM shop.items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Item::from))
    }

    #[instrument(skip(self, draft))]
    async fn update(&self, id: ItemId, draft: ItemDraft) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r"
            UPDATE shop.items
            SET title = $2, des = $3, price = $4, image = $5, updated_at = now()
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.des)
        .bind(draft.price)
        .bind(&draft.image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Item::from))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "DELETE FROM shop.items WHERE id = $1 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Item::from))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
