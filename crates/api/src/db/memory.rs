//! In-process implementation of every repository trait.
//!
//! Used by the test suites and by `SHOP_STORE=memory` for local runs without
//! `PostgreSQL`. All state sits behind one `RwLock`, so each operation (including
//! the cart add/remove read-modify-write) is atomic with respect to the others.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use pocket_shop_core::{CartId, Email, ItemId, UserId};

use super::{CartRepository, ItemRepository, RepositoryError, UserRepository};
use crate::models::{Cart, CartLine, Item, ItemDraft, NewUser, User};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, (User, String)>,
    emails: HashMap<Email, UserId>,
    items: HashMap<ItemId, Item>,
    carts: HashMap<UserId, Cart>,
}

/// Shared in-memory store. Clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cart rows currently stored.
    pub async fn cart_count(&self) -> usize {
        self.tables.read().await.carts.len()
    }

    /// Whether `user_id` has a cart row.
    pub async fn has_cart(&self, user_id: UserId) -> bool {
        self.tables.read().await.carts.contains_key(&user_id)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.emails.contains_key(&user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let now = Utc::now();
        let created = User {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: now,
            updated_at: now,
        };
        tables.emails.insert(created.email.clone(), created.id);
        tables
            .users
            .insert(created.id, (created.clone(), user.password_hash));
        Ok(created)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(|(user, _)| user.clone()))
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self.get_password_hash(email).await?.map(|(user, _)| user))
    }

    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .emails
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn create(&self, draft: ItemDraft) -> Result<Item, RepositoryError> {
        let now = Utc::now();
        let item = Item {
            id: ItemId::generate(),
            title: draft.title,
            des: draft.des,
            price: draft.price,
            image: draft.image,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .items
            .insert(item.id, item.clone());
        Ok(item)
    }

    async fn list(&self) -> Result<Vec<Item>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut items: Vec<Item> = tables.items.values().cloned().collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(items)
    }

    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        Ok(self.tables.read().await.items.get(&id).cloned())
    }

    async fn update(&self, id: ItemId, draft: ItemDraft) -> Result<Option<Item>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(item) = tables.items.get_mut(&id) else {
            return Ok(None);
        };

        item.title = draft.title;
        item.des = draft.des;
        item.price = draft.price;
        item.image = draft.image;
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        Ok(self.tables.write().await.items.remove(&id))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl CartRepository for MemoryStore {
    async fn get_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        Ok(self.tables.read().await.carts.get(&user_id).cloned())
    }

    async fn add_line(&self, user_id: UserId, line: CartLine) -> Result<Cart, RepositoryError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let cart = tables.carts.entry(user_id).or_insert_with(|| Cart {
            id: CartId::generate(),
            user: user_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        });

        if !cart.contains(line.product) {
            cart.items.push(line);
            cart.updated_at = now;
        }
        Ok(cart.clone())
    }

    async fn remove_line(
        &self,
        user_id: UserId,
        product: ItemId,
    ) -> Result<Option<Cart>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(cart) = tables.carts.get_mut(&user_id) else {
            return Ok(None);
        };

        let before = cart.items.len();
        cart.items.retain(|line| line.product != product);
        if cart.items.len() != before {
            cart.updated_at = Utc::now();
        }
        Ok(Some(cart.clone()))
    }

    async fn delete_by_user(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        Ok(self.tables.write().await.carts.remove(&user_id).is_some())
    }
}
