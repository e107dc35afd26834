//! `PostgreSQL` repository tests.
//!
//! Each test gets a fresh database with the migrations applied. They require:
//! - A reachable `PostgreSQL` server
//! - `DATABASE_URL` pointing at it (the user needs `CREATEDB`)
//!
//! Run with: cargo test -p pocket-shop-api --test pg_repositories -- --ignored

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use rust_decimal::Decimal;
use sqlx::PgPool;

use pocket_shop_api::db::{
    CartRepository, ItemRepository, PgCartRepository, PgItemRepository, PgUserRepository,
    RepositoryError, UserRepository,
};
use pocket_shop_api::models::{CartLine, Item, ItemDraft, NewUser, User};
use pocket_shop_core::{Email, ItemId, Price, UserId};

fn new_user(email: &str) -> NewUser {
    NewUser {
        id: UserId::generate(),
        name: "Ada".to_owned(),
        email: Email::parse(email).unwrap(),
        password_hash: "$argon2id$stub".to_owned(),
    }
}

fn draft(title: &str, cents: i64) -> ItemDraft {
    ItemDraft {
        title: title.to_owned(),
        des: format!("{title} description"),
        price: Price::new(Decimal::new(cents, 2)).unwrap(),
        image: format!("{}.png", title.to_lowercase()),
    }
}

async fn user(pool: &PgPool) -> User {
    PgUserRepository::new(pool.clone())
        .create(new_user("ada@shop.test"))
        .await
        .unwrap()
}

async fn item(pool: &PgPool, title: &str, cents: i64) -> Item {
    PgItemRepository::new(pool.clone())
        .create(draft(title, cents))
        .await
        .unwrap()
}

// ============================================================================
// Users
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_duplicate_email_is_conflict(pool: PgPool) {
    let users = PgUserRepository::new(pool);
    let first = users.create(new_user("ada@shop.test")).await.unwrap();

    let err = users.create(new_user("ada@shop.test")).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    let email = Email::parse("ada@shop.test").unwrap();
    let (found, hash) = users.get_password_hash(&email).await.unwrap().unwrap();
    assert_eq!(found, first);
    assert_eq!(hash, "$argon2id$stub");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_email_lookup_is_case_sensitive(pool: PgPool) {
    let users = PgUserRepository::new(pool);
    users.create(new_user("ada@shop.test")).await.unwrap();

    let shouted = Email::parse("ADA@shop.test").unwrap();
    assert!(users.get_by_email(&shouted).await.unwrap().is_none());
}

// ============================================================================
// Items
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_list_is_newest_first(pool: PgPool) {
    let items = PgItemRepository::new(pool);
    let older = items.create(draft("Older", 100)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let newer = items.create(draft("Newer", 200)).await.unwrap();

    let ids: Vec<ItemId> = items.list().await.unwrap().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_price_keeps_cents(pool: PgPool) {
    let items = PgItemRepository::new(pool);
    let created = items.create(draft("Mug", 999)).await.unwrap();

    let fetched = items.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.price.amount(), Decimal::new(999, 2));
}

// ============================================================================
// Carts
// ============================================================================

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_add_line_is_idempotent_per_product(pool: PgPool) {
    let user = user(&pool).await;
    let mug = item(&pool, "Mug", 999).await;
    let carts = PgCartRepository::new(pool);

    let first = carts.add_line(user.id, CartLine::snapshot(&mug)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = carts.add_line(user.id, CartLine::snapshot(&mug)).await.unwrap();

    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].price.amount(), Decimal::new(999, 2));
    assert_eq!(second.updated_at, first.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_concurrent_adds_lose_nothing(pool: PgPool) {
    let user = user(&pool).await;
    let mut lines = Vec::new();
    for n in 0..12 {
        lines.push(CartLine::snapshot(&item(&pool, &format!("Item{n}"), 100 + n).await));
    }
    let carts = PgCartRepository::new(pool);
    let user_id = user.id;

    let handles: Vec<_> = lines
        .iter()
        .cloned()
        .map(|line| {
            let carts = carts.clone();
            tokio::spawn(async move { carts.add_line(user_id, line).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let cart = carts.get_by_user(user_id).await.unwrap().unwrap();
    assert_eq!(cart.items.len(), lines.len());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_remove_absent_product_leaves_cart_untouched(pool: PgPool) {
    let user = user(&pool).await;
    let mug = item(&pool, "Mug", 999).await;
    let carts = PgCartRepository::new(pool);
    let before = carts.add_line(user.id, CartLine::snapshot(&mug)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    let after = carts
        .remove_line(user.id, ItemId::generate())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(after, before);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_remove_keeps_order_and_empty_row(pool: PgPool) {
    let user = user(&pool).await;
    let mug = item(&pool, "Mug", 999).await;
    let lamp = item(&pool, "Lamp", 4500).await;
    let carts = PgCartRepository::new(pool);
    carts.add_line(user.id, CartLine::snapshot(&mug)).await.unwrap();
    carts.add_line(user.id, CartLine::snapshot(&lamp)).await.unwrap();

    let cart = carts.remove_line(user.id, mug.id).await.unwrap().unwrap();
    assert_eq!(cart.items, vec![CartLine::snapshot(&lamp)]);

    let cart = carts.remove_line(user.id, lamp.id).await.unwrap().unwrap();
    assert!(cart.items.is_empty());
    assert!(carts.get_by_user(user.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "Requires PostgreSQL"]
async fn test_remove_and_delete_without_cart(pool: PgPool) {
    let user = user(&pool).await;
    let mug = item(&pool, "Mug", 999).await;
    let carts = PgCartRepository::new(pool);

    assert!(carts.remove_line(user.id, mug.id).await.unwrap().is_none());
    assert!(!carts.delete_by_user(user.id).await.unwrap());

    carts.add_line(user.id, CartLine::snapshot(&mug)).await.unwrap();
    assert!(carts.delete_by_user(user.id).await.unwrap());
    assert!(carts.get_by_user(user.id).await.unwrap().is_none());
}
