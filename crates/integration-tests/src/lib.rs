//! End-to-end tests for the Pocket Shop API.
//!
//! The in-process suites live in `pocket-shop-api/tests`. The tests here talk
//! to a real server over HTTP and are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! shop-cli migrate
//!
//! # Start the API
//! cargo run -p pocket-shop-api
//!
//! # Run the end-to-end suite
//! SHOP_BASE_URL=http://localhost:5000 cargo test -p pocket-shop-integration-tests -- --ignored
//! ```

/// Base URL of the API under test (`SHOP_BASE_URL`, default `http://localhost:5000`).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SHOP_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// An email address that has never been registered.
#[must_use]
pub fn unique_email() -> String {
    format!("e2e-{}@shop.test", uuid::Uuid::new_v4().simple())
}
