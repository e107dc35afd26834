//! Pocket Shop API library.
//!
//! Accounts, catalog and per-user carts over HTTP. The binary in `main.rs` is
//! a thin shell around [`routes::app`]; tests drive the same router directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

pub use routes::app;
pub use state::AppState;
