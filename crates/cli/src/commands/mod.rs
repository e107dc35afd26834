//! CLI subcommands.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Read the database URL, preferring `SHOP_DATABASE_URL` over `DATABASE_URL`.
pub fn database_url() -> Option<SecretString> {
    std::env::var("SHOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.is_empty())
        .map(SecretString::from)
}
