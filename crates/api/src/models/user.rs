//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pocket_shop_core::{Email, UserId};

/// A registered user, as exposed to clients.
///
/// The password hash is deliberately absent: it only ever travels between the
/// user repository and the auth service (see `UserRepository::get_password_hash`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email (unique).
    pub email: Email,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password_hash: String,
}
