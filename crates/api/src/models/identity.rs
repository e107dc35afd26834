//! Identity of an authenticated caller.

use pocket_shop_core::{Email, UserId};

/// The caller resolved from a verified bearer token.
///
/// Built from token claims only; the user row is not loaded to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address at token issue time.
    pub email: Email,
}
