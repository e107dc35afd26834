//! Authentication service.
//!
//! Password registration and login, each answered with a freshly signed token.

mod error;

pub use error::AuthError;

use serde::Serialize;
use tracing::instrument;

use pocket_shop_core::{Email, UserId};

use crate::db::{RepositoryError, UserRepository};
use crate::models::{NewUser, User};
use crate::services::password::PasswordService;
use crate::services::token::AuthTokenProvider;

/// Body returned by register and login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Authentication service.
///
/// Borrows its collaborators from the application state for the duration of
/// one request.
pub struct AuthService<'a> {
    users: &'a dyn UserRepository,
    passwords: &'a dyn PasswordService,
    tokens: &'a dyn AuthTokenProvider,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        users: &'a dyn UserRepository,
        passwords: &'a dyn PasswordService,
        tokens: &'a dyn AuthTokenProvider,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new user with name, email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the name or password is empty.
    /// Returns `AuthError::InvalidEmail` if the email is empty.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::Validation("name is required".to_owned()));
        }
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AuthError::Validation("password is required".to_owned()));
        }

        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = self.passwords.hash_password(password)?;

        // A concurrent registration can still win between the check and the insert.
        let user = self
            .users
            .create(NewUser {
                id: UserId::generate(),
                name: name.to_owned(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        self.session_for(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password doesn't match; both cases are indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.passwords.verify_password(password, &password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.session_for(user)
    }

    /// Load the profile of an authenticated user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account no longer exists.
    pub async fn profile(&self, id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    fn session_for(&self, user: User) -> Result<AuthSession, AuthError> {
        let token = self.tokens.issue(&user)?;
        Ok(AuthSession { token, user })
    }
}
