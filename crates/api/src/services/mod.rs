//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, login and profile lookup
//! - `password` - Password hashing (argon2)
//! - `token` - Signed bearer tokens (HS256 JWT)

pub mod auth;
pub mod password;
pub mod token;

pub use auth::{AuthError, AuthService, AuthSession};
pub use password::{Argon2PasswordService, PasswordError, PasswordService};
pub use token::{AuthTokenProvider, JwtAuthTokenProvider, TokenError};
