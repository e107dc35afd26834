//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the user id (`sub`), the email at issue time,
//! and `iat`/`exp` timestamps. Verification checks the signature and expiry
//! only; the user row is not consulted.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pocket_shop_core::{Email, UserId};

use crate::config::JwtConfig;
use crate::models::{AuthUser, User};

/// Upper bound on token lifetime, so `exp` stays representable.
const MAX_TTL_HOURS: u64 = 24 * 365 * 10;

/// Token issue or verification failure.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token could not be signed.
    #[error("token encoding failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// Bad signature, malformed token, or expired token.
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    /// Signature checked out but the claims don't describe a user.
    #[error("invalid token claims: {0}")]
    Claims(String),
}

/// JWT claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    /// Issued at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies access tokens.
#[cfg_attr(test, mockall::automock)]
pub trait AuthTokenProvider: Send + Sync {
    /// Sign a fresh token for `user`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encode` if signing fails.
    fn issue(&self, user: &User) -> Result<String, TokenError>;

    /// Verify a token and return the identity it carries.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for a bad signature, malformed or expired
    /// token, and `TokenError::Claims` if `sub` or `email` don't parse.
    fn verify(&self, token: &str) -> Result<AuthUser, TokenError>;
}

/// HS256 implementation of [`AuthTokenProvider`].
pub struct JwtAuthTokenProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtAuthTokenProvider {
    /// Build a provider from the signing settings.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::hours(
                i64::try_from(config.ttl_hours.min(MAX_TTL_HOURS)).unwrap_or_default(),
            ),
        }
    }
}

impl AuthTokenProvider for JwtAuthTokenProvider {
    fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Encode)
    }

    fn verify(&self, token: &str) -> Result<AuthUser, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;

        let id = data
            .claims
            .sub
            .parse::<UserId>()
            .map_err(|e| TokenError::Claims(e.to_string()))?;
        let email = Email::parse(&data.claims.email).map_err(|e| TokenError::Claims(e.to_string()))?;

        Ok(AuthUser { id, email })
    }
}
