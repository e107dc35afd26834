//! Account routes: register, login, profile.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use super::extract::JsonBody;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::AuthSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Missing and `null` fields both count as empty, so an incomplete body is
/// just bad credentials.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthSession>)> {
    let session = state
        .auth()
        .register(&req.name, &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<AuthSession>> {
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();
    let session = state.auth().login(&email, &password).await?;
    Ok(Json(session))
}

/// GET /api/profile
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<User>> {
    Ok(Json(state.auth().profile(user.id).await?))
}
