//! Catalog routes.
//!
//! Reads are public; create, update and delete require a bearer token. Any
//! authenticated user may change the catalog.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use pocket_shop_core::ItemId;

use super::extract::JsonBody;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Item, ItemInput};
use crate::state::AppState;

const ITEM_NOT_FOUND: &str = "Item not found";

fn not_found() -> AppError {
    AppError::NotFound(ITEM_NOT_FOUND.to_owned())
}

/// An id that isn't a UUID can't name any item.
fn parse_id(raw: &str) -> Result<ItemId> {
    raw.parse().map_err(|_| not_found())
}

/// POST /api/items
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(input): JsonBody<ItemInput>,
) -> Result<(StatusCode, Json<Item>)> {
    let draft = input.validate().map_err(AppError::Validation)?;
    let item = state.items().create(draft).await?;

    tracing::info!(item_id = %item.id, user_id = %user.id, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/items
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Item>>> {
    Ok(Json(state.items().list().await?))
}

/// GET /api/items/{id}
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Item>> {
    let item = state.items().get(parse_id(&id)?).await?.ok_or_else(not_found)?;
    Ok(Json(item))
}

/// PUT /api/items/{id}
///
/// Full replace: all four fields are required.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ItemInput>,
) -> Result<Json<Item>> {
    let id = parse_id(&id)?;
    let draft = input.validate().map_err(AppError::Validation)?;

    let item = state
        .items()
        .update(id, draft)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(item))
}

/// DELETE /api/items/{id}
///
/// Cart lines referencing the item are left untouched.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Item>> {
    let item = state
        .items()
        .delete(parse_id(&id)?)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(item_id = %item.id, user_id = %user.id, "item deleted");
    Ok(Json(item))
}
