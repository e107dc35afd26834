//! Cart routes. Every route acts on the caller's own cart.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use pocket_shop_core::ItemId;

use super::extract::JsonBody;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Cart, CartLine, CartResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// POST /api/cart
///
/// Adds a snapshot of the item unless the cart already has a line for it.
/// Answers 201 with the cart either way.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(req): JsonBody<AddToCartRequest>,
) -> Result<(StatusCode, Json<Cart>)> {
    let product_not_found = || AppError::NotFound("Product not found".to_owned());

    let product_id: ItemId = req.product_id.parse().map_err(|_| product_not_found())?;
    let item = state
        .items()
        .get(product_id)
        .await?
        .ok_or_else(product_not_found)?;

    let cart = state
        .carts()
        .add_line(user.id, CartLine::snapshot(&item))
        .await?;

    tracing::debug!(user_id = %user.id, product = %item.id, lines = cart.items.len(), "cart add");
    Ok((StatusCode::CREATED, Json(cart)))
}

/// GET /api/cart
///
/// Never creates a cart; a user without one gets `{"items": []}`.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartResponse>> {
    let cart = state.carts().get_by_user(user.id).await?;
    Ok(Json(cart.into()))
}

/// DELETE /api/cart/{product_id}
///
/// Removing a product that isn't in the cart (or isn't a valid id) leaves the
/// cart as it is.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<String>,
) -> Result<Json<Cart>> {
    let cart = match product_id.parse::<ItemId>() {
        Ok(product) => state.carts().remove_line(user.id, product).await?,
        Err(_) => state.carts().get_by_user(user.id).await?,
    };

    let cart = cart.ok_or_else(|| AppError::NotFound("Cart not found".to_owned()))?;
    Ok(Json(cart))
}

/// DELETE /api/cart
///
/// Succeeds whether or not a cart existed.
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<MessageResponse>> {
    let existed = state.carts().delete_by_user(user.id).await?;
    tracing::debug!(user_id = %user.id, existed, "cart cleared");

    Ok(Json(MessageResponse {
        message: "Cart cleared",
    }))
}
