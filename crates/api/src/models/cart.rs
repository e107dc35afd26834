//! Cart domain types.
//!
//! A cart belongs to exactly one user and embeds its lines. Each line is a
//! snapshot of the item taken when it was added, so later catalog edits (or
//! deletes) never change what is already in a cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pocket_shop_core::{CartId, ItemId, Price, UserId};

use super::Item;

/// A user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "_id")]
    pub id: CartId,
    /// Owning user.
    pub user: UserId,
    /// Lines in insertion order, at most one per product.
    pub items: Vec<CartLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Whether a line for `product` is already present.
    #[must_use]
    pub fn contains(&self, product: ItemId) -> bool {
        self.items.iter().any(|line| line.product == product)
    }
}

/// A product snapshot embedded in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Weak reference to the catalog item.
    pub product: ItemId,
    /// Item title at add-time.
    pub name: String,
    pub image: String,
    /// Item price at add-time.
    pub price: Price,
}

impl CartLine {
    /// Snapshot the current state of a catalog item.
    #[must_use]
    pub fn snapshot(item: &Item) -> Self {
        Self {
            product: item.id,
            name: item.title.clone(),
            image: item.image.clone(),
            price: item.price,
        }
    }
}

/// Body returned by the cart read endpoint.
///
/// Users who never added anything have no cart row; they get an empty line
/// list instead of a synthetic cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CartResponse {
    Stored(Cart),
    Empty { items: Vec<CartLine> },
}

impl From<Option<Cart>> for CartResponse {
    fn from(cart: Option<Cart>) -> Self {
        cart.map_or_else(|| Self::Empty { items: Vec::new() }, Self::Stored)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_missing_cart_serializes_as_empty_items() {
        let body = serde_json::to_value(CartResponse::from(None)).unwrap();
        assert_eq!(body, json!({ "items": [] }));
    }

    #[test]
    fn test_snapshot_copies_item_fields() {
        let now = Utc::now();
        let item = Item {
            id: ItemId::generate(),
            title: "Lamp".into(),
            des: "Desk lamp".into(),
            price: Price::new(Decimal::new(2500, 2)).unwrap(),
            image: "lamp.jpg".into(),
            created_at: now,
            updated_at: now,
        };

        let line = CartLine::snapshot(&item);
        assert_eq!(line.product, item.id);
        assert_eq!(line.name, "Lamp");
        assert_eq!(line.image, "lamp.jpg");
        assert_eq!(line.price, item.price);
    }

    #[test]
    fn test_line_json_roundtrips_through_document_shape() {
        let line = CartLine {
            product: ItemId::generate(),
            name: "Mug".into(),
            image: "mug.png".into(),
            price: Price::new(Decimal::new(999, 2)).unwrap(),
        };

        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["product"], line.product.to_string());
        assert_eq!(value["price"], json!(9.99));

        let back: CartLine = serde_json::from_value(value).unwrap();
        assert_eq!(back, line);
    }
}
