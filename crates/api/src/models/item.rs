//! Catalog item domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pocket_shop_core::{ItemId, Price};

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub title: String,
    /// Free-text description.
    pub des: String,
    pub price: Price,
    /// Image URL or path.
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Item fields as sent by clients on create and update.
///
/// Every field must be present; a missing one is rejected while the JSON body
/// is extracted. Emptiness is checked by [`ItemInput::validate`].
#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    pub title: String,
    pub des: String,
    pub price: Price,
    pub image: String,
}

/// Validated business fields of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    pub des: String,
    pub price: Price,
    pub image: String,
}

impl ItemInput {
    /// Trim `title` and `des` and reject empty required fields.
    ///
    /// # Errors
    ///
    /// Returns a client-facing message naming the first empty field.
    pub fn validate(self) -> Result<ItemDraft, String> {
        let title = self.title.trim().to_owned();
        let des = self.des.trim().to_owned();

        for (field, value) in [("title", &title), ("des", &des), ("image", &self.image)] {
            if value.is_empty() {
                return Err(format!("`{field}` is required"));
            }
        }

        Ok(ItemDraft {
            title,
            des,
            price: self.price,
            image: self.image,
        })
    }
}
