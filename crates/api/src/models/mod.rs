//! Domain models for the API.
//!
//! These types represent validated domain objects, separate from database row
//! types. Serialization shapes here are the JSON shapes clients see.

pub mod cart;
pub mod identity;
pub mod item;
pub mod user;

pub use cart::{Cart, CartLine, CartResponse};
pub use identity::AuthUser;
pub use item::{Item, ItemDraft, ItemInput};
pub use user::{NewUser, User};
