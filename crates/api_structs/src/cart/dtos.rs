use cartkeeper_domain::{Cart, CartItem, CartItemDraft, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDTO {
    pub id: ID,
    pub product_id: ID,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub size: String,
    pub color: String,
    pub category: String,
    pub image: Option<String>,
    pub added_at: i64,
}

impl CartItemDTO {
    pub fn new(item: CartItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
            size: item.size,
            color: item.color,
            category: item.category,
            image: item.image,
            added_at: item.added_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CartDTO {
    pub id: ID,
    pub user_id: ID,
    pub items: Vec<CartItemDTO>,
}

impl CartDTO {
    pub fn new(cart: Cart) -> Self {
        Self {
            id: cart.id,
            user_id: cart.user_id,
            items: cart.items.into_iter().map(CartItemDTO::new).collect(),
        }
    }
}

/// A line item as submitted by a client when replacing the cart
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequestDTO {
    pub product_id: ID,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub size: String,
    pub color: String,
    pub category: String,
    pub image: Option<String>,
}

impl CartItemRequestDTO {
    pub fn into_draft(self) -> CartItemDraft {
        CartItemDraft {
            product_id: self.product_id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            size: self.size,
            color: self.color,
            category: self.category,
            image: self.image,
        }
    }
}
