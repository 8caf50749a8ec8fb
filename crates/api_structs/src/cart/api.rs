use crate::dtos::{CartDTO, CartItemRequestDTO};
use cartkeeper_domain::{Cart, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    /// `None` when the user has no cart (e.g. it was just deleted by
    /// submitting an empty item list)
    pub cart: Option<CartDTO>,
}

impl CartResponse {
    pub fn new(cart: Option<Cart>) -> Self {
        Self {
            cart: cart.map(CartDTO::new),
        }
    }
}

pub mod set_cart {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_id: ID,
        pub items: Vec<CartItemRequestDTO>,
    }

    pub type APIResponse = CartResponse;
}

pub mod get_cart {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    pub type APIResponse = CartResponse;
}

pub mod update_cart_item_quantity {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_id: ID,
        pub item_id: ID,
        pub quantity: i64,
    }

    pub type APIResponse = CartResponse;
}

pub mod delete_cart_item {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_id: ID,
        pub item_id: ID,
    }

    pub type APIResponse = CartResponse;
}
