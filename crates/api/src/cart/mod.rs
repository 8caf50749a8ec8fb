mod delete_cart_item;
mod get_cart;
pub mod send_cart_reminders;
mod set_cart;
mod update_cart_item_quantity;

use actix_web::web;
use delete_cart_item::delete_cart_item_controller;
use get_cart::get_cart_controller;
use set_cart::set_cart_controller;
use update_cart_item_quantity::update_cart_item_quantity_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/cart", web::post().to(set_cart_controller));
    cfg.route("/cart/{user_id}", web::get().to(get_cart_controller));
    cfg.route(
        "/cart/items/quantity",
        web::put().to(update_cart_item_quantity_controller),
    );
    cfg.route("/cart/items", web::delete().to(delete_cart_item_controller));
}
