mod cart;
mod customer;
mod shared;

pub use cart::{
    Cart, CartItem, CartItemDraft, ReminderStage, FIRST_REMINDER_DELAY_MILLIS,
    SECOND_REMINDER_DELAY_MILLIS, THIRD_REMINDER_DELAY_MILLIS,
};
pub use customer::Customer;
pub use shared::entity::{Entity, ID};
