use super::ICartRepo;
use crate::repos::shared::inmemory_repo::*;
use cartkeeper_domain::{Cart, ReminderStage, ID};
use std::sync::Mutex;

pub struct InMemoryCartRepo {
    carts: Mutex<Vec<Cart>>,
}

impl InMemoryCartRepo {
    pub fn new() -> Self {
        Self {
            carts: Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl ICartRepo for InMemoryCartRepo {
    async fn insert(&self, cart: &Cart) -> anyhow::Result<()> {
        insert(cart, &self.carts);
        Ok(())
    }

    async fn save(&self, cart: &Cart) -> anyhow::Result<()> {
        save(cart, &self.carts);
        Ok(())
    }

    async fn find_by_user(&self, user_id: &ID) -> Option<Cart> {
        let mut carts = find_by(&self.carts, |c| c.user_id == *user_id);
        if carts.is_empty() {
            return None;
        }
        Some(carts.remove(0))
    }

    async fn find_with_items_older_than(&self, added_before: i64) -> anyhow::Result<Vec<Cart>> {
        Ok(find_by(&self.carts, |c| {
            c.items.iter().any(|item| item.added_at <= added_before)
        }))
    }

    async fn advance_reminder_stage(
        &self,
        cart_id: &ID,
        expected: ReminderStage,
        next: ReminderStage,
        sent_at: Option<i64>,
    ) -> anyhow::Result<bool> {
        // Single lock over read-check-write, the inmemory equivalent of
        // the conditional mongodb update
        let mut carts = self.carts.lock().unwrap();
        for cart in carts.iter_mut() {
            if cart.id == *cart_id {
                if cart.reminder_stage != expected {
                    return Ok(false);
                }
                cart.reminder_stage = next;
                cart.last_reminder_sent_at = sent_at;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn delete_by_user(&self, user_id: &ID) -> Option<Cart> {
        let mut deleted = find_and_delete_by(&self.carts, |c| c.user_id == *user_id);
        if deleted.is_empty() {
            return None;
        }
        Some(deleted.remove(0))
    }
}
