mod inmemory;
mod mongo;

use cartkeeper_domain::{Cart, ReminderStage, ID};
pub use inmemory::InMemoryCartRepo;
pub use mongo::MongoCartRepo;

#[async_trait::async_trait]
pub trait ICartRepo: Send + Sync {
    async fn insert(&self, cart: &Cart) -> anyhow::Result<()>;
    async fn save(&self, cart: &Cart) -> anyhow::Result<()>;
    async fn find_by_user(&self, user_id: &ID) -> Option<Cart>;
    /// Candidate query for the reminder sweep: all carts with at least
    /// one item added at or before the given timestamp
    async fn find_with_items_older_than(&self, added_before: i64) -> anyhow::Result<Vec<Cart>>;
    /// Conditional update of the reminder tracking fields: writes
    /// `next` and `sent_at` only if the stored stage still equals
    /// `expected`, and reports whether the write won. This is what
    /// keeps overlapping sweeps from sending the same stage twice.
    async fn advance_reminder_stage(
        &self,
        cart_id: &ID,
        expected: ReminderStage,
        next: ReminderStage,
        sent_at: Option<i64>,
    ) -> anyhow::Result<bool>;
    async fn delete_by_user(&self, user_id: &ID) -> Option<Cart>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartkeeper_domain::{CartItem, Customer};

    fn cart_with_item(added_at: i64) -> Cart {
        let customer = Customer::new("tester", "tester@example.com");
        let mut cart = Cart::new(customer.id);
        cart.items.push(CartItem {
            id: Default::default(),
            product_id: Default::default(),
            name: "Hoodie".into(),
            price: 49.99,
            quantity: 1,
            size: "M".into(),
            color: "#000000".into(),
            category: "hoodies".into(),
            image: None,
            added_at,
        });
        cart
    }

    #[tokio::test]
    async fn stale_item_query_only_returns_old_enough_carts() {
        let repo = InMemoryCartRepo::new();
        let old_cart = cart_with_item(100);
        let fresh_cart = cart_with_item(5000);
        repo.insert(&old_cart).await.unwrap();
        repo.insert(&fresh_cart).await.unwrap();

        let candidates = repo.find_with_items_older_than(100).await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, old_cart.id);
    }

    #[tokio::test]
    async fn advance_reminder_stage_is_conditional_on_expected_stage() {
        let repo = InMemoryCartRepo::new();
        let cart = cart_with_item(0);
        repo.insert(&cart).await.unwrap();

        let won = repo
            .advance_reminder_stage(
                &cart.id,
                ReminderStage::NotSent,
                ReminderStage::First,
                Some(1000),
            )
            .await
            .unwrap();
        assert!(won);

        // A second writer that read the same stage loses the race
        let won = repo
            .advance_reminder_stage(
                &cart.id,
                ReminderStage::NotSent,
                ReminderStage::First,
                Some(2000),
            )
            .await
            .unwrap();
        assert!(!won);

        let stored = repo.find_by_user(&cart.user_id).await.unwrap();
        assert_eq!(stored.reminder_stage, ReminderStage::First);
        assert_eq!(stored.last_reminder_sent_at, Some(1000));
    }

    #[tokio::test]
    async fn advance_reminder_stage_can_roll_back_a_claim() {
        let repo = InMemoryCartRepo::new();
        let cart = cart_with_item(0);
        repo.insert(&cart).await.unwrap();

        repo.advance_reminder_stage(
            &cart.id,
            ReminderStage::NotSent,
            ReminderStage::First,
            Some(1000),
        )
        .await
        .unwrap();
        let rolled_back = repo
            .advance_reminder_stage(&cart.id, ReminderStage::First, ReminderStage::NotSent, None)
            .await
            .unwrap();
        assert!(rolled_back);

        let stored = repo.find_by_user(&cart.user_id).await.unwrap();
        assert_eq!(stored.reminder_stage, ReminderStage::NotSent);
        assert_eq!(stored.last_reminder_sent_at, None);
    }
}
