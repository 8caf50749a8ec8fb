use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// Age the oldest `CartItem` must reach before the first reminder is due
pub const FIRST_REMINDER_DELAY_MILLIS: i64 = 5 * 60 * 1000;
/// Time after the first reminder at which the second one is due
pub const SECOND_REMINDER_DELAY_MILLIS: i64 = 10 * 60 * 1000;
/// Time after the second reminder at which the third and final one is due
pub const THIRD_REMINDER_DELAY_MILLIS: i64 = 15 * 60 * 1000;

/// How many abandonment reminder emails have been sent for the
/// current contents of a `Cart`. The sequence only ever moves
/// forward and is reset when the item set changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderStage {
    NotSent,
    First,
    Second,
    /// Terminal, no further automated emails
    Third,
}

impl ReminderStage {
    pub fn as_i64(self) -> i64 {
        match self {
            Self::NotSent => 0,
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    pub fn from_i64(stage: i64) -> Option<Self> {
        match stage {
            0 => Some(Self::NotSent),
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }

    /// The time frame named in the email subject and body for the
    /// reminder that moves a cart *into* this stage
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::NotSent => None,
            Self::First => Some("5 minutes"),
            Self::Second => Some("10 minutes"),
            Self::Third => Some("15 minutes"),
        }
    }
}

impl Default for ReminderStage {
    fn default() -> Self {
        Self::NotSent
    }
}

/// A line item as submitted by a client, before it is stamped with
/// a line id and an `added_at` timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemDraft {
    pub product_id: ID,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub size: String,
    pub color: String,
    pub category: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: ID,
    pub product_id: ID,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub size: String,
    pub color: String,
    pub category: String,
    pub image: Option<String>,
    /// Timestamp in millis at which this line entered the cart
    pub added_at: i64,
}

impl CartItem {
    pub fn from_draft(draft: CartItemDraft, added_at: i64) -> Self {
        Self {
            id: Default::default(),
            product_id: draft.product_id,
            name: draft.name,
            price: draft.price,
            quantity: draft.quantity,
            size: draft.size,
            color: draft.color,
            category: draft.category,
            image: draft.image,
            added_at,
        }
    }

    /// Whether this line refers to the same product variant as the draft
    pub fn same_variant(&self, draft: &CartItemDraft) -> bool {
        self.product_id == draft.product_id
            && self.size == draft.size
            && self.color == draft.color
    }

    /// Whether the draft would leave this line unchanged
    fn same_line(&self, draft: &CartItemDraft) -> bool {
        self.same_variant(draft) && self.quantity == draft.quantity
    }
}

/// The persisted set of items a user intends to purchase, plus the
/// reminder-tracking metadata for the abandoned cart email sequence.
/// There is at most one `Cart` per user.
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: ID,
    pub user_id: ID,
    pub items: Vec<CartItem>,
    pub reminder_stage: ReminderStage,
    pub last_reminder_sent_at: Option<i64>,
}

impl Cart {
    pub fn new(user_id: ID) -> Self {
        Self {
            id: Default::default(),
            user_id,
            items: Vec::new(),
            reminder_stage: ReminderStage::NotSent,
            last_reminder_sent_at: None,
        }
    }

    pub fn oldest_item_added_at(&self) -> Option<i64> {
        self.items.iter().map(|item| item.added_at).min()
    }

    /// The single stage transition that is due at `now`, if any.
    ///
    /// The first reminder is anchored to the age of the oldest item,
    /// the second and third to the timestamp of the previous reminder
    /// so the spacing between successive emails stays fixed no matter
    /// how late a sweep runs. Evaluated at most once per cart per
    /// sweep, `Third` is terminal.
    pub fn due_reminder(&self, now: i64) -> Option<ReminderStage> {
        match self.reminder_stage {
            ReminderStage::NotSent => match self.oldest_item_added_at() {
                Some(added_at) if now - added_at >= FIRST_REMINDER_DELAY_MILLIS => {
                    Some(ReminderStage::First)
                }
                _ => None,
            },
            ReminderStage::First => match self.last_reminder_sent_at {
                Some(sent_at) if now - sent_at >= SECOND_REMINDER_DELAY_MILLIS => {
                    Some(ReminderStage::Second)
                }
                _ => None,
            },
            ReminderStage::Second => match self.last_reminder_sent_at {
                Some(sent_at) if now - sent_at >= THIRD_REMINDER_DELAY_MILLIS => {
                    Some(ReminderStage::Third)
                }
                _ => None,
            },
            ReminderStage::Third => None,
        }
    }

    /// Restart the reminder sequence, done whenever the item set
    /// materially changes
    pub fn reset_reminders(&mut self) {
        self.reminder_stage = ReminderStage::NotSent;
        self.last_reminder_sent_at = None;
    }

    /// Replace the item set with the given drafts. Lines that match an
    /// existing product variant keep their line id, but every line is
    /// stamped with `now` so the first reminder threshold counts from
    /// the change. Returns whether the item set materially changed, in
    /// which case the reminder sequence has been reset.
    pub fn apply_items(&mut self, drafts: Vec<CartItemDraft>, now: i64) -> bool {
        let unchanged = self.items.len() == drafts.len()
            && self
                .items
                .iter()
                .zip(drafts.iter())
                .all(|(item, draft)| item.same_line(draft));
        if unchanged {
            return false;
        }

        let previous = std::mem::take(&mut self.items);
        self.items = drafts
            .into_iter()
            .map(|draft| {
                let existing_id = previous
                    .iter()
                    .find(|i| i.same_variant(&draft))
                    .map(|i| i.id.clone());
                let mut item = CartItem::from_draft(draft, now);
                if let Some(id) = existing_id {
                    item.id = id;
                }
                item
            })
            .collect();
        self.reset_reminders();
        true
    }

    /// Remove the line with the given id. Returns whether a line was
    /// removed, in which case the reminder sequence has been reset and
    /// the remaining lines re-stamped with `now`.
    pub fn remove_item(&mut self, item_id: &ID, now: i64) -> bool {
        let len_before = self.items.len();
        self.items.retain(|item| item.id != *item_id);
        if self.items.len() == len_before {
            return false;
        }
        for item in self.items.iter_mut() {
            item.added_at = now;
        }
        self.reset_reminders();
        true
    }
}

impl Entity for Cart {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_factory(added_at: i64) -> CartItem {
        CartItem {
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
        }
    }

    fn draft_factory(product_id: &ID, quantity: i64) -> CartItemDraft {
        CartItemDraft {
            product_id: product_id.clone(),
            name: "Hoodie".into(),
            price: 49.99,
            quantity,
            size: "M".into(),
            color: "#000000".into(),
            category: "hoodies".into(),
            image: None,
        }
    }

    const MIN: i64 = 60 * 1000;

    #[test]
    fn no_reminder_before_first_threshold() {
        let mut cart = Cart::new(Default::default());
        cart.items = vec![item_factory(1000)];

        assert_eq!(cart.due_reminder(1000), None);
        assert_eq!(cart.due_reminder(1000 + 5 * MIN - 1), None);
    }

    #[test]
    fn first_reminder_at_five_minutes_item_age() {
        let mut cart = Cart::new(Default::default());
        cart.items = vec![item_factory(1000)];

        assert_eq!(
            cart.due_reminder(1000 + 5 * MIN),
            Some(ReminderStage::First)
        );
    }

    #[test]
    fn first_reminder_is_anchored_to_oldest_item() {
        let mut cart = Cart::new(Default::default());
        cart.items = vec![item_factory(4 * MIN), item_factory(0)];

        assert_eq!(cart.due_reminder(5 * MIN), Some(ReminderStage::First));
    }

    #[test]
    fn empty_cart_never_has_a_due_reminder() {
        let cart = Cart::new(Default::default());
        assert_eq!(cart.due_reminder(i64::MAX), None);
    }

    #[test]
    fn second_reminder_is_anchored_to_previous_send() {
        let mut cart = Cart::new(Default::default());
        cart.items = vec![item_factory(0)];
        cart.reminder_stage = ReminderStage::First;
        cart.last_reminder_sent_at = Some(5 * MIN);

        assert_eq!(cart.due_reminder(5 * MIN + 9 * MIN), None);
        assert_eq!(
            cart.due_reminder(5 * MIN + 10 * MIN),
            Some(ReminderStage::Second)
        );
    }

    #[test]
    fn third_reminder_is_anchored_to_previous_send() {
        let mut cart = Cart::new(Default::default());
        cart.items = vec![item_factory(0)];
        cart.reminder_stage = ReminderStage::Second;
        cart.last_reminder_sent_at = Some(15 * MIN);

        assert_eq!(cart.due_reminder(15 * MIN + 14 * MIN), None);
        assert_eq!(
            cart.due_reminder(15 * MIN + 15 * MIN),
            Some(ReminderStage::Third)
        );
    }

    #[test]
    fn third_stage_is_terminal() {
        let mut cart = Cart::new(Default::default());
        cart.items = vec![item_factory(0)];
        cart.reminder_stage = ReminderStage::Third;
        cart.last_reminder_sent_at = Some(0);

        assert_eq!(cart.due_reminder(i64::MAX), None);
    }

    #[test]
    fn stage_roundtrips_through_persistence_repr() {
        for stage in [
            ReminderStage::NotSent,
            ReminderStage::First,
            ReminderStage::Second,
            ReminderStage::Third,
        ]
        .iter()
        {
            assert_eq!(ReminderStage::from_i64(stage.as_i64()), Some(*stage));
        }
        assert_eq!(ReminderStage::from_i64(4), None);
    }

    #[test]
    fn applying_identical_items_keeps_reminder_state() {
        let product_id = ID::default();
        let mut cart = Cart::new(Default::default());
        cart.apply_items(vec![draft_factory(&product_id, 2)], 0);
        cart.reminder_stage = ReminderStage::Second;
        cart.last_reminder_sent_at = Some(100);

        let changed = cart.apply_items(vec![draft_factory(&product_id, 2)], 500);

        assert!(!changed);
        assert_eq!(cart.reminder_stage, ReminderStage::Second);
        assert_eq!(cart.last_reminder_sent_at, Some(100));
        assert_eq!(cart.items[0].added_at, 0);
    }

    #[test]
    fn applying_changed_items_resets_reminder_state() {
        let product_id = ID::default();
        let mut cart = Cart::new(Default::default());
        cart.apply_items(vec![draft_factory(&product_id, 2)], 0);
        cart.reminder_stage = ReminderStage::Second;
        cart.last_reminder_sent_at = Some(100);

        let surviving_id = cart.items[0].id.clone();
        let changed = cart.apply_items(
            vec![draft_factory(&product_id, 2), draft_factory(&ID::default(), 1)],
            500,
        );

        assert!(changed);
        assert_eq!(cart.reminder_stage, ReminderStage::NotSent);
        assert_eq!(cart.last_reminder_sent_at, None);
        // The surviving variant keeps its line id, but every line is
        // stamped with the time of the change
        assert_eq!(cart.items[0].id, surviving_id);
        assert_eq!(cart.items[0].added_at, 500);
        assert_eq!(cart.items[1].added_at, 500);
    }

    #[test]
    fn changed_cart_waits_the_full_first_threshold_again() {
        let product_id = ID::default();
        let mut cart = Cart::new(Default::default());
        cart.apply_items(vec![draft_factory(&product_id, 1)], 0);
        cart.reminder_stage = ReminderStage::Second;
        cart.last_reminder_sent_at = Some(15 * MIN);

        let changed = cart.apply_items(
            vec![draft_factory(&product_id, 1), draft_factory(&ID::default(), 1)],
            20 * MIN,
        );

        // The old line alone is way past every threshold, but the
        // changed cart counts the first wait from the change
        assert!(changed);
        assert_eq!(cart.due_reminder(20 * MIN + 1000), None);
        assert_eq!(cart.due_reminder(25 * MIN), Some(ReminderStage::First));
    }

    #[test]
    fn removing_an_item_resets_reminder_state() {
        let product_id = ID::default();
        let mut cart = Cart::new(Default::default());
        cart.apply_items(
            vec![draft_factory(&product_id, 2), draft_factory(&ID::default(), 1)],
            0,
        );
        cart.reminder_stage = ReminderStage::First;
        cart.last_reminder_sent_at = Some(100);

        let item_id = cart.items[0].id.clone();
        assert!(cart.remove_item(&item_id, 500));
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].added_at, 500);
        assert_eq!(cart.reminder_stage, ReminderStage::NotSent);
        assert_eq!(cart.last_reminder_sent_at, None);

        assert!(!cart.remove_item(&ID::default(), 500));
    }
}
