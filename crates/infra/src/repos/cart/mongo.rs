use super::ICartRepo;
use crate::repos::shared::mongo_repo;
use crate::repos::shared::mongo_repo::MongoDocument;
use cartkeeper_domain::{Cart, CartItem, ReminderStage, ID};
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

pub struct MongoCartRepo {
    collection: Collection,
}

impl MongoCartRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("carts"),
        }
    }
}

#[async_trait::async_trait]
impl ICartRepo for MongoCartRepo {
    async fn insert(&self, cart: &Cart) -> anyhow::Result<()> {
        mongo_repo::insert::<_, CartMongo>(&self.collection, cart).await
    }

    async fn save(&self, cart: &Cart) -> anyhow::Result<()> {
        mongo_repo::save::<_, CartMongo>(&self.collection, cart).await
    }

    async fn find_by_user(&self, user_id: &ID) -> Option<Cart> {
        let filter = doc! {
            "user_id": user_id.inner_ref()
        };
        mongo_repo::find_one_by::<_, CartMongo>(&self.collection, filter).await
    }

    async fn find_with_items_older_than(&self, added_before: i64) -> anyhow::Result<Vec<Cart>> {
        let filter = doc! {
            "items": {
                "$elemMatch": {
                    "added_at": {
                        "$lte": added_before
                    }
                }
            }
        };
        mongo_repo::find_many_by::<_, CartMongo>(&self.collection, filter).await
    }

    async fn advance_reminder_stage(
        &self,
        cart_id: &ID,
        expected: ReminderStage,
        next: ReminderStage,
        sent_at: Option<i64>,
    ) -> anyhow::Result<bool> {
        // Filtering on the currently stored stage makes this a single
        // document compare-and-swap, so of two overlapping sweeps only
        // one can claim a given stage transition
        let filter = doc! {
            "_id": cart_id.inner_ref(),
            "reminder_stage": expected.as_i64()
        };
        let sent_at = match sent_at {
            Some(ts) => Bson::Int64(ts),
            None => Bson::Null,
        };
        let update = doc! {
            "$set": {
                "reminder_stage": next.as_i64(),
                "last_reminder_sent_at": sent_at
            }
        };
        mongo_repo::update_one(&self.collection, filter, update).await
    }

    async fn delete_by_user(&self, user_id: &ID) -> Option<Cart> {
        let filter = doc! {
            "user_id": user_id.inner_ref()
        };
        mongo_repo::delete_one_by::<_, CartMongo>(&self.collection, filter).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CartItemMongo {
    _id: ObjectId,
    product_id: ObjectId,
    name: String,
    price: f64,
    quantity: i64,
    size: String,
    color: String,
    category: String,
    image: Option<String>,
    added_at: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct CartMongo {
    _id: ObjectId,
    user_id: ObjectId,
    items: Vec<CartItemMongo>,
    reminder_stage: i64,
    last_reminder_sent_at: Option<i64>,
}

impl MongoDocument<Cart> for CartMongo {
    fn to_domain(self) -> Cart {
        Cart {
            id: ID::from(self._id),
            user_id: ID::from(self.user_id),
            items: self
                .items
                .into_iter()
                .map(|item| CartItem {
                    id: ID::from(item._id),
                    product_id: ID::from(item.product_id),
                    name: item.name,
                    price: item.price,
                    quantity: item.quantity,
                    size: item.size,
                    color: item.color,
                    category: item.category,
                    image: item.image,
                    added_at: item.added_at,
                })
                .collect(),
            reminder_stage: ReminderStage::from_i64(self.reminder_stage)
                .unwrap_or(ReminderStage::NotSent),
            last_reminder_sent_at: self.last_reminder_sent_at,
        }
    }

    fn from_domain(cart: &Cart) -> Self {
        Self {
            _id: cart.id.inner_ref().clone(),
            user_id: cart.user_id.inner_ref().clone(),
            items: cart
                .items
                .iter()
                .map(|item| CartItemMongo {
                    _id: item.id.inner_ref().clone(),
                    product_id: item.product_id.inner_ref().clone(),
                    name: item.name.clone(),
                    price: item.price,
                    quantity: item.quantity,
                    size: item.size.clone(),
                    color: item.color.clone(),
                    category: item.category.clone(),
                    image: item.image.clone(),
                    added_at: item.added_at,
                })
                .collect(),
            reminder_stage: cart.reminder_stage.as_i64(),
            last_reminder_sent_at: cart.last_reminder_sent_at,
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": self._id.clone()
        }
    }
}
