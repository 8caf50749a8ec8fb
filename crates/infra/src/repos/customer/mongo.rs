use super::ICustomerRepo;
use crate::repos::shared::mongo_repo;
use crate::repos::shared::mongo_repo::MongoDocument;
use cartkeeper_domain::{Customer, ID};
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

pub struct MongoCustomerRepo {
    collection: Collection,
}

impl MongoCustomerRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("customers"),
        }
    }
}

#[async_trait::async_trait]
impl ICustomerRepo for MongoCustomerRepo {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()> {
        mongo_repo::insert::<_, CustomerMongo>(&self.collection, customer).await
    }

    async fn find(&self, customer_id: &ID) -> Option<Customer> {
        mongo_repo::find::<_, CustomerMongo>(&self.collection, customer_id.inner_ref()).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CustomerMongo {
    _id: ObjectId,
    username: String,
    email: String,
}

impl MongoDocument<Customer> for CustomerMongo {
    fn to_domain(self) -> Customer {
        Customer {
            id: ID::from(self._id),
            username: self.username,
            email: self.email,
        }
    }

    fn from_domain(customer: &Customer) -> Self {
        Self {
            _id: customer.id.inner_ref().clone(),
            username: customer.username.clone(),
            email: customer.email.clone(),
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": self._id.clone()
        }
    }
}
