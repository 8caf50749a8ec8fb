mod cart;
mod customer;
mod shared;

use cart::{InMemoryCartRepo, MongoCartRepo};
pub use cart::ICartRepo;
use customer::{InMemoryCustomerRepo, MongoCustomerRepo};
pub use customer::ICustomerRepo;
use mongodb::{options::ClientOptions, Client};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub carts: Arc<dyn ICartRepo>,
    pub customers: Arc<dyn ICustomerRepo>,
}

impl Repos {
    pub async fn create_mongodb(
        connection_string: &str,
        db_name: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let client_options = ClientOptions::parse(connection_string).await?;
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // This is needed to make sure that db is ready when opening server
        info!("DB CHECKING CONNECTION ...");
        db.collection("server-start")
            .insert_one(
                mongodb::bson::doc! {
                "server-start": 1
                },
                None,
            )
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            carts: Arc::new(MongoCartRepo::new(&db)),
            customers: Arc::new(MongoCustomerRepo::new(&db)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            carts: Arc::new(InMemoryCartRepo::new()),
            customers: Arc::new(InMemoryCustomerRepo::new()),
        }
    }
}
