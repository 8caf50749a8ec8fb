mod inmemory;
mod mongo;

use cartkeeper_domain::{Customer, ID};
pub use inmemory::InMemoryCustomerRepo;
pub use mongo::MongoCustomerRepo;

/// Customer accounts are owned by another service, this repo only
/// resolves reminder email recipients. Insert exists for bootstrap
/// and tests.
#[async_trait::async_trait]
pub trait ICustomerRepo: Send + Sync {
    async fn insert(&self, customer: &Customer) -> anyhow::Result<()>;
    async fn find(&self, customer_id: &ID) -> Option<Customer>;
}
