mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, SmtpConfig};
use repos::Repos;
pub use repos::{ICartRepo, ICustomerRepo};
pub use services::*;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct CartkeeperContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<dyn ICartNotifier>,
}

struct ContextParams {
    pub mongodb_connection_string: String,
    pub mongodb_db_name: String,
}

impl CartkeeperContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_mongodb(
            &params.mongodb_connection_string,
            &params.mongodb_db_name,
        )
        .await
        .expect("Mongodb credentials must be set and valid");
        let config = Config::new();
        let notifier = SmtpCartNotifier::new(&config).expect("Valid smtp configuration");
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            notifier: Arc::new(notifier),
        }
    }

    /// Context backed by inmemory repos and a recording notifier,
    /// used in tests
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            notifier: Arc::new(InMemoryCartNotifier::new()),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> CartkeeperContext {
    const MONGODB_CONNECTION_STRING: &str = "MONGODB_CONNECTION_STRING";
    const MONGODB_NAME: &str = "MONGODB_NAME";

    CartkeeperContext::create(ContextParams {
        mongodb_connection_string: std::env::var(MONGODB_CONNECTION_STRING)
            .unwrap_or_else(|_| panic!("{} env var to be present.", MONGODB_CONNECTION_STRING)),
        mongodb_db_name: std::env::var(MONGODB_NAME)
            .unwrap_or_else(|_| "cartkeeper".to_string()),
    })
    .await
}
