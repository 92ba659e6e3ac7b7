use std::sync::Arc;
use crate::config::Config;
use crate::error::Result;
use crate::repositories::{
    product::{PgProductRepository, ProductRepository},
    session::{RedisSessionStore, SessionStore},
};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The product collection.
    pub products: Arc<dyn ProductRepository>,
    /// The identity provider's sessions.
    pub sessions: Arc<dyn SessionStore>,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState` backed by PostgreSQL and Redis.
    ///
    /// The database pool is not opened here; it is created by the first
    /// request that needs it.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let products = PgProductRepository::new(
            config.database_url.clone(),
            config.database_pool_size,
        );
        if config.database_url.is_none() {
            tracing::warn!("⚠️ DATABASE_URL is not set; product requests will fail");
        }

        let sessions = RedisSessionStore::connect(&config.redis_url).await?;
        tracing::info!("✅ Redis Connection Manager initialized (pooled)");

        Ok(Self::with_parts(config.clone(), Arc::new(products), Arc::new(sessions)))
    }

    /// Assembles a state from already-built collaborators.
    pub fn with_parts(
        config: Config,
        products: Arc<dyn ProductRepository>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            products,
            sessions,
            config,
        }
    }
}
