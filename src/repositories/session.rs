use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};

use crate::{
    error::Result,
    models::session::Session,
};

/// Read access to the sessions issued by the identity provider.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the session stored under `token`, if any.
    async fn load(&self, token: &str) -> Result<Option<Session>>;

    /// Drops a session, used once it is found to be expired.
    async fn remove(&self, token: &str) -> Result<()>;
}

fn session_key(token: &str) -> String {
    format!("session:{}", token)
}

/// Sessions kept in Redis as JSON under `session:{token}`.
#[derive(Clone)]
pub struct RedisSessionStore {
    redis: ConnectionManager,
}

impl RedisSessionStore {
    /// Connects to Redis.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;
        Ok(Self { redis })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, token: &str) -> Result<Option<Session>> {
        let mut redis = self.redis.clone();
        let session_json: Option<String> = redis.get(session_key(token)).await?;

        Ok(session_json.and_then(|json| match sonic_rs::from_str::<Session>(&json) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("❌ Invalid session JSON: {}", e);
                None
            }
        }))
    }

    async fn remove(&self, token: &str) -> Result<()> {
        let mut redis = self.redis.clone();
        let _: () = redis.del(session_key(token)).await?;
        Ok(())
    }
}
