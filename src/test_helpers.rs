//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::Result,
    models::{
        product::{Price, ProductInput},
        session::{Session, SessionUser},
    },
    repositories::{memory::InMemoryProductRepository, session::SessionStore},
    state::AppState,
};

/// Sessions held in a map, keyed by token.
#[derive(Default)]
pub struct StaticSessions {
    sessions: Mutex<HashMap<String, Session>>,
}

impl StaticSessions {
    pub async fn insert(&self, token: &str, session: Session) {
        self.sessions.lock().await.insert(token.to_string(), session);
    }

    pub async fn contains(&self, token: &str) -> bool {
        self.sessions.lock().await.contains_key(token)
    }
}

#[async_trait]
impl SessionStore for StaticSessions {
    async fn load(&self, token: &str) -> Result<Option<Session>> {
        Ok(self.sessions.lock().await.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<()> {
        self.sessions.lock().await.remove(token);
        Ok(())
    }
}

pub struct Fixture {
    pub state: AppState,
    pub products: Arc<InMemoryProductRepository>,
    pub sessions: Arc<StaticSessions>,
}

pub fn fixture() -> Fixture {
    fixture_with(Config::default())
}

pub fn fixture_with(config: Config) -> Fixture {
    let products = Arc::new(InMemoryProductRepository::new());
    let sessions = Arc::new(StaticSessions::default());
    let state = AppState::with_parts(config, products.clone(), sessions.clone());
    Fixture {
        state,
        products,
        sessions,
    }
}

pub fn session_for(name: &str, valid_for: Duration) -> Session {
    Session {
        user: SessionUser {
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            image: None,
        },
        expires_at: Utc::now() + valid_for,
    }
}

pub fn product_input(name: &str, category: &str) -> ProductInput {
    ProductInput {
        product_name: name.to_string(),
        description: format!("{} description", name),
        price: Price::Text("29".to_string()),
        category: Some(category.to_string()),
        features: vec!["Exports".to_string(), "SSO".to_string()],
        in_stock: true,
        product_image: Some("https://img.example/p.png".to_string()),
    }
}
