use std::env;
use std::net::SocketAddr;
use anyhow::{Context, Result};

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The URL of the PostgreSQL database backing the product store.
    ///
    /// Left unset at load time so a missing value surfaces as a connection
    /// error on first use.
    pub database_url: Option<String>,
    /// The maximum number of pooled database connections.
    pub database_pool_size: usize,
    /// The URL of the Redis server holding identity-provider sessions.
    pub redis_url: String,
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The front-end origin allowed by CORS.
    pub allowed_origin: String,
    /// The name of the cookie carrying the session token.
    pub session_cookie: String,
    /// Whether `POST /api/products` requires a signed-in user.
    pub require_auth_for_create: bool,
    /// The directory served for non-API paths.
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            database_pool_size: 16,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            allowed_origin: "http://localhost:3000".to_string(),
            session_cookie: "session_id".to_string(),
            require_auth_for_create: false,
            static_dir: "public".to_string(),
        }
    }
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            database_pool_size: env::var("DATABASE_POOL_SIZE")
                .unwrap_or_else(|_| defaults.database_pool_size.to_string())
                .parse()
                .context("Invalid DATABASE_POOL_SIZE")?,
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| defaults.bind_addr.to_string())
                .parse()
                .context("Invalid BIND_ADDR (expected host:port)")?,
            allowed_origin: env::var("ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
            session_cookie: env::var("SESSION_COOKIE").unwrap_or(defaults.session_cookie),
            require_auth_for_create: env::var("REQUIRE_AUTH_FOR_CREATE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .context("Invalid REQUIRE_AUTH_FOR_CREATE (expected true or false)")?,
            static_dir: env::var("STATIC_DIR").unwrap_or(defaults.static_dir),
        })
    }
}
