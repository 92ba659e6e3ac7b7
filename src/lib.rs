//! Product catalog service: a JSON API over a document store plus a caching
//! client for it.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;

pub mod models {
    pub mod object_id;
    pub mod product;
    pub mod session;
}

pub mod repositories {
    pub mod memory;
    pub mod product;
    pub mod session;
}

pub mod services {
    pub mod products;
}

pub mod handlers {
    pub mod json;
    pub mod products;
    pub mod session;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod product;
}

#[cfg(test)]
mod test_helpers;
