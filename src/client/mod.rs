//! Client-side data fetching for the catalog API.
//!
//! [`CatalogClient`] calls the HTTP endpoints, keeps results in per-resource
//! [`QueryCache`]s and exposes them as [`QueryState`]s. Filtering runs over
//! the cached list and never touches the network.

pub mod cache;
pub mod error;
pub mod filter;

use std::time::Duration;

use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;

pub use cache::{QueryCache, QueryKey, QueryState};
pub use error::FetchError;
pub use filter::{filter_products, truncate_words, ALL_CATEGORIES, CATEGORIES};

use crate::models::{
    object_id::ObjectId,
    product::{Product, ProductInput},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A caching client for the catalog API.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    products: QueryCache<Vec<Product>>,
    product: QueryCache<Product>,
}

impl CatalogClient {
    /// Creates a client for the server at `base_url`, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_http(http, base_url))
    }

    /// Creates a client around an existing `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            products: QueryCache::new(),
            product: QueryCache::new(),
        }
    }

    /// Builds an endpoint URL, encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::Transport(format!("Invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("Base URL {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// The full product list, fetched once and then served from cache.
    pub async fn products(&self) -> QueryState<Vec<Product>> {
        let request = self.endpoint(&["api", "products"]);
        let http = self.http.clone();
        self.products
            .query(QueryKey::products(), move || get_json(http, request))
            .await
    }

    /// A single product, cached per id.
    pub async fn product(&self, id: &str) -> QueryState<Product> {
        let request = self.endpoint(&["api", "products", id]);
        let http = self.http.clone();
        self.product
            .query(QueryKey::product(id), move || get_json(http, request))
            .await
    }

    /// The cached list narrowed by search text and category.
    pub async fn filtered_products(&self, search: &str, category: &str) -> QueryState<Vec<Product>> {
        self.products()
            .await
            .map(|products| filter_products(products, search, category))
    }

    /// The current state of the product list, without fetching.
    pub async fn products_state(&self) -> QueryState<Vec<Product>> {
        self.products.peek(&QueryKey::products()).await
    }

    /// The current state of one product, without fetching.
    pub async fn product_state(&self, id: &str) -> QueryState<Product> {
        self.product.peek(&QueryKey::product(id)).await
    }

    /// Requests `GET /api/products`, bypassing the cache.
    pub async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        get_json(self.http.clone(), self.endpoint(&["api", "products"])).await
    }

    /// Requests `GET /api/products/{id}`, bypassing the cache.
    pub async fn fetch_product(&self, id: &str) -> Result<Product, FetchError> {
        get_json(self.http.clone(), self.endpoint(&["api", "products", id])).await
    }

    /// Submits a new product and returns its identifier.
    ///
    /// Cached lists are left as they are.
    pub async fn create_product(&self, input: &ProductInput) -> Result<ObjectId, FetchError> {
        #[derive(serde::Deserialize)]
        struct Created {
            id: ObjectId,
        }

        let response = self
            .http
            .post(self.endpoint(&["api", "products"])?)
            .json(input)
            .send()
            .await?;
        let created: Created = read_json(response).await?;
        tracing::info!("✅ Product added: {}", created.id);
        Ok(created.id)
    }
}

async fn get_json<T: DeserializeOwned>(
    http: reqwest::Client,
    url: Result<Url, FetchError>,
) -> Result<T, FetchError> {
    let response = http.get(url?).send().await?;
    read_json(response).await
}

/// Decodes a 2xx JSON body, turning any other status into `FetchError::Status`.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(status_error(status, response).await);
    }
    Ok(response.json::<T>().await?)
}

async fn status_error(status: StatusCode, response: Response) -> FetchError {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
    };
    FetchError::Status {
        status: status.as_u16(),
        message,
    }
}
