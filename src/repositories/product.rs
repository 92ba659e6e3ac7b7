use async_trait::async_trait;
use tokio_postgres::Row;

use crate::{
    db,
    error::{AppError, Result},
    models::{
        object_id::ObjectId,
        product::{Product, ProductDocument},
    },
};

/// Access to the product collection of the document store.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Returns every stored product in storage order.
    async fn find_all(&self) -> Result<Vec<Product>>;

    /// Looks up a single product.
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>>;

    /// Stores a new document and returns the identifier assigned to it.
    async fn insert(&self, document: &ProductDocument) -> Result<ObjectId>;
}

/// Decodes a raw JSON document, rejecting any that do not have the product shape.
pub fn decode_document(id: &ObjectId, doc: serde_json::Value) -> Result<ProductDocument> {
    serde_json::from_value(doc)
        .map_err(|e| AppError::MissingData(format!("product {}: {}", id, e)))
}

/// Encodes a document for storage.
pub fn encode_document(document: &ProductDocument) -> Result<serde_json::Value> {
    serde_json::to_value(document)
        .map_err(|e| AppError::Internal(format!("Product serialization failed: {}", e)))
}

/// A helper function to map a `tokio_postgres::Row` to a `Product`.
fn row_to_product(row: &Row) -> Result<Product> {
    let raw_id: Vec<u8> = row
        .try_get("id")
        .map_err(|_| AppError::MissingData("id".to_string()))?;
    let id = ObjectId::from_slice(&raw_id)
        .ok_or_else(|| AppError::MissingData(format!("id has {} bytes", raw_id.len())))?;
    let doc: serde_json::Value = row
        .try_get("doc")
        .map_err(|_| AppError::MissingData(format!("product {}: doc", id)))?;
    Ok(Product::from_document(id, decode_document(&id, doc)?))
}

/// The PostgreSQL-backed product collection.
///
/// Each product is one row: the identifier as the key and everything else as
/// a JSONB document.
#[derive(Clone)]
pub struct PgProductRepository {
    database_url: Option<String>,
    pool_size: usize,
}

impl PgProductRepository {
    /// Creates a repository that connects through the shared pool on first use.
    pub fn new(database_url: Option<String>, pool_size: usize) -> Self {
        Self {
            database_url,
            pool_size,
        }
    }

    async fn client(&self) -> Result<deadpool_postgres::Client> {
        let pool = db::connection(self.database_url.as_deref(), self.pool_size).await?;
        Ok(pool.get().await?)
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>> {
        let client = self.client().await?;
        let rows = client
            .query(
                r#"
                SELECT id, doc
                FROM products
                ORDER BY seq ASC
                "#,
                &[],
            )
            .await?;
        rows.iter().map(row_to_product).collect()
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>> {
        let client = self.client().await?;
        let key: &[u8] = id.bytes();
        let row = client
            .query_opt(
                r#"
                SELECT id, doc
                FROM products
                WHERE id = $1
                "#,
                &[&key],
            )
            .await?;
        row.map(|r| row_to_product(&r)).transpose()
    }

    async fn insert(&self, document: &ProductDocument) -> Result<ObjectId> {
        let client = self.client().await?;
        let id = ObjectId::new();
        let key: &[u8] = id.bytes();
        let doc = encode_document(document)?;
        client
            .execute(
                r#"
                INSERT INTO products (id, doc)
                VALUES ($1, $2)
                "#,
                &[&key, &doc],
            )
            .await?;
        Ok(id)
    }
}
