use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::Result,
    models::{
        object_id::ObjectId,
        product::{Product, ProductDocument},
    },
    repositories::product::{decode_document, encode_document, ProductRepository},
};

/// An in-process product collection.
///
/// Documents are kept as raw JSON, like the database keeps them, and every
/// call counts as one store query.
#[derive(Default)]
pub struct InMemoryProductRepository {
    documents: RwLock<Vec<(ObjectId, serde_json::Value)>>,
    queries: AtomicUsize,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of store operations performed so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Stores a raw document under a chosen id, bypassing the typed path.
    pub async fn insert_raw(&self, id: ObjectId, doc: serde_json::Value) {
        self.documents.write().await.push((id, doc));
    }

    fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>> {
        self.record_query();
        let documents = self.documents.read().await;
        documents
            .iter()
            .map(|(id, doc)| -> Result<Product> {
                Ok(Product::from_document(*id, decode_document(id, doc.clone())?))
            })
            .collect()
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>> {
        self.record_query();
        let documents = self.documents.read().await;
        documents
            .iter()
            .find(|(stored, _)| stored == id)
            .map(|(stored, doc)| -> Result<Product> {
                Ok(Product::from_document(*stored, decode_document(stored, doc.clone())?))
            })
            .transpose()
    }

    async fn insert(&self, document: &ProductDocument) -> Result<ObjectId> {
        self.record_query();
        let id = ObjectId::new();
        let doc = encode_document(document)?;
        self.documents.write().await.push((id, doc));
        Ok(id)
    }
}
