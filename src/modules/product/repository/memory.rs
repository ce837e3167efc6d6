use super::{ProductQuery, ProductRepository};
use crate::error::Result;
use crate::modules::product::model::{NewProduct, Product, ProductPatch, timestamp};
use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

/// Product storage held in process memory.
///
/// Backs the test suite and `DATABASE_URL=memory://` runs. Listing order
/// follows id order, which is insertion order for generated ids.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<DashMap<ObjectId, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents, soft-deleted ones included
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn first_match(&self, query: &ProductQuery) -> Option<ObjectId> {
        match query.id {
            Some(id) => Some(id),
            None => self
                .products
                .iter()
                .filter(|entry| query.matches(entry.value()))
                .map(|entry| *entry.key())
                .min(),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let product = Product::create(ObjectId::new(), product, timestamp());
        self.products.insert(product.id, product.clone());
        tracing::debug!(id = %product.id, "Stored product in memory");
        Ok(product)
    }

    async fn find(&self, query: ProductQuery) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self
            .products
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        products.sort_by_key(|product| product.id);
        Ok(products)
    }

    async fn find_one(&self, query: ProductQuery) -> Result<Option<Product>> {
        let Some(id) = self.first_match(&query) else {
            return Ok(None);
        };
        Ok(self
            .products
            .get(&id)
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone()))
    }

    async fn find_one_and_update(
        &self,
        query: ProductQuery,
        patch: ProductPatch,
    ) -> Result<Option<Product>> {
        let Some(id) = self.first_match(&query) else {
            return Ok(None);
        };
        // The entry lock is held from the re-check through the write.
        let Some(mut entry) = self.products.get_mut(&id) else {
            return Ok(None);
        };
        if !query.matches(entry.value()) {
            return Ok(None);
        }
        entry.apply(&patch, timestamp());
        Ok(Some(entry.value().clone()))
    }
}
