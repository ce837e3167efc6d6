use super::model::{NewProduct, Product, ProductPatch};
use crate::error::Result;
use async_trait::async_trait;
use mongodb::bson::{Document, oid::ObjectId};

pub mod memory;
pub mod mongo;

pub use memory::InMemoryProductRepository;
pub use mongo::MongoProductRepository;

/// Exact-match condition on one product field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldMatch {
    Name(String),
    Brand(String),
    Category(String),
}

/// A document filter over the products collection.
///
/// Unset members do not constrain the match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub id: Option<ObjectId>,
    pub is_deleted: Option<bool>,
    pub field: Option<FieldMatch>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: ObjectId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Restrict the query to products that are not soft-deleted
    pub fn not_deleted(mut self) -> Self {
        self.is_deleted = Some(false);
        self
    }

    pub fn matching(mut self, field: Option<FieldMatch>) -> Self {
        self.field = field;
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if self.id.is_some_and(|id| id != product.id) {
            return false;
        }
        if self.is_deleted.is_some_and(|flag| flag != product.is_deleted) {
            return false;
        }
        match &self.field {
            Some(FieldMatch::Name(name)) => product.name == *name,
            Some(FieldMatch::Brand(brand)) => product.brand == *brand,
            Some(FieldMatch::Category(category)) => product.category.to_string() == *category,
            None => true,
        }
    }

    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(id) = self.id {
            filter.insert("_id", id);
        }
        if let Some(is_deleted) = self.is_deleted {
            filter.insert("isDeleted", is_deleted);
        }
        match &self.field {
            Some(FieldMatch::Name(name)) => {
                filter.insert("name", name.as_str());
            }
            Some(FieldMatch::Brand(brand)) => {
                filter.insert("brand", brand.as_str());
            }
            Some(FieldMatch::Category(category)) => {
                filter.insert("category", category.as_str());
            }
            None => {}
        }
        filter
    }
}

/// Document storage for products.
///
/// Each method is a single storage round-trip; implementations must apply
/// `find_one_and_update` atomically per document.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: NewProduct) -> Result<Product>;

    async fn find(&self, query: ProductQuery) -> Result<Vec<Product>>;

    async fn find_one(&self, query: ProductQuery) -> Result<Option<Product>>;

    /// Apply `patch` to the first document matching `query`, returning it post-update.
    async fn find_one_and_update(
        &self,
        query: ProductQuery,
        patch: ProductPatch,
    ) -> Result<Option<Product>>;
}
