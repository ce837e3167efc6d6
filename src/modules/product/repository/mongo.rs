use super::{ProductQuery, ProductRepository};
use crate::error::Result;
use crate::modules::product::model::{Category, NewProduct, Product, ProductPatch, timestamp};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{self, Document, doc, oid::ObjectId},
    options::ReturnDocument,
};
use serde::{Deserialize, Serialize};

/// Storage shape of a product in the `products` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    brand: String,
    price: f64,
    category: Category,
    description: String,
    quantity: i64,
    in_stock: bool,
    #[serde(default)]
    is_deleted: bool,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

fn to_bson_time(time: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(time.timestamp_millis())
}

fn from_bson_time(time: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(time.timestamp_millis()).unwrap_or_default()
}

impl From<&Product> for ProductDocument {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            price: product.price,
            category: product.category,
            description: product.description.clone(),
            quantity: product.quantity,
            in_stock: product.in_stock,
            is_deleted: product.is_deleted,
            created_at: to_bson_time(product.created_at),
            updated_at: to_bson_time(product.updated_at),
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(document: ProductDocument) -> Self {
        Self {
            id: document.id,
            name: document.name,
            brand: document.brand,
            price: document.price,
            category: document.category,
            description: document.description,
            quantity: document.quantity,
            in_stock: document.in_stock,
            is_deleted: document.is_deleted,
            created_at: from_bson_time(document.created_at),
            updated_at: from_bson_time(document.updated_at),
        }
    }
}

/// Build the `$set` update for a patch. `updatedAt` is always refreshed.
fn update_document(patch: &ProductPatch, now: DateTime<Utc>) -> Document {
    let mut set = doc! { "updatedAt": to_bson_time(now) };
    if let Some(name) = &patch.name {
        set.insert("name", name.as_str());
    }
    if let Some(brand) = &patch.brand {
        set.insert("brand", brand.as_str());
    }
    if let Some(price) = patch.price {
        set.insert("price", price);
    }
    if let Some(category) = patch.category {
        set.insert("category", category.to_string());
    }
    if let Some(description) = &patch.description {
        set.insert("description", description.as_str());
    }
    if let Some(quantity) = patch.quantity {
        set.insert("quantity", quantity);
    }
    if let Some(in_stock) = patch.in_stock {
        set.insert("inStock", in_stock);
    }
    if let Some(is_deleted) = patch.is_deleted {
        set.insert("isDeleted", is_deleted);
    }
    doc! { "$set": set }
}

pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub const COLLECTION: &'static str = "products";

    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(Self::COLLECTION),
        }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let product = Product::create(ObjectId::new(), product, timestamp());
        self.collection
            .insert_one(ProductDocument::from(&product))
            .await?;
        tracing::debug!(id = %product.id, "Inserted product document");
        Ok(product)
    }

    async fn find(&self, query: ProductQuery) -> Result<Vec<Product>> {
        let filter = query.to_document();
        tracing::debug!(%filter, "Finding product documents");
        let documents: Vec<ProductDocument> = self.collection.find(filter).await?.try_collect().await?;
        Ok(documents.into_iter().map(Product::from).collect())
    }

    async fn find_one(&self, query: ProductQuery) -> Result<Option<Product>> {
        let document = self.collection.find_one(query.to_document()).await?;
        Ok(document.map(Product::from))
    }

    async fn find_one_and_update(
        &self,
        query: ProductQuery,
        patch: ProductPatch,
    ) -> Result<Option<Product>> {
        let filter = query.to_document();
        tracing::debug!(%filter, "Updating product document");
        let document = self
            .collection
            .find_one_and_update(filter, update_document(&patch, timestamp()))
            .return_document(ReturnDocument::After)
            .await?;
        Ok(document.map(Product::from))
    }
}
