use super::model::{NewProduct, Product, ProductFilter, ProductPatch};
use super::repository::{FieldMatch, ProductQuery, ProductRepository};
use crate::error::Result;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use std::sync::Arc;

/// Product operations. Each call issues exactly one repository call.
#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    /// Validate and store a new product.
    pub async fn create_product(&self, payload: &Value) -> Result<Product> {
        let product = NewProduct::from_payload(payload)?;
        let product = self.repository.insert(product).await?;
        tracing::info!(id = %product.id, name = %product.name, "Created product");
        Ok(product)
    }

    /// List products that are not deleted, filtered on at most one field.
    pub async fn get_all_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let query = ProductQuery::new()
            .not_deleted()
            .matching(select_field(filter));
        self.repository.find(query).await
    }

    pub async fn get_product_by_id(&self, id: ObjectId) -> Result<Option<Product>> {
        self.repository
            .find_one(ProductQuery::by_id(id).not_deleted())
            .await
    }

    /// Apply the supplied fields to a product that is not deleted.
    pub async fn update_product(&self, id: ObjectId, payload: &Value) -> Result<Option<Product>> {
        let patch = ProductPatch::from_payload(payload)?;
        self.repository
            .find_one_and_update(ProductQuery::by_id(id).not_deleted(), patch)
            .await
    }

    /// Flag a product as deleted. Matches regardless of the current flag,
    /// so deleting twice succeeds both times.
    pub async fn delete_product(&self, id: ObjectId) -> Result<Option<Product>> {
        let product = self
            .repository
            .find_one_and_update(ProductQuery::by_id(id), ProductPatch::soft_delete())
            .await?;
        if product.is_some() {
            tracing::info!(%id, "Soft-deleted product");
        }
        Ok(product)
    }
}

/// Name wins over brand, brand over category. Empty values are ignored.
fn select_field(filter: &ProductFilter) -> Option<FieldMatch> {
    fn present(value: &Option<String>) -> Option<String> {
        value.as_deref().filter(|v| !v.is_empty()).map(str::to_owned)
    }

    present(&filter.name)
        .map(FieldMatch::Name)
        .or_else(|| present(&filter.brand).map(FieldMatch::Brand))
        .or_else(|| present(&filter.category).map(FieldMatch::Category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::product::repository::InMemoryProductRepository;
    use serde_json::json;

    fn setup() -> (ProductService, InMemoryProductRepository) {
        let repository = InMemoryProductRepository::new();
        let service = ProductService::new(Arc::new(repository.clone()));
        (service, repository)
    }

    fn bike(name: &str, brand: &str, category: &str) -> Value {
        json!({
            "name": name,
            "brand": brand,
            "price": 500,
            "category": category,
            "description": "d",
            "quantity": 10,
            "inStock": true
        })
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_then_get_returns_supplied_fields() {
        let (service, _) = setup();
        let created = service.create_product(&bike("Roadster", "Giant", "Road")).await.unwrap();
        let fetched = service.get_product_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.brand, "Giant");
        assert_eq!(fetched.price, 500.0);
        assert!(fetched.in_stock);
        assert!(!fetched.is_deleted);
    }

    #[tokio::test]
    async fn test_invalid_category_persists_nothing() {
        let (service, repository) = setup();
        let err = service
            .create_product(&bike("Roadster", "Giant", "Off-road"))
            .await
            .unwrap_err();

        assert_eq!(err.name(), "ValidationError");
        assert!(err.field_errors().unwrap().contains("category"));
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_on_one_field_by_priority() {
        let (service, _) = setup();
        service.create_product(&bike("Trek", "Giant", "Road")).await.unwrap();
        service.create_product(&bike("Marlin", "Trek", "Mountain")).await.unwrap();
        service.create_product(&bike("trek", "Cannondale", "Hybrid")).await.unwrap();

        let filter = ProductFilter {
            name: Some("Trek".to_string()),
            brand: Some("Cannondale".to_string()),
            category: Some("Hybrid".to_string()),
        };
        let products = service.get_all_products(&filter).await.unwrap();
        assert_eq!(names(&products), ["Trek"]);

        let filter = ProductFilter {
            brand: Some("Trek".to_string()),
            category: Some("Road".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(names(&service.get_all_products(&filter).await.unwrap()), ["Marlin"]);

        let filter = ProductFilter {
            name: Some(String::new()),
            category: Some("Hybrid".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(names(&service.get_all_products(&filter).await.unwrap()), ["trek"]);

        let all = service.get_all_products(&ProductFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_list_without_matches_is_empty() {
        let (service, _) = setup();
        service.create_product(&bike("Trek", "Giant", "Road")).await.unwrap();
        let filter = ProductFilter {
            category: Some("Electric".to_string()),
            ..ProductFilter::default()
        };
        assert!(service.get_all_products(&filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_hides_product() {
        let (service, repository) = setup();
        let created = service.create_product(&bike("Roadster", "Giant", "Road")).await.unwrap();

        let first = service.delete_product(created.id).await.unwrap().unwrap();
        let second = service.delete_product(created.id).await.unwrap().unwrap();
        assert!(first.is_deleted);
        assert!(second.is_deleted);

        assert!(service.get_product_by_id(created.id).await.unwrap().is_none());
        assert!(service.get_all_products(&ProductFilter::default()).await.unwrap().is_empty());
        assert_eq!(repository.len(), 1);

        assert!(service.delete_product(ObjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_supplied_fields() {
        let (service, _) = setup();
        let created = service.create_product(&bike("Roadster", "Giant", "Road")).await.unwrap();

        let updated = service
            .update_product(created.id, &json!({ "price": 450, "quantity": 4 }))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.price, 450.0);
        assert_eq!(updated.quantity, 4);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.category, created.category);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_or_deleted_is_not_found() {
        let (service, _) = setup();
        let created = service.create_product(&bike("Roadster", "Giant", "Road")).await.unwrap();
        service.delete_product(created.id).await.unwrap();

        let patch = json!({ "price": 1 });
        assert!(service.update_product(created.id, &patch).await.unwrap().is_none());
        assert!(service.update_product(ObjectId::new(), &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_fields() {
        let (service, _) = setup();
        let created = service.create_product(&bike("Roadster", "Giant", "Road")).await.unwrap();

        let err = service
            .update_product(created.id, &json!({ "category": "Off-road" }))
            .await
            .unwrap_err();
        assert_eq!(err.name(), "ValidationError");

        let unchanged = service.get_product_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(unchanged.category, created.category);
    }
}
