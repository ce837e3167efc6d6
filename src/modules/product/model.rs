use crate::common::validation::{FieldError, FieldReader};
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use strum_macros::{Display, EnumIter, EnumString};

const MODEL: &str = "Product";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Category {
    Mountain,
    Road,
    Hybrid,
    Electric,
}

/// A bike in the catalog, as stored and as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub category: Category,
    pub description: String,
    pub quantity: i64,
    pub in_stock: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn serialize_object_id<S: Serializer>(
    id: &ObjectId,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.to_hex())
}

/// Current time truncated to the millisecond precision the database keeps
pub(crate) fn timestamp() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

impl Product {
    pub fn create(id: ObjectId, new: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            brand: new.brand,
            price: new.price,
            category: new.category,
            description: new.description,
            quantity: new.quantity,
            in_stock: new.in_stock,
            is_deleted: new.is_deleted,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the fields the patch supplies and bump `updated_at`.
    pub fn apply(&mut self, patch: &ProductPatch, now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(brand) = &patch.brand {
            self.brand = brand.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(in_stock) = patch.in_stock {
            self.in_stock = in_stock;
        }
        if let Some(is_deleted) = patch.is_deleted {
            self.is_deleted = is_deleted;
        }
        self.updated_at = now;
    }
}

/// A validated create payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub category: Category,
    pub description: String,
    pub quantity: i64,
    pub in_stock: bool,
    pub is_deleted: bool,
}

impl NewProduct {
    /// Validate a JSON create payload. Every violated field is reported.
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let mut reader = FieldReader::new(payload);

        let name = reader.required::<String>("name", "Name is required");
        let brand = reader.required::<String>("brand", "Brand is required");
        let price = reader.required::<f64>("price", "Price is required");
        let category = reader
            .required::<String>("category", "Category is required")
            .and_then(|raw| parse_category(&mut reader, raw));
        let description = reader.required::<String>("description", "Description is required");
        let quantity = reader.required::<i64>("quantity", "Quantity is required");
        let in_stock = reader.required::<bool>("inStock", "In-stock status is required");
        let is_deleted = reader.optional::<bool>("isDeleted").unwrap_or(false);

        reader
            .finish()
            .map_err(|errors| AppError::validation(MODEL, errors))?;

        let (
            Some(name),
            Some(brand),
            Some(price),
            Some(category),
            Some(description),
            Some(quantity),
            Some(in_stock),
        ) = (name, brand, price, category, description, quantity, in_stock)
        else {
            return Err(AppError::Internal(
                "validated product payload is missing a field".to_string(),
            ));
        };

        Ok(Self {
            name,
            brand,
            price,
            category,
            description,
            quantity,
            in_stock,
            is_deleted,
        })
    }
}

/// A validated partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub in_stock: Option<bool>,
    pub is_deleted: Option<bool>,
}

impl ProductPatch {
    /// Validate the fields a JSON update payload supplies.
    ///
    /// Absent keys are skipped; supplied keys must satisfy the same
    /// constraints as on create, so the merged document stays valid.
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let mut reader = FieldReader::new(payload);

        let patch = Self {
            name: reader.supplied("name", "Name is required"),
            brand: reader.supplied("brand", "Brand is required"),
            price: reader.supplied("price", "Price is required"),
            category: reader
                .supplied::<String>("category", "Category is required")
                .and_then(|raw| parse_category(&mut reader, raw)),
            description: reader.supplied("description", "Description is required"),
            quantity: reader.supplied("quantity", "Quantity is required"),
            in_stock: reader.supplied("inStock", "In-stock status is required"),
            is_deleted: reader.optional("isDeleted"),
        };

        reader
            .finish()
            .map_err(|errors| AppError::validation(MODEL, errors))?;
        Ok(patch)
    }

    pub fn soft_delete() -> Self {
        Self {
            is_deleted: Some(true),
            ..Self::default()
        }
    }
}

fn parse_category(reader: &mut FieldReader<'_>, raw: String) -> Option<Category> {
    match raw.parse::<Category>() {
        Ok(category) => Some(category),
        Err(_) => {
            reader.reject(FieldError::enum_value("category", &raw));
            None
        }
    }
}

/// Query-string filter of the listing endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    fn roadster() -> Value {
        json!({
            "name": "Roadster",
            "brand": "Giant",
            "price": 500,
            "category": "Road",
            "description": "d",
            "quantity": 10,
            "inStock": true
        })
    }

    #[test]
    fn test_new_product_from_valid_payload() {
        let product = NewProduct::from_payload(&roadster()).unwrap();
        assert_eq!(product.name, "Roadster");
        assert_eq!(product.price, 500.0);
        assert_eq!(product.category, Category::Road);
        assert_eq!(product.quantity, 10);
        assert!(!product.is_deleted);
    }

    #[test]
    fn test_new_product_reports_all_missing_fields() {
        let err = NewProduct::from_payload(&json!({ "name": "Roadster" })).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(err.name(), "ValidationError");
        for path in ["brand", "price", "category", "description", "quantity", "inStock"] {
            assert_eq!(errors.get(path).unwrap().kind, "required", "path {}", path);
        }
        assert!(!errors.contains("name"));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let mut payload = roadster();
        payload["category"] = json!("Off-road");
        let err = NewProduct::from_payload(&payload).unwrap_err();
        let category = err.field_errors().unwrap().get("category").unwrap();
        assert_eq!(category.kind, "enum");
        assert_eq!(category.value, Some(json!("Off-road")));
    }

    #[test]
    fn test_quantity_beyond_integer_range_is_rejected() {
        let mut payload = roadster();
        payload["quantity"] = json!(1e20);
        let err = NewProduct::from_payload(&payload).unwrap_err();
        let quantity = err.field_errors().unwrap().get("quantity").unwrap();
        assert_eq!(quantity.name, "CastError");
        assert_eq!(quantity.value, Some(json!(1e20)));
    }

    #[test]
    fn test_category_is_case_sensitive() {
        assert!("road".parse::<Category>().is_err());
        let names: Vec<String> = Category::iter().map(|c| c.to_string()).collect();
        assert_eq!(names, ["Mountain", "Road", "Hybrid", "Electric"]);
    }

    #[test]
    fn test_patch_only_carries_supplied_fields() {
        let patch = ProductPatch::from_payload(&json!({ "price": 650.5, "inStock": false })).unwrap();
        assert_eq!(
            patch,
            ProductPatch {
                price: Some(650.5),
                in_stock: Some(false),
                ..ProductPatch::default()
            }
        );
    }

    #[test]
    fn test_patch_rejects_blank_required_field() {
        let err = ProductPatch::from_payload(&json!({ "name": "", "quantity": "ten" })).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors.get("name").unwrap().kind, "required");
        assert_eq!(errors.get("quantity").unwrap().name, "CastError");
    }

    #[test]
    fn test_apply_merges_patch() {
        let now = timestamp();
        let mut product = Product::create(ObjectId::new(), NewProduct::from_payload(&roadster()).unwrap(), now);
        let later = now + chrono::Duration::seconds(5);
        product.apply(&ProductPatch { quantity: Some(3), ..ProductPatch::default() }, later);

        assert_eq!(product.quantity, 3);
        assert_eq!(product.name, "Roadster");
        assert_eq!(product.created_at, now);
        assert_eq!(product.updated_at, later);
    }

    #[test]
    fn test_serializes_with_wire_field_names() {
        let id = ObjectId::new();
        let product = Product::create(id, NewProduct::from_payload(&roadster()).unwrap(), timestamp());
        let body = serde_json::to_value(&product).unwrap();
        assert_eq!(body["_id"], json!(id.to_hex()));
        assert_eq!(body["inStock"], json!(true));
        assert_eq!(body["isDeleted"], json!(false));
        assert_eq!(body["category"], json!("Road"));
        assert!(body.get("createdAt").is_some());
    }
}
